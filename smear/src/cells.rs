//! Per-run store of detected cells and their classification.
//!
//! A [`CellResults`] is created for a single analysis run and owned by it.
//! Cells keep the order in which segmentation reported them; that detection
//! order is the only order used for counting, annotation and confidence
//! aggregation.

use serde::{Deserialize, Serialize};

/// Pixel location of a cell center in the unrotated, resized image frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellLocation {
    pub row: u32,
    pub col: u32,
}

impl CellLocation {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Binary classifier outcome for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellLabel {
    #[default]
    Uninfected,
    Infected,
}

/// Output of the external classifier for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: CellLabel,
    /// Classifier confidence in [0, 1]. Only meaningful for infected cells.
    #[serde(default)]
    pub confidence: f32,
}

impl Classification {
    pub const fn infected(confidence: f32) -> Self {
        Self {
            label: CellLabel::Infected,
            confidence,
        }
    }

    pub const fn uninfected() -> Self {
        Self {
            label: CellLabel::Uninfected,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedCell {
    pub location: CellLocation,
    pub label: CellLabel,
    pub confidence: f32,
}

impl DetectedCell {
    #[inline]
    pub fn is_infected(&self) -> bool {
        self.label == CellLabel::Infected
    }
}

/// Detection-ordered cells of one image.
#[derive(Debug, Clone, Default)]
pub struct CellResults {
    cells: Vec<DetectedCell>,
}

impl CellResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Pair segmentation locations with classifier output, keeping order.
    ///
    /// Returns `None` when the two lists differ in length.
    pub fn from_parts(
        locations: &[CellLocation],
        classifications: &[Classification],
    ) -> Option<Self> {
        if locations.len() != classifications.len() {
            return None;
        }

        let mut results = Self::with_capacity(locations.len());
        for (location, classification) in locations.iter().zip(classifications) {
            results.push(*location, *classification);
        }
        Some(results)
    }

    /// Append the next cell in detection order.
    pub fn push(&mut self, location: CellLocation, classification: Classification) {
        self.cells.push(DetectedCell {
            location,
            label: classification.label,
            confidence: classification.confidence,
        });
    }

    /// Drop all cells so the store can be reused for another image.
    pub fn reset(&mut self) {
        self.cells.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, DetectedCell> {
        self.cells.iter()
    }

    pub fn as_slice(&self) -> &[DetectedCell] {
        &self.cells
    }

    pub fn infected_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_infected()).count()
    }

    /// Confidences of infected cells, in detection order.
    pub fn infected_confidences(&self) -> impl Iterator<Item = f32> + '_ {
        self.cells
            .iter()
            .filter(|c| c.is_infected())
            .map(|c| c.confidence)
    }
}

impl<'a> IntoIterator for &'a CellResults {
    type Item = &'a DetectedCell;
    type IntoIter = std::slice::Iter<'a, DetectedCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
