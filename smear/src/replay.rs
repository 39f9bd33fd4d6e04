//! Replay of previously computed detections.
//!
//! A [`DetectionFile`] stores what segmentation and classification produced
//! for one image. [`ReplaySegmenter`] and [`ReplayClassifier`] feed it back
//! through the pipeline, so overlays and confidences can be regenerated
//! without running the models again.
//!
//! ```yaml
//! retake: false
//! cells:
//!   - { row: 120, col: 88, label: infected, confidence: 0.93 }
//!   - { row: 140, col: 301, label: uninfected }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cells::{CellLabel, CellLocation, Classification};
use crate::image::Image;
use crate::segmentation::{Classifier, SegmentationMask, SegmentationOutcome, Segmenter};

/// One recorded cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedCell {
    pub row: u32,
    pub col: u32,
    #[serde(default)]
    pub label: CellLabel,
    #[serde(default)]
    pub confidence: f32,
}

impl RecordedCell {
    pub fn location(&self) -> CellLocation {
        CellLocation::new(self.row, self.col)
    }

    pub fn classification(&self) -> Classification {
        Classification {
            label: self.label,
            confidence: self.confidence,
        }
    }
}

/// Recorded segmentation and classification output for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionFile {
    /// Segmentation rejected the image.
    pub retake: bool,
    /// Cells in detection order.
    pub cells: Vec<RecordedCell>,
}

impl DetectionFile {
    /// Load from a `.yaml`/`.yml`/`.json` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        common::load_from_file(path)
            .with_context(|| format!("Failed to load detections from {}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        common::save_to_file(self, path)
            .with_context(|| format!("Failed to save detections to {}", path.display()))
    }

    pub fn locations(&self) -> Vec<CellLocation> {
        self.cells.iter().map(RecordedCell::location).collect()
    }

    /// Split into a segmenter/classifier pair sharing this file.
    pub fn into_collaborators(self) -> (ReplaySegmenter, ReplayClassifier) {
        let file = Arc::new(self);
        (
            ReplaySegmenter {
                file: Arc::clone(&file),
            },
            ReplayClassifier { file },
        )
    }
}

/// Segmenter that returns the recorded cell locations.
///
/// The mask marks each recorded cell center with its 1-based detection index.
#[derive(Debug, Clone)]
pub struct ReplaySegmenter {
    file: Arc<DetectionFile>,
}

impl Segmenter for ReplaySegmenter {
    fn segment(&self, image: &Image, _reference_value: f32) -> anyhow::Result<SegmentationOutcome> {
        if self.file.retake {
            return Ok(SegmentationOutcome::Retake);
        }

        let (width, height) = (image.width(), image.height());
        let mut labels = vec![0u32; width as usize * height as usize];
        for (i, cell) in self.file.cells.iter().enumerate() {
            if cell.col < width && cell.row < height {
                labels[cell.row as usize * width as usize + cell.col as usize] = i as u32 + 1;
            }
        }
        let mask = SegmentationMask::new(width, height, labels)
            .context("Mask size does not match the image")?;

        Ok(SegmentationOutcome::Segmented {
            mask,
            cells: self.file.locations(),
        })
    }
}

/// Classifier that returns the recorded labels.
#[derive(Debug, Clone)]
pub struct ReplayClassifier {
    file: Arc<DetectionFile>,
}

impl Classifier for ReplayClassifier {
    fn classify(
        &self,
        _image: &Image,
        _mask: &SegmentationMask,
        cells: &[CellLocation],
    ) -> anyhow::Result<Vec<Classification>> {
        if cells.len() != self.file.cells.len() {
            anyhow::bail!(
                "Asked for {} cells, recording has {}",
                cells.len(),
                self.file.cells.len()
            );
        }

        cells
            .iter()
            .zip(&self.file.cells)
            .enumerate()
            .map(|(i, (location, recorded))| {
                if *location != recorded.location() {
                    anyhow::bail!(
                        "Cell {} at ({}, {}) does not match recording ({}, {})",
                        i,
                        location.row,
                        location.col,
                        recorded.row,
                        recorded.col
                    );
                }
                Ok(recorded.classification())
            })
            .collect()
    }
}
