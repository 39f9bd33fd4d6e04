//! Confidence bands used to color infected-cell markers.

use serde::{Deserialize, Serialize};

use crate::image::Color;

/// Marker color level. `L0` is the fallback for confidences outside every band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    L0,
    L1,
    L2,
    L3,
    L4,
    L5,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 6] = [
        ConfidenceLevel::L0,
        ConfidenceLevel::L1,
        ConfidenceLevel::L2,
        ConfidenceLevel::L3,
        ConfidenceLevel::L4,
        ConfidenceLevel::L5,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Half-open band `(lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBand {
    pub lower: f32,
    pub upper: f32,
    pub level: ConfidenceLevel,
}

impl ConfidenceBand {
    #[inline]
    pub fn contains(&self, confidence: f32) -> bool {
        confidence > self.lower && confidence <= self.upper
    }
}

/// Ordered, non-overlapping bands partitioning (0.5, 1.0].
pub const CONFIDENCE_BANDS: [ConfidenceBand; 5] = [
    ConfidenceBand {
        lower: 0.5,
        upper: 0.6,
        level: ConfidenceLevel::L1,
    },
    ConfidenceBand {
        lower: 0.6,
        upper: 0.7,
        level: ConfidenceLevel::L2,
    },
    ConfidenceBand {
        lower: 0.7,
        upper: 0.8,
        level: ConfidenceLevel::L3,
    },
    ConfidenceBand {
        lower: 0.8,
        upper: 0.9,
        level: ConfidenceLevel::L4,
    },
    ConfidenceBand {
        lower: 0.9,
        upper: 1.0,
        level: ConfidenceLevel::L5,
    },
];

/// Band level for `confidence`. Values at or below 0.5, above 1.0, or NaN map to `L0`.
pub fn confidence_level(confidence: f32) -> ConfidenceLevel {
    CONFIDENCE_BANDS
        .iter()
        .find(|band| band.contains(confidence))
        .map_or(ConfidenceLevel::L0, |band| band.level)
}

/// One marker color per [`ConfidenceLevel`], indexed by level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPalette {
    pub colors: [Color; 6],
}

impl BandPalette {
    #[inline]
    pub fn color(&self, level: ConfidenceLevel) -> Color {
        self.colors[level.index()]
    }
}

impl Default for BandPalette {
    fn default() -> Self {
        Self {
            colors: [
                Color::from_hex(0x9E9E9E), // L0 grey
                Color::from_hex(0xFFEB3B), // L1 yellow
                Color::from_hex(0xFFC107), // L2 amber
                Color::from_hex(0xFF9800), // L3 orange
                Color::from_hex(0xFF5722), // L4 deep orange
                Color::from_hex(0xF44336), // L5 red
            ],
        }
    }
}
