//! Capture orientation and the label rotation that compensates for it.
//!
//! Only camera captures are rotated; images loaded from storage are already
//! upright and get axis-aligned labels.

use serde::{Deserialize, Serialize};

/// Display rotation of the device when the image was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceOrientation {
    /// Natural portrait.
    #[default]
    Rotation0,
    /// Landscape.
    Rotation90,
    /// Reverse portrait.
    Rotation180,
    /// Reverse landscape.
    Rotation270,
}

impl DeviceOrientation {
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::Rotation0),
            90 => Some(Self::Rotation90),
            180 => Some(Self::Rotation180),
            270 => Some(Self::Rotation270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Rotation0 => 0,
            Self::Rotation90 => 90,
            Self::Rotation180 => 180,
            Self::Rotation270 => 270,
        }
    }

    /// Canvas rotation that makes labels upright for a camera capture.
    pub fn compensating_rotation(self) -> f32 {
        match self {
            Self::Rotation0 => 270.0,
            Self::Rotation270 => 180.0,
            Self::Rotation180 => 90.0,
            Self::Rotation90 => 0.0,
        }
    }
}

/// Where the analyzed image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Captured live; pixels are in sensor orientation.
    #[default]
    Camera,
    /// Loaded from storage; pixels are already upright.
    Storage,
}

/// Rotation to apply around each label, or `None` when labels are drawn axis-aligned.
pub fn label_rotation(orientation: DeviceOrientation, source: ImageSource) -> Option<f32> {
    match source {
        ImageSource::Camera => Some(orientation.compensating_rotation()),
        ImageSource::Storage => None,
    }
}
