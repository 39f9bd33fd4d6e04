//! Error types for slide analysis.

use thiserror::Error;

use crate::drawing::RenderError;

/// Why an analysis run produced no result.
///
/// [`DegenerateImage`](AnalysisError::DegenerateImage) and
/// [`NoCellsDetected`](AnalysisError::NoCellsDetected) are expected outcomes
/// that should prompt the user to recapture; the rest abort the current run
/// only.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Image is unusable for segmentation, retake required")]
    DegenerateImage,

    #[error("Segmentation found no cells, retake or reframe required")]
    NoCellsDetected,

    #[error("Reference value must be finite and positive, got {0}")]
    InvalidReferenceValue(f32),

    #[error("Segmentation failed: {0:#}")]
    Segmentation(anyhow::Error),

    #[error("Classification failed: {0:#}")]
    Classification(anyhow::Error),

    #[error("Classifier returned {actual} results for {expected} cells")]
    ClassificationMismatch { expected: usize, actual: usize },

    #[error("Classifier confidence {value} for infected cell {index} is outside [0, 1]")]
    InvalidConfidence { index: usize, value: f32 },

    #[error("Rendering failed: {0}")]
    Rendering(#[from] RenderError),
}

impl AnalysisError {
    /// True for the outcomes the user resolves by capturing a new image.
    pub fn requires_retake(&self) -> bool {
        matches!(
            self,
            AnalysisError::DegenerateImage | AnalysisError::NoCellsDetected
        )
    }
}
