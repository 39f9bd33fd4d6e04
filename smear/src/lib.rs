//! Smear - thin blood smear slide analysis.
//!
//! Turns per-cell detections into per-image results:
//! - Aggregation of segmented, classified cells in detection order
//! - Infected-cell overlay with confidence-banded markers and count labels
//! - Image-level confidence (median of infected cell confidences)
//!
//! Segmentation and classification are external; they plug in through the
//! [`Segmenter`] and [`Classifier`] traits.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use smear::prelude::*;
//!
//! let image = Image::read_file("slide_001.jpg")?;
//! let (segmenter, classifier) = DetectionFile::load("slide_001.yaml")?.into_collaborators();
//! let pipeline = SlideAnalysisPipeline::new(AnalysisConfig::default(), segmenter, classifier)?;
//!
//! let analysis = pipeline.analyze(&AnalysisRequest {
//!     image: &image,
//!     orientation: DeviceOrientation::Rotation0,
//!     reference_value: 1.0,
//!     source: ImageSource::Storage,
//!     image_name: Some("slide_001.jpg"),
//! })?;
//!
//! println!("{} of {} cells infected", analysis.output.result.infected_count, analysis.output.result.cell_count);
//! analysis.overlay.save_file("slide_001_overlay.png")?;
//! ```

pub mod annotation;
pub mod cells;
pub mod confidence;
pub mod config;
pub mod drawing;
mod error;
pub mod image;
pub mod pipeline;
pub mod replay;
pub mod segmentation;

pub mod prelude;

// ============================================================================
// Cells and images
// ============================================================================

pub use cells::{CellLabel, CellLocation, CellResults, Classification, DetectedCell};
pub use crate::image::{Color, Image, ImageError};

// ============================================================================
// External stages
// ============================================================================

pub use replay::{DetectionFile, RecordedCell, ReplayClassifier, ReplaySegmenter};
pub use segmentation::{Classifier, SegmentationMask, SegmentationOutcome, Segmenter};

// ============================================================================
// Annotation and drawing
// ============================================================================

pub use annotation::{
    AnnotatedCell, AnnotationParams, AnnotationRenderer, BandPalette, ConfidenceLevel,
    DeviceOrientation, ImageSource, RenderSummary,
};
pub use drawing::{with_rotation, Canvas, DrawCommand, DrawList, ImageCanvas, RenderError};

// ============================================================================
// Confidence
// ============================================================================

pub use confidence::{image_confidence, AggregationMethod, ConfidenceLog};

// ============================================================================
// Pipeline
// ============================================================================

pub use config::{AnalysisConfig, AnnotationConfig, ConfigError, MaskSaveConfig};
pub use error::AnalysisError;
pub use pipeline::{
    AnalysisDiagnostics, AnalysisOutput, AnalysisRequest, AnnotatedAnalysis, ImageAnalysisResult,
    MaskSaveError, MaskSaver, SlideAnalysisPipeline,
};
