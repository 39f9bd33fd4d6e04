//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use smear::prelude::*;
//! ```

// Core types
pub use crate::{CellLabel, CellLocation, CellResults, Classification, Color, Image};

// Pipeline - main API
pub use crate::{
    AnalysisConfig, AnalysisError, AnalysisRequest, AnnotatedAnalysis, ConfidenceLog,
    DeviceOrientation, ImageAnalysisResult, ImageSource, SlideAnalysisPipeline,
};

// External stages
pub use crate::{Classifier, DetectionFile, SegmentationMask, SegmentationOutcome, Segmenter};
