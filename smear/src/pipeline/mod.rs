//! Slide analysis orchestration.
//!
//! # Flow
//!
//! 1. **Segmentation**: the external segmenter either rejects the image
//!    (`Retake`) or returns a mask and cell locations in detection order.
//! 2. **Validation**: a rejected image or an empty cell list ends the run with
//!    a recoverable error so the caller can prompt for a new capture.
//! 3. **Classification**: the external classifier labels every cell; the
//!    answers fill a fresh [`CellResults`] owned by this run.
//! 4. **Rendering**: infected cells are annotated on the overlay.
//! 5. **Aggregation**: the image confidence is computed and appended to the
//!    session [`ConfidenceLog`].
//!
//! A run returns either a complete result or an error, never partial counts.
//! Each stage is timed separately in [`AnalysisDiagnostics`].

mod mask_saver;


use std::time::{Duration, Instant};

use crate::annotation::{
    AnnotationParams, AnnotationRenderer, DeviceOrientation, ImageSource, RenderSummary,
};
use crate::cells::CellResults;
use crate::config::{AnalysisConfig, ConfigError};
use crate::confidence::{image_confidence, ConfidenceLog};
use crate::drawing::{Canvas, ImageCanvas, RenderError};
use crate::error::AnalysisError;
use crate::image::Image;
use crate::segmentation::{Classifier, SegmentationMask, SegmentationOutcome, Segmenter};

pub use mask_saver::{MaskSaveError, MaskSaver, SaveHandle};

/// One image to analyze.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    /// Working image, already resized by `reference_value`.
    pub image: &'a Image,
    pub orientation: DeviceOrientation,
    /// Resize scale between original and working image.
    pub reference_value: f32,
    pub source: ImageSource,
    /// File name of the capture, used to name the saved mask.
    pub image_name: Option<&'a str>,
}

/// Counts and confidence for one successfully analyzed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageAnalysisResult {
    pub infected_count: usize,
    pub cell_count: usize,
    /// Aggregated confidence of infected cells, 0.0 when none are infected.
    pub image_confidence: f32,
}

/// Per-stage wall-clock timings of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalysisDiagnostics {
    pub segmentation: Duration,
    pub classification: Duration,
    pub rendering: Duration,
    pub aggregation: Duration,
    /// Whether a background mask save was started for this run.
    pub mask_save_started: bool,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub result: ImageAnalysisResult,
    /// Classified cells in detection order.
    pub cells: CellResults,
    pub annotations: RenderSummary,
    pub diagnostics: AnalysisDiagnostics,
}

/// [`AnalysisOutput`] together with the rendered overlay.
#[derive(Debug, Clone)]
pub struct AnnotatedAnalysis {
    pub output: AnalysisOutput,
    /// Copy of the working image with markers and labels drawn on it.
    pub overlay: Image,
}

/// Segmented and classified cells waiting to be rendered.
struct ClassifiedRun {
    mask: SegmentationMask,
    cells: CellResults,
    diagnostics: AnalysisDiagnostics,
}

/// Runs segmentation, classification, annotation and aggregation for one
/// image at a time.
///
/// Holds no per-run state, so a single pipeline can be shared between worker
/// threads. Runs that belong to the same session should be serialized so
/// their confidences land in the log in capture order.
pub struct SlideAnalysisPipeline {
    config: AnalysisConfig,
    renderer: AnnotationRenderer,
    segmenter: Box<dyn Segmenter>,
    classifier: Box<dyn Classifier>,
    confidence_log: ConfidenceLog,
    mask_saver: Option<MaskSaver>,
}

impl std::fmt::Debug for SlideAnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideAnalysisPipeline")
            .field("config", &self.config)
            .field("confidence_log", &self.confidence_log)
            .field("mask_saver", &self.mask_saver)
            .finish_non_exhaustive()
    }
}

impl SlideAnalysisPipeline {
    pub fn new(
        config: AnalysisConfig,
        segmenter: impl Segmenter + 'static,
        classifier: impl Classifier + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mask_saver = config
            .mask_saving
            .enabled
            .then(|| MaskSaver::new(config.mask_saving.directory.clone()));

        Ok(Self {
            renderer: AnnotationRenderer::new(config.annotation.clone()),
            config,
            segmenter: Box::new(segmenter),
            classifier: Box::new(classifier),
            confidence_log: ConfidenceLog::new(),
            mask_saver,
        })
    }

    /// Append image confidences to an existing session log instead of a private one.
    pub fn with_confidence_log(mut self, log: ConfidenceLog) -> Self {
        self.confidence_log = log;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn confidence_log(&self) -> &ConfidenceLog {
        &self.confidence_log
    }

    /// Analyze an image and render the overlay onto a copy of it.
    pub fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnnotatedAnalysis, AnalysisError> {
        let classified = self.segment_and_classify(request)?;

        let mut overlay = request.image.clone();
        let output = {
            let mut canvas = ImageCanvas::new(&mut overlay)?
                .with_text_scale(self.config.annotation.text_scale);
            self.render_and_aggregate(request, classified, &mut canvas)?
        };

        Ok(AnnotatedAnalysis { output, overlay })
    }

    /// Analyze an image, drawing annotations onto `canvas`.
    ///
    /// `canvas` must match the working image size. It is only checked once
    /// segmentation has accepted the image, so a retake verdict always wins.
    /// On error the canvas may hold partial drawing and should be discarded.
    pub fn analyze_on<C: Canvas + ?Sized>(
        &self,
        request: &AnalysisRequest<'_>,
        canvas: &mut C,
    ) -> Result<AnalysisOutput, AnalysisError> {
        let classified = self.segment_and_classify(request)?;
        self.render_and_aggregate(request, classified, canvas)
    }

    fn segment_and_classify(
        &self,
        request: &AnalysisRequest<'_>,
    ) -> Result<ClassifiedRun, AnalysisError> {
        let rv = request.reference_value;
        if !rv.is_finite() || rv <= 0.0 {
            return Err(AnalysisError::InvalidReferenceValue(rv));
        }

        let image = request.image;
        let mut diagnostics = AnalysisDiagnostics::default();

        // Step 1: Segmentation
        let start = Instant::now();
        let outcome = self
            .segmenter
            .segment(image, rv)
            .map_err(AnalysisError::Segmentation)?;
        diagnostics.segmentation = start.elapsed();
        tracing::debug!("Segmentation time: {:?}", diagnostics.segmentation);

        // Step 2: Validation
        let (mask, locations) = match outcome {
            SegmentationOutcome::Retake => {
                tracing::info!("Segmentation rejected the image, retake required");
                return Err(AnalysisError::DegenerateImage);
            }
            SegmentationOutcome::Segmented { cells, .. } if cells.is_empty() => {
                tracing::info!("Segmentation produced no cells, retake required");
                return Err(AnalysisError::NoCellsDetected);
            }
            SegmentationOutcome::Segmented { mask, cells } => (mask, cells),
        };

        // Step 3: Classification into a store owned by this run
        let start = Instant::now();
        let classifications = self
            .classifier
            .classify(image, &mask, &locations)
            .map_err(AnalysisError::Classification)?;
        let cells = CellResults::from_parts(&locations, &classifications).ok_or(
            AnalysisError::ClassificationMismatch {
                expected: locations.len(),
                actual: classifications.len(),
            },
        )?;
        if let Some((index, cell)) = cells
            .iter()
            .enumerate()
            .find(|(_, c)| c.is_infected() && !(0.0..=1.0).contains(&c.confidence))
        {
            return Err(AnalysisError::InvalidConfidence {
                index,
                value: cell.confidence,
            });
        }
        diagnostics.classification = start.elapsed();
        tracing::debug!(
            "Classification time: {:?} ({} cells)",
            diagnostics.classification,
            cells.len()
        );

        Ok(ClassifiedRun {
            mask,
            cells,
            diagnostics,
        })
    }

    fn render_and_aggregate<C: Canvas + ?Sized>(
        &self,
        request: &AnalysisRequest<'_>,
        run: ClassifiedRun,
        canvas: &mut C,
    ) -> Result<AnalysisOutput, AnalysisError> {
        let ClassifiedRun {
            mask,
            cells,
            mut diagnostics,
        } = run;

        let image = request.image;
        let (canvas_width, canvas_height) = canvas.size();
        if (canvas_width, canvas_height) != (image.width(), image.height()) {
            return Err(RenderError::SizeMismatch {
                width: image.width(),
                height: image.height(),
                actual_width: canvas_width,
                actual_height: canvas_height,
            }
            .into());
        }

        // Step 4: Rendering
        let start = Instant::now();
        let params = AnnotationParams {
            orientation: request.orientation,
            reference_value: request.reference_value,
            source: request.source,
        };
        let annotations = self.renderer.render(&cells, &params, canvas)?;
        diagnostics.rendering = start.elapsed();
        tracing::debug!("Rendering time: {:?}", diagnostics.rendering);

        // Step 5: Aggregation
        let start = Instant::now();
        let confidence = image_confidence(&cells, self.config.aggregation);
        diagnostics.aggregation = start.elapsed();
        debug_assert_eq!(annotations.infected_count, cells.infected_count());

        let result = ImageAnalysisResult {
            infected_count: annotations.infected_count,
            cell_count: cells.len(),
            image_confidence: confidence,
        };
        self.confidence_log.append(confidence);

        if let (Some(saver), Some(name)) = (&self.mask_saver, request.image_name) {
            diagnostics.mask_save_started = saver.spawn(mask, name).is_some();
        }

        tracing::info!(
            "Analyzed image: infected={}, cells={}, confidence={:.3}",
            result.infected_count,
            result.cell_count,
            result.image_confidence
        );

        Ok(AnalysisOutput {
            result,
            cells,
            annotations,
            diagnostics,
        })
    }
}
