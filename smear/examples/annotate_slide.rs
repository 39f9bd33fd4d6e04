//! Example: Annotate a slide image from recorded detections
//!
//! Loads a slide image and a detection file (recorded segmentation and
//! classification output), runs the analysis pipeline and writes the overlay
//! with numbered, confidence-colored markers on infected cells.
//!
//! Detection file (`.yaml` or `.json`):
//! ```yaml
//! retake: false
//! cells:
//!   - { row: 120, col: 88, label: infected, confidence: 0.93 }
//!   - { row: 140, col: 301, label: uninfected }
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --example annotate_slide -- slide.jpg detections.yaml overlay.png \
//!     [--config config.yaml] [--camera] [--orientation 90] [--rv 2.0]
//! ```
//!
//! `--camera` treats the image as a live capture, so labels are rotated to
//! compensate for `--orientation` (device rotation in degrees). `--rv` is the
//! resize scale between the detection coordinates and the image.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use smear::prelude::*;

const USAGE: &str = "usage: annotate_slide <image> <detections.yaml> <output.png> \
[--config <config.yaml>] [--camera] [--orientation <0|90|180|270>] [--rv <value>]";

/// Optional command line settings.
struct Options {
    config: Option<PathBuf>,
    orientation: DeviceOrientation,
    source: ImageSource,
    reference_value: f32,
}

impl Options {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut options = Options {
            config: None,
            orientation: DeviceOrientation::Rotation0,
            source: ImageSource::Storage,
            reference_value: 1.0,
        };

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--camera" => options.source = ImageSource::Camera,
                "--config" => {
                    let value = args.next().context("--config needs a path")?;
                    options.config = Some(PathBuf::from(value));
                }
                "--orientation" => {
                    let value = args.next().context("--orientation needs degrees")?;
                    let degrees: u32 = value
                        .parse()
                        .with_context(|| format!("Invalid orientation '{value}'"))?;
                    options.orientation = DeviceOrientation::from_degrees(degrees)
                        .with_context(|| format!("Orientation must be 0, 90, 180 or 270, got {degrees}"))?;
                }
                "--rv" => {
                    let value = args.next().context("--rv needs a value")?;
                    options.reference_value = value
                        .parse()
                        .with_context(|| format!("Invalid reference value '{value}'"))?;
                }
                other => anyhow::bail!("Unknown argument '{other}'\n{USAGE}"),
            }
        }

        Ok(options)
    }
}

fn main() -> anyhow::Result<()> {
    common::log_setup::setup_logging("info", None)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let [image_path, detections_path, output_path, rest @ ..] = args.as_slice() else {
        anyhow::bail!("{USAGE}");
    };
    let options = Options::parse(rest)?;

    let config = match &options.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let image = Image::read_file(image_path)
        .with_context(|| format!("Failed to read image {image_path}"))?;
    tracing::info!(
        width = image.width(),
        height = image.height(),
        "Image loaded"
    );

    let (segmenter, classifier) = DetectionFile::load(detections_path)?.into_collaborators();
    let pipeline = SlideAnalysisPipeline::new(config, segmenter, classifier)?;

    let image_name = Path::new(image_path)
        .file_name()
        .and_then(|name| name.to_str());
    let request = AnalysisRequest {
        image: &image,
        orientation: options.orientation,
        reference_value: options.reference_value,
        source: options.source,
        image_name,
    };

    let analysis = match pipeline.analyze(&request) {
        Ok(analysis) => analysis,
        Err(e) if e.requires_retake() => {
            tracing::warn!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let result = analysis.output.result;
    tracing::info!(
        infected = result.infected_count,
        cells = result.cell_count,
        confidence = result.image_confidence,
        "Analysis complete"
    );

    let output_path = PathBuf::from(output_path);
    analysis
        .overlay
        .save_file(&output_path)
        .with_context(|| format!("Failed to write overlay {}", output_path.display()))?;
    tracing::info!(path = %output_path.display(), "Overlay saved");

    Ok(())
}
