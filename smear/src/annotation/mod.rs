//! Overlay rendering for classified cells.
//!
//! Walks cells in detection order. Each infected cell gets a filled marker,
//! colored by its confidence band, and a label with the running infected
//! count (1-based). Uninfected cells are not drawn. For camera captures the
//! label is rotated around its marker so it reads upright in the orientation
//! the device was held; the rotation is scoped to that one label.

mod bands;
mod orientation;


use glam::Vec2;

use crate::cells::{CellLocation, CellResults};
use crate::config::AnnotationConfig;
use crate::drawing::{with_rotation, Canvas, RenderError};

pub use bands::{confidence_level, BandPalette, ConfidenceBand, ConfidenceLevel, CONFIDENCE_BANDS};
pub use orientation::{label_rotation, DeviceOrientation, ImageSource};

/// Per-image inputs to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationParams {
    pub orientation: DeviceOrientation,
    /// Scale between cell locations and canvas pixels (`canvas = location / reference_value`).
    pub reference_value: f32,
    pub source: ImageSource,
}

/// What was drawn for one infected cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedCell {
    /// Position of the cell in detection order.
    pub index: usize,
    /// Running infected count, which is also the label text.
    pub ordinal: usize,
    pub level: ConfidenceLevel,
    pub marker: Vec2,
    /// Canvas rotation applied around the label, `None` for axis-aligned text.
    pub label_rotation: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    pub infected_count: usize,
    pub annotated: Vec<AnnotatedCell>,
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationRenderer {
    config: AnnotationConfig,
}

impl AnnotationRenderer {
    pub fn new(config: AnnotationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// Marker position on the canvas for a cell location.
    #[inline]
    pub fn marker_position(location: CellLocation, reference_value: f32) -> Vec2 {
        Vec2::new(
            location.col as f32 / reference_value,
            location.row as f32 / reference_value,
        )
    }

    pub fn render<C: Canvas + ?Sized>(
        &self,
        cells: &CellResults,
        params: &AnnotationParams,
        canvas: &mut C,
    ) -> Result<RenderSummary, RenderError> {
        let (width, height) = canvas.size();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas { width, height });
        }

        let rotation = label_rotation(params.orientation, params.source);
        let offset = Vec2::from(self.config.label_offset);
        let mut summary = RenderSummary::default();

        for (index, cell) in cells.iter().enumerate() {
            if !cell.is_infected() {
                continue;
            }
            summary.infected_count += 1;

            let level = confidence_level(cell.confidence);
            let color = self.config.palette.color(level);
            let marker = Self::marker_position(cell.location, params.reference_value);

            canvas.fill_circle(marker, self.config.marker_radius, color)?;

            let text = summary.infected_count.to_string();
            let origin = marker + offset;
            match rotation {
                Some(degrees) => with_rotation(canvas, degrees, marker, |c| {
                    c.draw_text(origin, &text, color)
                })?,
                None => canvas.draw_text(origin, &text, color)?,
            }

            summary.annotated.push(AnnotatedCell {
                index,
                ordinal: summary.infected_count,
                level,
                marker,
                label_rotation: rotation,
            });
        }

        Ok(summary)
    }
}
