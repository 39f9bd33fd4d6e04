//! Drawing surface abstraction for result overlays.
//!
//! [`Canvas`] is the minimal surface the annotation renderer needs: filled
//! circles, text, and a save/rotate/restore transform stack. Two surfaces are
//! provided:
//! - [`ImageCanvas`] rasterizes directly into an [`Image`](crate::Image).
//! - [`DrawList`] records commands so a UI layer can replay them elsewhere.

mod draw_list;
mod font;
mod image_canvas;

#[cfg(test)]
mod tests;

use glam::Vec2;
use thiserror::Error;

use crate::image::Color;

pub use draw_list::{DrawCommand, DrawList};
pub use image_canvas::ImageCanvas;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Canvas has no drawable area ({width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("Canvas is {actual_width}x{actual_height}, image is {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("restore() called without a matching save()")]
    UnbalancedRestore,

    #[error("Non-finite drawing coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f32, y: f32 },
}

/// A 2D drawing surface in pixel coordinates (x right, y down).
///
/// Rotations follow screen convention: positive degrees turn clockwise.
pub trait Canvas {
    /// Surface size as (width, height).
    fn size(&self) -> (u32, u32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RenderError>;

    /// Draw `text` with its baseline-left corner at `origin`.
    fn draw_text(&mut self, origin: Vec2, text: &str, color: Color) -> Result<(), RenderError>;

    /// Push the current transform.
    fn save(&mut self);

    /// Rotate subsequent drawing by `degrees` around `pivot`.
    fn rotate(&mut self, degrees: f32, pivot: Vec2);

    /// Pop the transform pushed by the matching [`Canvas::save`].
    fn restore(&mut self) -> Result<(), RenderError>;
}

/// Run `draw` with a rotation that is undone afterwards, even if `draw` fails.
pub fn with_rotation<C, R, F>(
    canvas: &mut C,
    degrees: f32,
    pivot: Vec2,
    draw: F,
) -> Result<R, RenderError>
where
    C: Canvas + ?Sized,
    F: FnOnce(&mut C) -> Result<R, RenderError>,
{
    canvas.save();
    canvas.rotate(degrees, pivot);
    let result = draw(canvas);
    let restored = canvas.restore();

    let value = result?;
    restored?;
    Ok(value)
}

#[inline]
pub(crate) fn check_finite(p: Vec2) -> Result<(), RenderError> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(RenderError::NonFiniteCoordinate { x: p.x, y: p.y })
    }
}
