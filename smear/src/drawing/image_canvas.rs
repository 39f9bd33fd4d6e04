use glam::{Affine2, Vec2};

use super::font::{glyph, lit_cells, GLYPH_ADVANCE, GLYPH_HEIGHT};
use super::{check_finite, Canvas, RenderError};
use crate::image::{Color, Image};

/// Canvas that rasterizes into an [`Image`].
///
/// Text uses the built-in 5x7 digit font, scaled by an integer factor.
#[derive(Debug)]
pub struct ImageCanvas<'a> {
    image: &'a mut Image,
    transform: Affine2,
    stack: Vec<Affine2>,
    text_scale: u32,
}

impl<'a> ImageCanvas<'a> {
    pub fn new(image: &'a mut Image) -> Result<Self, RenderError> {
        if image.is_empty() {
            return Err(RenderError::EmptyCanvas {
                width: image.width(),
                height: image.height(),
            });
        }

        Ok(Self {
            image,
            transform: Affine2::IDENTITY,
            stack: Vec::new(),
            text_scale: 1,
        })
    }

    pub fn with_text_scale(mut self, scale: u32) -> Self {
        self.text_scale = scale.max(1);
        self
    }

    /// Number of saved transforms not yet restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    fn plot(&mut self, local: Vec2, color: Color) {
        let p = self.transform.transform_point2(local);
        self.image
            .blend_pixel(p.x.floor() as i64, p.y.floor() as i64, color);
    }
}

impl Canvas for ImageCanvas<'_> {
    fn size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RenderError> {
        check_finite(center)?;
        check_finite(Vec2::splat(radius))?;

        let c = self.transform.transform_point2(center);
        let r = radius.max(0.0);
        let r_sq = r * r;

        // Bounding box clipped to the image
        let width = self.image.width() as i64;
        let height = self.image.height() as i64;
        let x_min = ((c.x - r).floor() as i64).max(0);
        let x_max = ((c.x + r).ceil() as i64).min(width - 1);
        let y_min = ((c.y - r).floor() as i64).max(0);
        let y_max = ((c.y + r).ceil() as i64).min(height - 1);

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let dx = x as f32 - c.x;
                let dy = y as f32 - c.y;
                if dx * dx + dy * dy <= r_sq {
                    self.image.blend_pixel(x, y, color);
                }
            }
        }

        Ok(())
    }

    fn draw_text(&mut self, origin: Vec2, text: &str, color: Color) -> Result<(), RenderError> {
        check_finite(origin)?;

        let scale = self.text_scale;
        let top = origin.y - (GLYPH_HEIGHT * scale) as f32;
        let mut pen_x = origin.x;

        for ch in text.chars() {
            if let Some(rows) = glyph(ch) {
                for (col, row) in lit_cells(rows) {
                    let cell_x = pen_x + (col * scale) as f32;
                    let cell_y = top + (row * scale) as f32;
                    // Sample every covered pixel center so rotated glyphs stay solid.
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let local =
                                Vec2::new(cell_x + sx as f32 + 0.5, cell_y + sy as f32 + 0.5);
                            self.plot(local, color);
                        }
                    }
                }
            }
            pen_x += (GLYPH_ADVANCE * scale) as f32;
        }

        Ok(())
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn rotate(&mut self, degrees: f32, pivot: Vec2) {
        let local = Affine2::from_translation(pivot)
            * Affine2::from_angle(degrees.to_radians())
            * Affine2::from_translation(-pivot);
        self.transform = self.transform * local;
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        self.transform = self.stack.pop().ok_or(RenderError::UnbalancedRestore)?;
        Ok(())
    }
}
