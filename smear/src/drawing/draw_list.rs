use glam::Vec2;

use super::{check_finite, Canvas, RenderError};
use crate::image::Color;

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        origin: Vec2,
        text: String,
        color: Color,
        /// Net rotation in effect when the text was drawn, in degrees.
        rotation: f32,
    },
    Save,
    Rotate {
        degrees: f32,
        pivot: Vec2,
    },
    Restore,
}

/// Canvas that records commands instead of rasterizing them.
///
/// Lets a UI layer draw the overlay natively on top of the displayed image,
/// or replay it later onto any other [`Canvas`].
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    rotation: f32,
    saved_rotations: Vec<f32>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text commands in draw order as (text, origin, net rotation).
    pub fn texts(&self) -> impl Iterator<Item = (&str, Vec2, f32)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text {
                text,
                origin,
                rotation,
                ..
            } => Some((text.as_str(), *origin, *rotation)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::FillCircle { center, color, .. } => Some((*center, *color)),
            _ => None,
        })
    }

    pub fn depth(&self) -> usize {
        self.saved_rotations.len()
    }

    /// Replay every recorded command onto `target`.
    pub fn replay<C: Canvas + ?Sized>(&self, target: &mut C) -> Result<(), RenderError> {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => target.fill_circle(*center, *radius, *color)?,
                DrawCommand::Text {
                    origin,
                    text,
                    color,
                    ..
                } => target.draw_text(*origin, text, *color)?,
                DrawCommand::Save => target.save(),
                DrawCommand::Rotate { degrees, pivot } => target.rotate(*degrees, *pivot),
                DrawCommand::Restore => target.restore()?,
            }
        }
        Ok(())
    }
}

impl Canvas for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RenderError> {
        check_finite(center)?;
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn draw_text(&mut self, origin: Vec2, text: &str, color: Color) -> Result<(), RenderError> {
        check_finite(origin)?;
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
            color,
            rotation: self.rotation,
        });
        Ok(())
    }

    fn save(&mut self) {
        self.saved_rotations.push(self.rotation);
        self.commands.push(DrawCommand::Save);
    }

    fn rotate(&mut self, degrees: f32, pivot: Vec2) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
        self.commands.push(DrawCommand::Rotate { degrees, pivot });
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        self.rotation = self
            .saved_rotations
            .pop()
            .ok_or(RenderError::UnbalancedRestore)?;
        self.commands.push(DrawCommand::Restore);
        Ok(())
    }
}
