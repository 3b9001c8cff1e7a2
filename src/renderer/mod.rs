//! Procedural rendering
//!
//! Everything is drawn from simple shapes through [`RenderSurface`], a narrow
//! canvas-2D style interface with a save/restore transform stack. The browser
//! backs it with a canvas context; headless runs and tests record commands.

pub mod shapes;

use glam::Vec2;

pub use shapes::{draw_background, draw_fighter};

/// RGBA color (alpha in 0-1, like CSS)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string
    pub fn css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// 2D drawing target
pub trait RenderSurface {
    /// Current drawable size (width, height), queried every frame
    fn size(&self) -> (f32, f32);

    fn clear(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_arc(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_arc(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color);
    fn draw_line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    /// Fill a rectangle with a top-to-bottom linear gradient
    fn fill_vertical_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Color,
        bottom: Color,
    );

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Scale the current transform; a negative factor mirrors that axis
    fn scale(&mut self, sx: f32, sy: f32);
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { x: f32, y: f32, w: f32, h: f32 },
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Color },
    FillArc { center: Vec2, radius: f32, color: Color },
    StrokeArc { center: Vec2, radius: f32, line_width: f32, color: Color },
    Line { from: Vec2, to: Vec2, line_width: f32, color: Color },
    Polygon { points: Vec<Vec2>, color: Color },
    Gradient { x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color },
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    Scale { sx: f32, sy: f32 },
}

/// Surface that only records what would have been drawn
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Commands recorded since the last `Clear`
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear { .. }))
            .unwrap_or(0);
        &self.commands[start..]
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::Clear { x, y, w, h });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillArc { center, radius, color });
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeArc {
            center,
            radius,
            line_width,
            color,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            line_width,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_vertical_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Color,
        bottom: Color,
    ) {
        self.commands.push(DrawCommand::Gradient {
            x,
            y,
            w,
            h,
            top,
            bottom,
        });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.commands.push(DrawCommand::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale { sx, sy });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_colors() {
        assert_eq!(Color::rgb(0, 230, 118).css(), "rgb(0,230,118)");
        assert_eq!(Color::rgba(255, 255, 255, 0.35).css(), "rgba(255,255,255,0.35)");
    }

    #[test]
    fn test_last_frame_starts_at_clear() {
        let mut s = RecordingSurface::new(100.0, 100.0);
        s.save();
        s.clear(0.0, 0.0, 100.0, 100.0);
        s.restore();
        assert_eq!(s.last_frame().len(), 2);
        assert!(matches!(s.last_frame()[0], DrawCommand::Clear { .. }));
    }
}
