use crate::config::Settings;
use crate::raster::Color;

pub const MIN_PEN_WIDTH: f32 = 1.0;
pub const MAX_PEN_WIDTH: f32 = 100.0;

/// Drawing tool state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenState {
    pub color: Color,
    pub width: f32,
    pub erasing: bool,
    eraser_width: f32,
    background: Color,
}

impl PenState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            color: settings.pen_color,
            width: settings.pen_width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH),
            erasing: false,
            eraser_width: settings.eraser_width,
            background: settings.background_color,
        }
    }

    /// Picking a color always switches back to the pen.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.erasing = false;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH);
    }

    pub fn toggle_eraser(&mut self) -> bool {
        self.erasing = !self.erasing;
        self.erasing
    }

    /// Width and color a stroke segment is drawn with right now
    pub fn stroke(&self) -> (f32, Color) {
        if self.erasing {
            (self.eraser_width, self.background)
        } else {
            (self.width, self.color)
        }
    }
}
