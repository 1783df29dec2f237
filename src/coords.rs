//! Conversion from window (device) coordinates to canvas-local coordinates.

use crate::geometry::{Point, Rect, Size};

/// Where the canvas sits inside the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    origin: Point,
    size: Size,
}

impl CoordinateMapper {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.size.width as f32,
            self.size.height as f32,
        )
    }

    /// Device position to canvas position. Points outside the canvas map to
    /// out-of-range coordinates rather than being clamped.
    #[inline]
    pub fn to_canvas(&self, device: Point) -> Point {
        device.offset_from(self.origin)
    }

    #[inline]
    pub fn to_device(&self, canvas: Point) -> Point {
        Point::new(canvas.x + self.origin.x, canvas.y + self.origin.y)
    }

    pub fn contains_device(&self, device: Point) -> bool {
        self.bounds().contains(device)
    }
}
