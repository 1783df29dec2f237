//! Test helpers for building boards and driving the pointer.

use std::cell::RefCell;

use image::{Rgba, RgbaImage};
use slideboard::acquire::DecodedImage;
use slideboard::error::ExportError;
use slideboard::export::DocumentExporter;
use slideboard::raster::Color;
use slideboard::{PointerEvent, Settings, Size, Whiteboard};

pub const WHITE: Color = [255, 255, 255, 255];
pub const BLACK: Color = [0, 0, 0, 255];
pub const BLUE: Color = [0, 0, 255, 255];
pub const RED: Color = [255, 0, 0, 255];

/// A board with default settings and one blank slide
pub fn board(width: u32, height: u32) -> Whiteboard {
    Whiteboard::new(Settings::default(), Size::new(width, height))
}

pub fn solid_image(width: u32, height: u32, color: Color) -> DecodedImage {
    DecodedImage::new(RgbaImage::from_pixel(width, height, Rgba(color)), "test")
        .expect("non-empty image")
}

/// Press, drag in a straight line, release
pub fn stroke(board: &mut Whiteboard, from: (f32, f32), to: (f32, f32)) {
    board.handle_pointer(PointerEvent::down(from.0, from.1));
    board.handle_pointer(PointerEvent::moved(to.0, to.1));
    board.handle_pointer(PointerEvent::up(to.0, to.1));
}

pub fn slide_pixel(board: &Whiteboard, index: usize, x: u32, y: u32) -> Option<Color> {
    board.store().get(index).and_then(|s| s.pixel(x, y))
}

/// Exporter that records the pages it was handed instead of writing a PDF
#[derive(Default)]
pub struct RecordingExporter {
    pub pages: RefCell<Vec<RgbaImage>>,
    pub page_size: RefCell<Option<(u32, u32)>>,
}

impl DocumentExporter for RecordingExporter {
    fn export(&self, pages: &[RgbaImage], page_width: u32, page_height: u32) -> Result<Vec<u8>, ExportError> {
        if pages.is_empty() {
            return Err(ExportError::NoPages);
        }
        *self.pages.borrow_mut() = pages.to_vec();
        *self.page_size.borrow_mut() = Some((page_width, page_height));
        Ok(b"%PDF-test".to_vec())
    }
}
