//! Window chrome: the toolbar palette, the thumbnail sidebar and the canvas,
//! painted straight into the window's RGBA frame buffer.

use rayon::prelude::*;

use crate::board::Whiteboard;
use crate::compositor::{ThumbnailStrip, BORDER_COLOR, HANDLE_COLOR};
use crate::config::{Settings, PALETTE};
use crate::geometry::{Point, Rect, Size};
use crate::raster::Color;

const CHROME_COLOR: Color = [40, 40, 40, 255];
const TOOLBAR_COLOR: Color = [60, 60, 60, 255];
const SELECTED_COLOR: Color = [255, 255, 255, 255];
const ACTIVE_THUMB_COLOR: Color = [30, 144, 255, 255];

const SWATCH_SIZE: f32 = 30.0;
const SWATCH_STRIDE: f32 = 40.0;
const SWATCH_MARGIN: f32 = 10.0;

/// Something clickable in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarHit {
    Color(usize),
}

/// Fixed regions of the window, plus how far the thumbnail strip is scrolled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub sidebar_width: u32,
    pub toolbar_height: u32,
    sidebar_scroll: f32,
}

impl Layout {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sidebar_width: settings.sidebar_width,
            toolbar_height: settings.toolbar_height,
            sidebar_scroll: 0.0,
        }
    }

    pub fn sidebar_scroll(&self) -> f32 {
        self.sidebar_scroll
    }

    fn sidebar_viewport(&self, window_height: u32) -> f32 {
        window_height.saturating_sub(self.toolbar_height) as f32
    }

    /// Scroll the thumbnail strip by `delta` pixels (positive moves towards
    /// later slides), clamped so the strip never scrolls past its content.
    pub fn scroll_sidebar(&mut self, delta: f32, strip: &ThumbnailStrip, window_height: u32) {
        let max = (strip.content_height() - self.sidebar_viewport(window_height)).max(0.0);
        self.sidebar_scroll = (self.sidebar_scroll + delta).clamp(0.0, max);
    }

    /// Scroll just enough to show the active thumbnail
    pub fn reveal_active(&mut self, strip: &ThumbnailStrip, window_height: u32) {
        let Some(active) = strip.thumbnails().iter().find(|t| t.active) else {
            return;
        };
        let viewport = self.sidebar_viewport(window_height);
        if active.bounds.y < self.sidebar_scroll {
            self.sidebar_scroll = active.bounds.y;
        } else if active.bounds.bottom() > self.sidebar_scroll + viewport {
            self.sidebar_scroll = active.bounds.bottom() - viewport;
        }
        self.scroll_sidebar(0.0, strip, window_height);
    }

    pub fn canvas_origin(&self) -> Point {
        Point::new(self.sidebar_width as f32, self.toolbar_height as f32)
    }

    pub fn in_toolbar(&self, p: Point) -> bool {
        p.y >= 0.0 && p.y < self.toolbar_height as f32
    }

    pub fn in_sidebar(&self, p: Point) -> bool {
        !self.in_toolbar(p) && p.x >= 0.0 && p.x < self.sidebar_width as f32
    }

    /// Window point to thumbnail-strip coordinates
    pub fn to_sidebar(&self, p: Point) -> Point {
        Point::new(p.x, p.y - self.toolbar_height as f32 + self.sidebar_scroll)
    }

    fn swatch_rect(&self, index: usize) -> Rect {
        let y = (self.toolbar_height as f32 - SWATCH_SIZE) / 2.0;
        Rect::new(SWATCH_MARGIN + index as f32 * SWATCH_STRIDE, y, SWATCH_SIZE, SWATCH_SIZE)
    }

    fn indicator_rect(&self, slot: usize) -> Rect {
        self.swatch_rect(PALETTE.len() + 1 + slot)
    }

    pub fn toolbar_hit(&self, p: Point) -> Option<ToolbarHit> {
        (0..PALETTE.len())
            .find(|&i| self.swatch_rect(i).contains(p))
            .map(ToolbarHit::Color)
    }
}

/// Opaque rectangle fill with clipping
fn fill_rect(frame: &mut [u8], size: Size, rect: Rect, color: Color) {
    let x0 = (rect.x.round() as i64).clamp(0, size.width as i64) as usize;
    let x1 = (rect.right().round() as i64).clamp(0, size.width as i64) as usize;
    let y0 = (rect.y.round() as i64).clamp(0, size.height as i64) as usize;
    let y1 = (rect.bottom().round() as i64).clamp(0, size.height as i64) as usize;
    let stride = size.width as usize * 4;

    for y in y0..y1 {
        let row = &mut frame[y * stride..(y + 1) * stride];
        for pixel in row[x0 * 4..x1 * 4].chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }
}

fn outline_rect(frame: &mut [u8], size: Size, rect: Rect, thickness: f32, color: Color) {
    let t = thickness;
    fill_rect(frame, size, Rect::new(rect.x - t, rect.y - t, rect.w + 2.0 * t, t), color);
    fill_rect(frame, size, Rect::new(rect.x - t, rect.bottom(), rect.w + 2.0 * t, t), color);
    fill_rect(frame, size, Rect::new(rect.x - t, rect.y, t, rect.h), color);
    fill_rect(frame, size, Rect::new(rect.right(), rect.y, t, rect.h), color);
}

/// Copy an RGBA image into the frame with its top-left at `at`, clipped
fn blit(frame: &mut [u8], size: Size, src: &[u8], src_size: Size, at: Point) {
    let ox = at.x.round() as i64;
    let oy = at.y.round() as i64;
    let x0 = ox.max(0);
    let x1 = (ox + src_size.width as i64).min(size.width as i64);
    if x0 >= x1 {
        return;
    }
    let stride = size.width as usize * 4;
    let src_stride = src_size.width as usize * 4;
    let span = (x1 - x0) as usize * 4;
    let src_x = (x0 - ox) as usize * 4;

    for sy in 0..src_size.height as i64 {
        let y = oy + sy;
        if y < 0 || y >= size.height as i64 {
            continue;
        }
        let dst_start = y as usize * stride + x0 as usize * 4;
        let src_start = sy as usize * src_stride + src_x;
        frame[dst_start..dst_start + span].copy_from_slice(&src[src_start..src_start + span]);
    }
}

/// Paint the whole window: chrome, thumbnails, toolbar and the composited
/// canvas. The board must have been rendered beforehand.
pub fn paint(frame: &mut [u8], window: Size, layout: &Layout, board: &Whiteboard) {
    if frame.len() < window.area() * 4 {
        return;
    }
    frame.par_chunks_mut(4).for_each(|p| p.copy_from_slice(&CHROME_COLOR));

    // Thumbnail sidebar, painted before the toolbar so thumbnails scrolled
    // above the strip end up underneath it
    let strip_top = layout.toolbar_height as f32 - layout.sidebar_scroll;
    for thumb in board.thumbnails().thumbnails() {
        let at = Point::new(thumb.bounds.x, thumb.bounds.y + strip_top);
        if at.y >= window.height as f32 {
            break;
        }
        if at.y + thumb.bounds.h <= layout.toolbar_height as f32 {
            continue;
        }
        blit(frame, window, thumb.image.as_raw(), thumb.image.size(), at);
        if thumb.active {
            let rect = Rect::new(at.x, at.y, thumb.bounds.w, thumb.bounds.h);
            outline_rect(frame, window, rect, 3.0, ACTIVE_THUMB_COLOR);
        }
    }

    // Toolbar
    fill_rect(
        frame,
        window,
        Rect::new(0.0, 0.0, window.width as f32, layout.toolbar_height as f32),
        TOOLBAR_COLOR,
    );
    let pen = board.pen();
    for (i, color) in PALETTE.iter().enumerate() {
        let rect = layout.swatch_rect(i);
        fill_rect(frame, window, rect, *color);
        if !pen.erasing && pen.color == *color {
            outline_rect(frame, window, rect, 2.0, SELECTED_COLOR);
        }
    }

    // Pen width preview
    let preview = layout.indicator_rect(0);
    let (width, color) = pen.stroke();
    let bar = width.min(SWATCH_SIZE);
    fill_rect(
        frame,
        window,
        Rect::new(preview.x, preview.y + (SWATCH_SIZE - bar) / 2.0, SWATCH_SIZE, bar),
        color,
    );
    if pen.erasing {
        outline_rect(frame, window, preview, 2.0, HANDLE_COLOR);
    }
    if board.overlays().is_resize_mode() {
        outline_rect(frame, window, layout.indicator_rect(1), 2.0, BORDER_COLOR);
    }

    // Canvas
    let surface = board.frame();
    blit(frame, window, surface.as_raw(), surface.size(), layout.canvas_origin());
}
