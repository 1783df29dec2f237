//! Composes the visible surface and the slide thumbnail strip.

use image::RgbaImage;
use rayon::prelude::*;

use crate::geometry::{Point, Rect, Size};
use crate::overlay::{Overlay, OverlayManager};
use crate::raster::{Color, Raster};
use crate::store::RasterStore;

pub const BORDER_COLOR: Color = [0, 255, 255, 255];
pub const HANDLE_COLOR: Color = [255, 0, 0, 255];
pub const BORDER_WIDTH: f32 = 2.0;

const THUMB_PADDING: f32 = 5.0;
const THUMB_GAP: f32 = 10.0;

/// Scaled overlay bitmap from the last render
#[derive(Debug)]
struct ScaledOverlay {
    generation: u64,
    image: RgbaImage,
}

#[derive(Debug, Default)]
pub struct Compositor {
    overlay_cache: Option<ScaledOverlay>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw `surface` from scratch: working canvas, then the overlay, then
    /// resize chrome when the overlay is in resize mode.
    pub fn render(&mut self, canvas: &Raster, overlays: &OverlayManager, surface: &mut Raster) {
        surface.copy_from(canvas);

        let Some(overlay) = overlays.overlay() else {
            self.overlay_cache = None;
            return;
        };
        self.draw_overlay(overlay, surface);

        if overlay.resize_mode {
            surface.stroke_rect(overlay.bounds, BORDER_WIDTH, BORDER_COLOR);
            if let Some(handle) = overlays.handle_rect() {
                surface.fill_rect(handle, HANDLE_COLOR);
            }
        }
    }

    /// Draw the overlay bitmap into `target` without any chrome
    pub fn draw_overlay(&mut self, overlay: &Overlay, target: &mut Raster) {
        let w = overlay.bounds.w.round().max(1.0) as u32;
        let h = overlay.bounds.h.round().max(1.0) as u32;

        let stale = match &self.overlay_cache {
            Some(cached) => cached.generation != overlay.generation || cached.image.dimensions() != (w, h),
            None => true,
        };
        if stale {
            let image = image::imageops::resize(
                &*overlay.bitmap,
                w,
                h,
                image::imageops::FilterType::Triangle,
            );
            self.overlay_cache = Some(ScaledOverlay {
                generation: overlay.generation,
                image,
            });
        }
        if let Some(cached) = &self.overlay_cache {
            target.draw_image_unscaled(&cached.image, overlay.bounds.origin());
        }
    }

    /// Scale every slide down to `thumb_size` and lay them out vertically.
    pub fn render_thumbnails(&self, store: &RasterStore, thumb_size: Size) -> ThumbnailStrip {
        let current = store.current();
        let thumbnails = store
            .slides()
            .par_iter()
            .enumerate()
            .map(|(index, slide)| Thumbnail {
                index,
                image: slide.scaled(thumb_size),
                bounds: ThumbnailStrip::slot(index, thumb_size),
                active: index == current,
            })
            .collect();
        ThumbnailStrip { thumbnails }
    }
}

#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub index: usize,
    pub image: Raster,
    /// Position within the strip
    pub bounds: Rect,
    pub active: bool,
}

/// Thumbnails in presentation order, stacked top to bottom
#[derive(Debug, Clone, Default)]
pub struct ThumbnailStrip {
    thumbnails: Vec<Thumbnail>,
}

impl ThumbnailStrip {
    fn slot(index: usize, size: Size) -> Rect {
        Rect::new(
            THUMB_PADDING,
            THUMB_PADDING + index as f32 * (size.height as f32 + THUMB_GAP),
            size.width as f32,
            size.height as f32,
        )
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    pub fn len(&self) -> usize {
        self.thumbnails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbnails.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.thumbnails.iter().find(|t| t.active).map(|t| t.index)
    }

    /// Height of the laid-out strip, including the trailing padding
    pub fn content_height(&self) -> f32 {
        self.thumbnails
            .last()
            .map_or(0.0, |t| t.bounds.bottom() + THUMB_PADDING)
    }

    /// Slide index under a strip-local point
    pub fn hit(&self, p: Point) -> Option<usize> {
        self.thumbnails
            .iter()
            .find(|t| t.bounds.contains(p))
            .map(|t| t.index)
    }
}
