//! The pasted image that floats above the current slide until it is baked.

use std::sync::Arc;

use image::RgbaImage;
use tracing::debug;

use crate::config::Settings;
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLimits {
    pub max_width: f32,
    pub min_size: f32,
    pub handle_size: f32,
    pub origin: Point,
}

impl Default for OverlayLimits {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for OverlayLimits {
    fn from(settings: &Settings) -> Self {
        Self {
            max_width: settings.overlay_max_width,
            min_size: settings.overlay_min_size,
            handle_size: settings.handle_size,
            origin: Point::new(settings.overlay_origin.0, settings.overlay_origin.1),
        }
    }
}

/// An image in flight
#[derive(Debug, Clone)]
pub struct Overlay {
    pub bitmap: Arc<RgbaImage>,
    pub bounds: Rect,
    /// Source width / height at creation
    pub aspect: f32,
    pub resize_mode: bool,
    /// Distinguishes overlays for render caches
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct OverlayManager {
    overlay: Option<Overlay>,
    limits: OverlayLimits,
    generation: u64,
}

impl OverlayManager {
    pub fn new(limits: OverlayLimits) -> Self {
        Self {
            overlay: None,
            limits,
            generation: 0,
        }
    }

    /// Start a new overlay from a decoded bitmap, replacing any current one.
    /// Width is capped at the configured maximum with height following the
    /// source aspect ratio. Resize mode starts on.
    pub fn begin(&mut self, bitmap: Arc<RgbaImage>, intrinsic_w: u32, intrinsic_h: u32) {
        let intrinsic_w = intrinsic_w.max(1) as f32;
        let intrinsic_h = intrinsic_h.max(1) as f32;
        let aspect = intrinsic_w / intrinsic_h;
        let w = self.limits.max_width.min(intrinsic_w);
        let h = (w / aspect).round();

        self.generation += 1;
        self.overlay = Some(Overlay {
            bitmap,
            bounds: Rect::new(self.limits.origin.x, self.limits.origin.y, w, h),
            aspect,
            resize_mode: true,
            generation: self.generation,
        });
        debug!(w, h, "overlay created");
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.overlay.as_ref().map(|o| o.bounds)
    }

    pub fn limits(&self) -> &OverlayLimits {
        &self.limits
    }

    pub fn is_active(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn is_resize_mode(&self) -> bool {
        self.overlay.as_ref().is_some_and(|o| o.resize_mode)
    }

    pub fn toggle_resize_mode(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.resize_mode = !overlay.resize_mode;
        }
    }

    pub fn set_resize_mode(&mut self, on: bool) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.resize_mode = on;
        }
    }

    pub fn hit_test(&self, p: Point) -> bool {
        self.bounds().is_some_and(|b| b.contains(p))
    }

    /// Square grab region anchored at the overlay's bottom-right corner
    pub fn handle_rect(&self) -> Option<Rect> {
        let size = self.limits.handle_size;
        self.bounds()
            .map(|b| Rect::new(b.right() - size, b.bottom() - size, size, size))
    }

    pub fn handle_hit_test(&self, p: Point) -> bool {
        self.handle_rect().is_some_and(|h| h.contains(p))
    }

    pub fn move_to(&mut self, p: Point) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.bounds.x = p.x;
            overlay.bounds.y = p.y;
        }
    }

    /// Set the size, clamping each side to the minimum. No maximum and no
    /// aspect lock.
    pub fn resize_to(&mut self, w: f32, h: f32) {
        let min = self.limits.min_size;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.bounds.w = w.max(min);
            overlay.bounds.h = h.max(min);
        }
    }

    pub fn clear(&mut self) -> Option<Overlay> {
        self.overlay.take()
    }
}
