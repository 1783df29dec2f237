//! Ordered per-slide rasters and the current slide index.

use rayon::prelude::*;
use tracing::debug;

use crate::geometry::Size;
use crate::raster::{Color, Raster};

/// Owns every slide bitmap. Never empty, and `current` always indexes a
/// slide.
#[derive(Debug, Clone)]
pub struct RasterStore {
    slides: Vec<Raster>,
    current: usize,
    background: Color,
}

impl RasterStore {
    /// A store seeded with one blank slide
    pub fn new(size: Size, background: Color) -> Self {
        Self {
            slides: vec![Self::create_blank(size, background)],
            current: 0,
            background,
        }
    }

    /// Build from loaded slides. An empty list falls back to a single blank
    /// slide and an out-of-range index falls back to 0.
    pub fn from_slides(slides: Vec<Raster>, current: usize, size: Size, background: Color) -> Self {
        if slides.is_empty() {
            return Self::new(size, background);
        }
        let current = if current < slides.len() { current } else { 0 };
        Self {
            slides,
            current,
            background,
        }
    }

    pub fn create_blank(size: Size, background: Color) -> Raster {
        Raster::blank(size, background)
    }

    pub fn blank(&self) -> Raster {
        Self::create_blank(self.size(), self.background)
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Dimensions shared by every slide
    pub fn size(&self) -> Size {
        self.slides[0].size()
    }

    pub fn append(&mut self, slide: Raster) -> usize {
        self.slides.push(slide);
        self.slides.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Raster> {
        self.slides.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Raster> {
        self.slides.get_mut(index)
    }

    /// Replace a slide's content. Out-of-range indices and mismatched sizes
    /// leave the store untouched.
    pub fn replace(&mut self, index: usize, slide: Raster) -> bool {
        let size = self.size();
        match self.slides.get_mut(index) {
            Some(existing) if slide.size() == size => {
                *existing = slide;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self) -> usize {
        self.slides.len()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Raster {
        &self.slides[self.current]
    }

    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.slides.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn slides(&self) -> &[Raster] {
        &self.slides
    }

    /// Rescale every slide to `size`. Content is stretched, so differing
    /// aspect ratios distort and shrinking then growing loses detail.
    pub fn migrate_all(&mut self, size: Size) {
        if size == self.size() || size.area() == 0 {
            return;
        }
        debug!(from = ?self.size(), to = ?size, slides = self.slides.len(), "migrating slides");

        let background = self.background;
        self.slides.par_iter_mut().for_each(|slide| {
            let mut migrated = Raster::blank(size, background);
            migrated.draw_image_unscaled(slide.scaled(size).image(), Default::default());
            *slide = migrated;
        });
    }
}
