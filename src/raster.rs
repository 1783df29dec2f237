//! RGBA bitmaps and the pixel operations the whiteboard needs: solid fills,
//! round-capped stroke segments, scaled image blits and chrome rectangles.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use rayon::prelude::*;

use crate::error::StorageResult;
use crate::geometry::{Point, Rect, Size};

pub type Color = [u8; 4];

/// A fixed-size RGBA8 raster surface
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Allocate a raster filled with a solid color
    pub fn blank(size: Size, color: Color) -> Self {
        let mut raster = Self {
            image: RgbaImage::new(size.width, size.height),
        };
        raster.fill(color);
        raster
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Fill every pixel with `color`
    pub fn fill(&mut self, color: Color) {
        let buf: &mut [u8] = &mut self.image;
        buf.par_chunks_mut(4).for_each(|pixel| pixel.copy_from_slice(&color));
    }

    /// Replace this raster's content with `other`, taking its size too.
    pub fn copy_from(&mut self, other: &Raster) {
        if self.size() == other.size() {
            let dst: &mut [u8] = &mut self.image;
            dst.copy_from_slice(other.as_raw());
        } else {
            self.image = other.image.clone();
        }
    }

    /// Stretch the content to exactly `size`, ignoring aspect ratio.
    pub fn scaled(&self, size: Size) -> Raster {
        if size == self.size() {
            return self.clone();
        }
        Raster {
            image: imageops::resize(&self.image, size.width, size.height, FilterType::Triangle),
        }
    }

    #[inline(always)]
    fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, Rgba(color));
    }

    /// Stamp a filled disc of the given diameter
    fn stamp(&mut self, center: Point, diameter: f32, color: Color) {
        let radius = (diameter / 2.0).max(0.5);
        let r2 = radius * radius;
        let reach = radius.ceil() as i32;
        let cx = center.x.floor() as i32;
        let cy = center.y.floor() as i32;

        for dy in -reach..=reach {
            let dy2 = (dy * dy) as f32;
            for dx in -reach..=reach {
                if (dx * dx) as f32 + dy2 <= r2 {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw one round-capped segment. Consecutive calls sharing endpoints
    /// form a continuous stroke.
    pub fn draw_segment(&mut self, from: Point, to: Point, width: f32, color: Color) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let steps = distance.ceil().max(1.0) as i32;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(Point::new(from.x + dx * t, from.y + dy * t), width, color);
        }
    }

    /// Draw `source` scaled into `rect`, alpha-blended and clipped to bounds.
    pub fn draw_image(&mut self, source: &RgbaImage, rect: Rect) {
        let w = rect.w.round().max(1.0) as u32;
        let h = rect.h.round().max(1.0) as u32;
        if source.dimensions() == (w, h) {
            self.draw_image_unscaled(source, rect.origin());
        } else {
            let scaled = imageops::resize(source, w, h, FilterType::Triangle);
            self.draw_image_unscaled(&scaled, rect.origin());
        }
    }

    /// Draw `source` at its own size with its top-left at `origin`.
    pub fn draw_image_unscaled(&mut self, source: &RgbaImage, origin: Point) {
        imageops::overlay(
            &mut self.image,
            source,
            origin.x.round() as i64,
            origin.y.round() as i64,
        );
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.round() as i32;
        let y0 = rect.y.round() as i32;
        let x1 = rect.right().round() as i32;
        let y1 = rect.bottom().round() as i32;
        for y in y0.max(0)..y1.min(self.height() as i32) {
            for x in x0.max(0)..x1.min(self.width() as i32) {
                self.image.put_pixel(x as u32, y as u32, Rgba(color));
            }
        }
    }

    /// Outline `rect` with a border of `thickness`, centred on the edges.
    pub fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        let half = thickness / 2.0;
        let outer = Rect::new(rect.x - half, rect.y - half, rect.w + thickness, rect.h + thickness);
        self.fill_rect(Rect::new(outer.x, outer.y, outer.w, thickness), color);
        self.fill_rect(Rect::new(outer.x, outer.bottom() - thickness, outer.w, thickness), color);
        self.fill_rect(Rect::new(outer.x, outer.y, thickness, outer.h), color);
        self.fill_rect(Rect::new(outer.right() - thickness, outer.y, thickness, outer.h), color);
    }

    pub fn encode_png(&self) -> StorageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> StorageResult<Raster> {
        let img = image::load_from_memory(bytes)?;
        Ok(Raster { image: img.to_rgba8() })
    }
}
