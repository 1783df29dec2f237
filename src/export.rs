//! Export of the slide deck as a document with one page per slide.

use std::path::PathBuf;

use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::*;
use tracing::{debug, info};

use crate::error::ExportError;

pub trait DocumentExporter {
    /// Build a document from `pages` in order, each page `page_width` by
    /// `page_height` with the image filling it.
    fn export(&self, pages: &[RgbaImage], page_width: u32, page_height: u32) -> Result<Vec<u8>, ExportError>;
}

/// Locates the PDFium dynamic library.
pub struct PdfiumLoader;

impl PdfiumLoader {
    /// Search order:
    /// 1. `lib/` in the current working directory (development)
    /// 2. `lib/` next to the executable
    /// 3. `Resources/lib/` in a macOS bundle
    /// 4. System library fallback
    pub fn load() -> Result<Pdfium, ExportError> {
        for dir in Self::search_dirs() {
            let path = Pdfium::pdfium_platform_library_name_at_path(&dir);
            if path.exists() {
                if let Ok(bindings) = Pdfium::bind_to_library(&path) {
                    info!(path = %path.display(), "loaded pdfium");
                    return Ok(Pdfium::new(bindings));
                }
            }
        }
        Pdfium::bind_to_system_library()
            .map(Pdfium::new)
            .map_err(|e| ExportError::LibraryUnavailable(format!("{e:?}")))
    }

    fn search_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd.join("lib"));
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(parent) = exe.parent() {
                dirs.push(parent.join("lib"));
                if let Some(grandparent) = parent.parent() {
                    dirs.push(grandparent.join("Resources/lib"));
                }
            }
        }
        dirs
    }
}

/// Writes a landscape PDF sized to the canvas
pub struct PdfiumExporter {
    pdfium: Pdfium,
}

impl PdfiumExporter {
    pub fn new() -> Result<Self, ExportError> {
        Ok(Self {
            pdfium: PdfiumLoader::load()?,
        })
    }
}

fn pdf_error(e: PdfiumError) -> ExportError {
    ExportError::Pdf(format!("{e:?}"))
}

impl DocumentExporter for PdfiumExporter {
    fn export(&self, pages: &[RgbaImage], page_width: u32, page_height: u32) -> Result<Vec<u8>, ExportError> {
        if pages.is_empty() {
            return Err(ExportError::NoPages);
        }
        let width = PdfPoints::new(page_width as f32);
        let height = PdfPoints::new(page_height as f32);

        let mut document = self.pdfium.create_new_pdf().map_err(pdf_error)?;
        for (i, slide) in pages.iter().enumerate() {
            let mut page = document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::Custom(width, height))
                .map_err(pdf_error)?;
            let image = DynamicImage::ImageRgba8(slide.clone());
            page.objects_mut()
                .create_image_object(PdfPoints::ZERO, PdfPoints::ZERO, &image, Some(width), Some(height))
                .map_err(pdf_error)?;
            debug!(page = i, "page added");
        }
        document.save_to_bytes().map_err(pdf_error)
    }
}
