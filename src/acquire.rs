//! Image acquisition for pasting: the system clipboard, a file dialog and
//! dropped files.
//!
//! Sources are tried in order by an [`AcquisitionChain`]; the first one to
//! produce a fully decoded image wins. A source only hands over to the next
//! one when it is unavailable, so an empty clipboard does not open the file
//! dialog. Acquisition blocks, so the window
//! shell runs it on a worker thread and posts the result back to the event
//! loop as a single event.

use std::path::Path;

use image::RgbaImage;
use tracing::{debug, info};

use crate::error::AcquireError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// A fully decoded bitmap together with its intrinsic size
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
}

impl DecodedImage {
    /// Wrap decoded pixels. Images without pixels are rejected.
    pub fn new(pixels: RgbaImage, origin: &str) -> Result<Self, AcquireError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(AcquireError::Empty(origin.to_string()));
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, AcquireError> {
    let img = image::load_from_memory(bytes)?;
    DecodedImage::new(img.to_rgba8(), "image data")
}

pub fn decode_file(path: &Path) -> Result<DecodedImage, AcquireError> {
    let img = image::open(path)?;
    DecodedImage::new(img.to_rgba8(), &path.display().to_string())
}

/// Whether a path looks like an image we can decode
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

pub trait ImageSource: Send {
    fn name(&self) -> &'static str;
    fn acquire(&mut self) -> Result<DecodedImage, AcquireError>;
}

/// Reads raw image data from the system clipboard
#[derive(Debug, Default)]
pub struct ClipboardSource;

impl ImageSource for ClipboardSource {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn acquire(&mut self) -> Result<DecodedImage, AcquireError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| AcquireError::Unavailable {
            source_name: self.name(),
            reason: e.to_string(),
        })?;

        let data = match clipboard.get_image() {
            Ok(data) => data,
            Err(arboard::Error::ContentNotAvailable) => return Err(AcquireError::NoImage),
            Err(e) => {
                return Err(AcquireError::Unavailable {
                    source_name: self.name(),
                    reason: e.to_string(),
                })
            }
        };

        let pixels = RgbaImage::from_raw(data.width as u32, data.height as u32, data.bytes.into_owned())
            .ok_or_else(|| AcquireError::Empty("clipboard image".to_string()))?;
        DecodedImage::new(pixels, "clipboard image")
    }
}

/// Asks the user to pick an image file
#[derive(Debug, Default)]
pub struct FilePickerSource;

impl ImageSource for FilePickerSource {
    fn name(&self) -> &'static str {
        "file picker"
    }

    fn acquire(&mut self) -> Result<DecodedImage, AcquireError> {
        let path = rfd::FileDialog::new()
            .set_title("Select an image")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
            .ok_or(AcquireError::Cancelled)?;
        info!(path = %path.display(), "image selected");
        decode_file(&path)
    }
}

/// Ordered list of sources, tried until one succeeds or fails for good
#[derive(Default)]
pub struct AcquisitionChain {
    sources: Vec<Box<dyn ImageSource>>,
}

impl AcquisitionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl ImageSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Clipboard first, then the file dialog when the clipboard can't be read
    pub fn standard() -> Self {
        Self::new().with(ClipboardSource).with(FilePickerSource)
    }

    /// Clipboard only, for the paste shortcut
    pub fn clipboard_only() -> Self {
        Self::new().with(ClipboardSource)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try sources in order. Returns the first image. An error that does not
    /// fall through (see [`AcquireError::falls_through`]) ends the search;
    /// otherwise the last source's error is returned.
    pub fn acquire(&mut self) -> Result<DecodedImage, AcquireError> {
        let mut last_error = AcquireError::NoSources;
        for source in &mut self.sources {
            match source.acquire() {
                Ok(image) => {
                    info!(source = source.name(), w = image.width(), h = image.height(), "image acquired");
                    return Ok(image);
                }
                Err(e) if e.falls_through() => {
                    debug!(source = source.name(), error = %e, "image source unavailable, trying next");
                    last_error = e;
                }
                Err(e) => {
                    debug!(source = source.name(), error = %e, "image source failed");
                    return Err(e);
                }
            }
        }
        Err(last_error)
    }
}
