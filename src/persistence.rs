//! Slide persistence on top of an opaque key/value blob store.
//!
//! Slides are stored under [`SLIDES_KEY`] as a JSON array of PNG data URLs in
//! presentation order; the current index is stored under [`CURRENT_KEY`] as a
//! decimal string. Loading never fails: anything unreadable degrades to a
//! single blank slide.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};
use crate::geometry::{Rect, Size};
use crate::raster::{Color, Raster};
use crate::store::RasterStore;

pub const SLIDES_KEY: &str = "whiteboardSlides";
pub const CURRENT_KEY: &str = "whiteboardCurrentSlide";

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

pub trait BlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> StorageResult<()>;
}

/// In-memory store, used for session-only state and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    entries: BTreeMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// A JSON object on disk, rewritten whole on every `set`
#[derive(Debug)]
pub struct FileBlobStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileBlobStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file that receives each write before it replaces `path`
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value);
        let json = serde_json::to_string(&self.entries)?;

        // Replace the file in one step so a failed write never leaves it torn
        let tmp = self.temp_path();
        std::fs::write(&tmp, json)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

pub fn encode_data_url(slide: &Raster) -> StorageResult<String> {
    let png = slide.encode_png()?;
    Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(png)))
}

pub fn decode_data_url(url: &str) -> StorageResult<Raster> {
    let payload = url.strip_prefix(DATA_URL_PREFIX).ok_or(StorageError::NotDataUrl)?;
    let bytes = STANDARD.decode(payload.trim())?;
    Raster::decode(&bytes)
}

/// Parse a stored index leniently: leading digits count, anything else is 0.
pub fn parse_index(raw: &str) -> usize {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Write every slide and the current index
pub fn save_slides(store: &RasterStore, blobs: &mut dyn BlobStore) -> StorageResult<()> {
    let urls = store
        .slides()
        .iter()
        .map(encode_data_url)
        .collect::<StorageResult<Vec<_>>>()?;
    blobs.set(SLIDES_KEY, serde_json::to_string(&urls)?)?;
    blobs.set(CURRENT_KEY, store.current().to_string())?;
    debug!(slides = urls.len(), current = store.current(), "slides saved");
    Ok(())
}

fn try_load(blobs: &dyn BlobStore, size: Size, background: Color) -> StorageResult<RasterStore> {
    let urls: Vec<String> = match blobs.get(SLIDES_KEY)? {
        Some(json) => serde_json::from_str(&json)?,
        None => Vec::new(),
    };

    let slides: Vec<Raster> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let mut slide = Raster::blank(size, background);
            match decode_data_url(url) {
                Ok(decoded) => slide.draw_image(decoded.image(), slide_rect(size)),
                Err(e) => warn!(slide = i, error = %e, "unreadable slide, starting it blank"),
            }
            slide
        })
        .collect();

    let current = blobs.get(CURRENT_KEY)?.map(|raw| parse_index(&raw)).unwrap_or(0);
    Ok(RasterStore::from_slides(slides, current, size, background))
}

fn slide_rect(size: Size) -> Rect {
    Rect::new(0.0, 0.0, size.width as f32, size.height as f32)
}

/// Load slides stretched to `size`. Never fails; errors are logged and
/// replaced by a single blank slide.
pub fn load_slides(blobs: &dyn BlobStore, size: Size, background: Color) -> RasterStore {
    match try_load(blobs, size, background) {
        Ok(store) => {
            info!(slides = store.count(), current = store.current(), "slides loaded");
            store
        }
        Err(e) => {
            warn!(error = %e, "could not load slides, starting fresh");
            RasterStore::new(size, background)
        }
    }
}
