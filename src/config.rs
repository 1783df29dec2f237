//! Runtime settings, read from `slideboard.json` when present.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::geometry::Size;

pub const SETTINGS_FILE: &str = "slideboard.json";

/// Palette shown in the toolbar
pub const PALETTE: [[u8; 4]; 7] = [
    [0, 0, 0, 255],       // black
    [255, 255, 255, 255], // white
    [255, 0, 0, 255],     // red
    [30, 144, 255, 255],  // dodger blue
    [0, 255, 0, 255],     // green
    [255, 255, 0, 255],   // yellow
    [255, 0, 255, 255],   // magenta
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub background_color: [u8; 4],
    pub pen_color: [u8; 4],
    pub pen_width: f32,
    pub eraser_width: f32,

    /// Widest an inserted image may start out
    pub overlay_max_width: f32,
    pub overlay_min_size: f32,
    pub overlay_origin: (f32, f32),
    pub handle_size: f32,

    pub thumbnail_size: Size,
    pub sidebar_width: u32,
    pub toolbar_height: u32,
    pub min_canvas: Size,

    /// Seconds between autosaves; 0 disables the timer
    pub autosave_secs: u64,
    pub storage_path: PathBuf,
    pub export_dir: PathBuf,
    pub export_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background_color: [255, 255, 255, 255],
            pen_color: [0, 0, 0, 255],
            pen_width: 3.0,
            eraser_width: 25.0,
            overlay_max_width: 400.0,
            overlay_min_size: 20.0,
            overlay_origin: (80.0, 80.0),
            handle_size: 16.0,
            thumbnail_size: Size::new(120, 90),
            sidebar_width: 130,
            toolbar_height: 60,
            min_canvas: Size::new(300, 200),
            autosave_secs: 60,
            storage_path: PathBuf::from("slideboard_storage.json"),
            export_dir: PathBuf::from("."),
            export_file_name: "My_Whiteboard.pdf".to_string(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                Self::default()
            }
        }
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }
}
