//! Slideboard: a raster whiteboard with slides, pasted images and PDF export.
//!
//! ## Modules
//!
//! - `store` - per-slide rasters and the current slide index
//! - `coords` - window to canvas coordinate mapping
//! - `overlay` - the pasted image floating above the slide, with hit tests
//! - `interaction` - pointer state machine (draw / drag / resize)
//! - `compositor` - visible surface and thumbnail strip
//! - `resize` - canvas sizing and slide migration
//! - `board` - everything above wired into one `Whiteboard`
//! - `persistence`, `acquire`, `export` - blob store, image sources, PDF output

pub mod acquire;
pub mod board;
pub mod compositor;
pub mod config;
pub mod coords;
pub mod error;
pub mod export;
pub mod geometry;
pub mod interaction;
pub mod overlay;
pub mod pen;
pub mod persistence;
pub mod raster;
pub mod resize;
pub mod store;
pub mod ui;

pub use board::{ResizeToggle, Whiteboard};
pub use config::Settings;
pub use geometry::{Point, Rect, Size};
pub use interaction::{Outcome, PointerEvent, PointerPhase};
pub use raster::Raster;
