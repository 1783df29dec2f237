//! Canvas sizing from the window and migration of stored slides on resize.

use crate::board::Whiteboard;
use crate::config::Settings;
use crate::geometry::{Point, Size};
use crate::persistence::BlobStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeCoordinator {
    sidebar_width: u32,
    toolbar_height: u32,
    min: Size,
}

impl ResizeCoordinator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sidebar_width: settings.sidebar_width,
            toolbar_height: settings.toolbar_height,
            min: settings.min_canvas,
        }
    }

    /// Top-left of the canvas in window coordinates
    pub fn canvas_origin(&self) -> Point {
        Point::new(self.sidebar_width as f32, self.toolbar_height as f32)
    }

    /// Space left for the canvas once the sidebar and toolbar are laid out,
    /// never below the minimum canvas size.
    pub fn target_size(&self, window: Size) -> Size {
        Size::new(
            window.width.saturating_sub(self.sidebar_width).max(self.min.width),
            window.height.saturating_sub(self.toolbar_height).max(self.min.height),
        )
    }

    /// Restore a board for a window of the given size. Stored slides are
    /// decoded straight at that window's canvas size, so a later `apply` with
    /// the same window leaves them untouched.
    pub fn load_board(&self, settings: Settings, window: Size, blobs: &dyn BlobStore) -> Whiteboard {
        Whiteboard::load(settings, self.target_size(window), blobs)
    }

    /// Resize the board for a new window size. Returns the new canvas size
    /// when anything changed.
    pub fn apply(&self, board: &mut Whiteboard, window: Size) -> Option<Size> {
        let target = self.target_size(window);
        board.resize_canvas(target).then_some(target)
    }
}
