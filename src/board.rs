//! The whiteboard: slides, the working canvas, the pasted-image overlay and
//! the pointer state machine, wired together.
//!
//! Mutating operations never redraw on their own. Call [`Whiteboard::render`]
//! after anything that changes what should be on screen.

use std::sync::Arc;

use tracing::{debug, info};

use crate::acquire::DecodedImage;
use crate::compositor::{Compositor, ThumbnailStrip};
use crate::config::Settings;
use crate::error::{ExportError, StorageResult};
use crate::export::DocumentExporter;
use crate::geometry::{Point, Size};
use crate::interaction::{InteractionController, InteractionMode, Outcome, PointerEvent};
use crate::overlay::{OverlayLimits, OverlayManager};
use crate::pen::PenState;
use crate::persistence::{self, BlobStore};
use crate::raster::{Color, Raster};
use crate::store::RasterStore;

/// Result of the resize toolbar action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeToggle {
    /// Nothing to resize; tell the user to paste first
    NoOverlay,
    Entered,
    /// The overlay was baked into the current slide
    Finished,
}

pub struct Whiteboard {
    settings: Settings,
    store: RasterStore,
    overlays: OverlayManager,
    controller: InteractionController,
    pen: PenState,
    compositor: Compositor,
    /// Current slide plus any stroke in progress
    canvas: Raster,
    /// Composited visible surface
    frame: Raster,
    thumbnails: ThumbnailStrip,
    unsaved: bool,
}

impl Whiteboard {
    /// A board with one blank slide
    pub fn new(settings: Settings, size: Size) -> Self {
        let store = RasterStore::new(size, settings.background_color);
        Self::with_store(settings, store)
    }

    /// A board restored from a blob store, falling back to one blank slide
    pub fn load(settings: Settings, size: Size, blobs: &dyn BlobStore) -> Self {
        let store = persistence::load_slides(blobs, size, settings.background_color);
        Self::with_store(settings, store)
    }

    pub fn with_store(settings: Settings, store: RasterStore) -> Self {
        let canvas = store.current_slide().clone();
        let frame = canvas.clone();
        let mut board = Self {
            overlays: OverlayManager::new(OverlayLimits::from(&settings)),
            controller: InteractionController::new(),
            pen: PenState::new(&settings),
            compositor: Compositor::new(),
            canvas,
            frame,
            thumbnails: ThumbnailStrip::default(),
            unsaved: false,
            store,
            settings,
        };
        board.refresh_thumbnails();
        board
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn size(&self) -> Size {
        self.store.size()
    }

    pub fn store(&self) -> &RasterStore {
        &self.store
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    pub fn canvas(&self) -> &Raster {
        &self.canvas
    }

    /// The visible surface as of the last `render`
    pub fn frame(&self) -> &Raster {
        &self.frame
    }

    pub fn thumbnails(&self) -> &ThumbnailStrip {
        &self.thumbnails
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.controller.mode()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn set_color(&mut self, color: Color) {
        self.pen.set_color(color);
    }

    pub fn set_pen_width(&mut self, width: f32) {
        self.pen.set_width(width);
    }

    pub fn toggle_eraser(&mut self) -> bool {
        self.pen.toggle_eraser()
    }

    /// Feed one canvas-local pointer event through the state machine. A
    /// finished stroke is persisted into the current slide immediately.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Outcome {
        let outcome = self
            .controller
            .handle_event(event, &mut self.overlays, &self.pen, &mut self.canvas);
        if outcome == Outcome::StrokeCommitted {
            self.persist_canvas();
        }
        outcome
    }

    pub fn render(&mut self) {
        self.compositor.render(&self.canvas, &self.overlays, &mut self.frame);
    }

    fn refresh_thumbnails(&mut self) {
        self.thumbnails = self
            .compositor
            .render_thumbnails(&self.store, self.settings.thumbnail_size);
    }

    /// Copy the working canvas into the current slide
    fn commit_canvas(&mut self) {
        let current = self.store.current();
        if let Some(slide) = self.store.get_mut(current) {
            slide.copy_from(&self.canvas);
        }
        self.unsaved = true;
    }

    fn persist_canvas(&mut self) {
        self.commit_canvas();
        self.refresh_thumbnails();
    }

    /// Load the current slide into the working canvas, dropping any overlay
    /// and gesture.
    fn load_current(&mut self) {
        self.canvas.copy_from(self.store.current_slide());
        self.overlays.clear();
        self.controller.reset();
    }

    /// Composite the overlay into the current slide and discard it.
    /// Thumbnails are left for the caller to refresh.
    fn bake_overlay(&mut self) -> bool {
        let Some(overlay) = self.overlays.clear() else {
            return false;
        };
        self.compositor.draw_overlay(&overlay, &mut self.canvas);
        self.controller.reset();
        self.commit_canvas();
        debug!(bounds = ?overlay.bounds, "overlay baked");
        true
    }

    /// Switch to another slide. The working canvas is saved first; a live
    /// overlay is discarded, never baked.
    pub fn select_slide(&mut self, index: usize) -> bool {
        if index >= self.store.count() {
            return false;
        }
        self.controller.reset();
        self.overlays.clear();
        self.commit_canvas();
        self.store.set_current(index);
        self.load_current();
        self.refresh_thumbnails();
        debug!(index, "slide selected");
        true
    }

    /// Handle a click at a strip-local point in the thumbnail sidebar
    pub fn click_thumbnail(&mut self, p: Point) -> Option<usize> {
        let index = self.thumbnails.hit(p)?;
        self.select_slide(index).then_some(index)
    }

    /// Append a blank slide and switch to it. A live overlay is baked into
    /// the slide being left.
    pub fn new_slide(&mut self) -> usize {
        if !self.bake_overlay() {
            self.controller.reset();
            self.commit_canvas();
        }
        let index = self.store.append(self.store.blank());
        self.store.set_current(index);
        self.load_current();
        self.refresh_thumbnails();
        info!(index, "new slide");
        index
    }

    /// Wipe the current slide to the background and discard any overlay
    pub fn clear(&mut self) {
        self.controller.reset();
        self.overlays.clear();
        self.canvas.fill(self.store.background());
        self.persist_canvas();
    }

    /// Start an overlay from an acquired image, in resize mode
    pub fn insert_image(&mut self, image: DecodedImage) {
        let (w, h) = (image.width(), image.height());
        self.controller.reset();
        self.overlays.begin(Arc::new(image.pixels), w, h);
    }

    pub fn toggle_resize(&mut self) -> ResizeToggle {
        if !self.overlays.is_active() {
            ResizeToggle::NoOverlay
        } else if !self.overlays.is_resize_mode() {
            self.overlays.set_resize_mode(true);
            ResizeToggle::Entered
        } else {
            self.finish_resize();
            ResizeToggle::Finished
        }
    }

    /// Bake the overlay, without resize chrome, into the current slide and
    /// leave resize mode. Does nothing when there is no overlay.
    pub fn finish_resize(&mut self) -> bool {
        self.overlays.set_resize_mode(false);
        let baked = self.bake_overlay();
        if baked {
            self.refresh_thumbnails();
        }
        baked
    }

    /// Migrate every slide to `size` and reload the current one. Any overlay
    /// and gesture in progress are dropped.
    pub fn resize_canvas(&mut self, size: Size) -> bool {
        if size == self.size() || size.area() == 0 {
            return false;
        }
        self.controller.reset();
        self.overlays.clear();
        self.store.migrate_all(size);
        self.canvas = self.store.current_slide().clone();
        self.frame = self.canvas.clone();
        self.unsaved = true;
        self.refresh_thumbnails();
        info!(width = size.width, height = size.height, "canvas resized");
        true
    }

    /// Persist everything to the blob store
    pub fn save(&mut self, blobs: &mut dyn BlobStore) -> StorageResult<()> {
        persistence::save_slides(&self.store, blobs)?;
        self.unsaved = false;
        Ok(())
    }

    /// Render every slide into a document, one page each. A live overlay
    /// is baked first.
    pub fn export(&mut self, exporter: &dyn DocumentExporter) -> Result<Vec<u8>, ExportError> {
        if !self.bake_overlay() {
            self.commit_canvas();
        }
        self.refresh_thumbnails();
        let size = self.size();
        let pages: Vec<_> = self.store.slides().iter().map(|s| s.image().clone()).collect();
        exporter.export(&pages, size.width, size.height)
    }
}
