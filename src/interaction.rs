//! Pointer state machine arbitrating between drawing, dragging the overlay
//! and resizing it.
//!
//! ```text
//! Idle -> ResizingOverlay   (down on the handle while in resize mode)
//! Idle -> DraggingOverlay   (down on the overlay body while in resize mode)
//! Idle -> Drawing           (down anywhere while not in resize mode)
//!
//! Any  -> Idle              (up / leave / cancel)
//! ```
//!
//! The controller knows nothing about mice or touch screens. The shell turns
//! device input into [`PointerEvent`]s, using [`PointerTracker`] to reduce
//! touch input to a single pointer.

use crate::geometry::Point;
use crate::overlay::OverlayManager;
use crate::pen::PenState;
use crate::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
    Cancel,
}

/// One pointer event in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Point) -> Self {
        Self { phase, position }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, Point::new(x, y))
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, Point::new(x, y))
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, Point::new(x, y))
    }
}

/// Current gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Drawing {
        /// End of the last segment drawn
        last: Point,
    },
    DraggingOverlay {
        /// Pointer position relative to the overlay origin at grab time
        offset: Point,
    },
    ResizingOverlay,
}

/// What the caller should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Nothing,
    /// The working canvas or overlay changed; re-render
    Recomposite,
    /// A stroke ended; persist the working canvas into the current slide
    StrokeCommitted,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    mode: InteractionMode,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == InteractionMode::Idle
    }

    /// Drop the current gesture without committing anything
    pub fn reset(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    pub fn handle_event(
        &mut self,
        event: PointerEvent,
        overlay: &mut OverlayManager,
        pen: &PenState,
        canvas: &mut Raster,
    ) -> Outcome {
        match event.phase {
            PointerPhase::Down => self.pointer_down(event.position, overlay),
            PointerPhase::Move => self.pointer_move(event.position, overlay, pen, canvas),
            PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel => self.pointer_up(),
        }
    }

    fn pointer_down(&mut self, p: Point, overlay: &OverlayManager) -> Outcome {
        if overlay.is_resize_mode() {
            if overlay.handle_hit_test(p) {
                self.mode = InteractionMode::ResizingOverlay;
            } else if let Some(bounds) = overlay.bounds().filter(|b| b.contains(p)) {
                self.mode = InteractionMode::DraggingOverlay {
                    offset: p.offset_from(bounds.origin()),
                };
            } else {
                // Pointer input never reaches the canvas while resizing
                self.mode = InteractionMode::Idle;
            }
            return Outcome::Nothing;
        }

        self.mode = InteractionMode::Drawing { last: p };
        Outcome::Nothing
    }

    fn pointer_move(
        &mut self,
        p: Point,
        overlay: &mut OverlayManager,
        pen: &PenState,
        canvas: &mut Raster,
    ) -> Outcome {
        match self.mode {
            InteractionMode::Idle => Outcome::Nothing,
            InteractionMode::Drawing { last } => {
                let (width, color) = pen.stroke();
                canvas.draw_segment(last, p, width, color);
                self.mode = InteractionMode::Drawing { last: p };
                Outcome::Recomposite
            }
            InteractionMode::DraggingOverlay { offset } => {
                overlay.move_to(p.offset_from(offset));
                Outcome::Recomposite
            }
            InteractionMode::ResizingOverlay => {
                if let Some(bounds) = overlay.bounds() {
                    let size = p.offset_from(bounds.origin());
                    overlay.resize_to(size.x, size.y);
                }
                Outcome::Recomposite
            }
        }
    }

    fn pointer_up(&mut self) -> Outcome {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Idle => Outcome::Nothing,
            InteractionMode::Drawing { .. } => Outcome::StrokeCommitted,
            InteractionMode::DraggingOverlay { .. } | InteractionMode::ResizingOverlay => {
                Outcome::Recomposite
            }
        }
    }
}

/// Identifies the device a raw pointer sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch(u64),
}

/// Collapses mouse and multi-touch input into one logical pointer.
///
/// The first touch to go down owns the pointer until it lifts or is
/// cancelled; every other finger is ignored.
#[derive(Debug, Default)]
pub struct PointerTracker {
    active: Option<PointerSource>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<PointerSource> {
        self.active
    }

    /// Filter a raw sample. Returns the event to forward, if any.
    pub fn track(&mut self, source: PointerSource, phase: PointerPhase, position: Point) -> Option<PointerEvent> {
        match phase {
            PointerPhase::Down => {
                if self.active.is_some_and(|a| a != source) {
                    return None;
                }
                self.active = Some(source);
            }
            PointerPhase::Move => {
                // A hovering mouse still moves; only the owner is forwarded.
                if self.active != Some(source) {
                    return None;
                }
            }
            PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel => {
                if self.active != Some(source) {
                    return None;
                }
                self.active = None;
            }
        }
        Some(PointerEvent::new(phase, position))
    }
}
