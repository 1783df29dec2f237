//! Single test binary entry point.
//!
//! Structure:
//! - unit: single-component tests (store, overlay, persistence)
//! - integration: whole-board workflows (drawing, pasting, slides, export)

mod helpers;
mod unit;
