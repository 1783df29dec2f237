//! Drawing Workflow Integration Tests

use slideboard::interaction::InteractionMode;
use slideboard::{Outcome, PointerEvent, PointerPhase, Point};

use crate::helpers::{board, slide_pixel, solid_image, stroke, BLACK, BLUE, WHITE};

#[test]
fn test_stroke_lands_in_slide_and_frame() {
    let mut board = board(800, 600);
    stroke(&mut board, (10.0, 10.0), (50.0, 50.0));

    assert_eq!(slide_pixel(&board, 0, 30, 30), Some(BLACK));
    assert_eq!(slide_pixel(&board, 0, 700, 500), Some(WHITE));

    board.render();
    assert_eq!(board.frame(), board.store().current_slide());
    assert!(board.has_unsaved_changes());
}

#[test]
fn test_stroke_outcomes() {
    let mut board = board(200, 200);
    assert_eq!(board.handle_pointer(PointerEvent::down(10.0, 10.0)), Outcome::Nothing);
    assert_eq!(board.handle_pointer(PointerEvent::moved(20.0, 20.0)), Outcome::Recomposite);
    assert_eq!(board.handle_pointer(PointerEvent::up(20.0, 20.0)), Outcome::StrokeCommitted);
    assert_eq!(board.interaction_mode(), InteractionMode::Idle);
}

#[test]
fn test_leaving_the_canvas_commits_the_stroke() {
    let mut board = board(200, 200);
    board.handle_pointer(PointerEvent::down(10.0, 100.0));
    board.handle_pointer(PointerEvent::moved(90.0, 100.0));
    let outcome = board.handle_pointer(PointerEvent::new(PointerPhase::Leave, Point::new(250.0, 100.0)));

    assert_eq!(outcome, Outcome::StrokeCommitted);
    assert_eq!(slide_pixel(&board, 0, 50, 100), Some(BLACK));
}

#[test]
fn test_hover_without_press_does_nothing() {
    let mut board = board(100, 100);
    assert_eq!(board.handle_pointer(PointerEvent::moved(50.0, 50.0)), Outcome::Nothing);
    assert_eq!(slide_pixel(&board, 0, 50, 50), Some(WHITE));
    assert!(!board.has_unsaved_changes());
}

#[test]
fn test_color_and_eraser() {
    let mut board = board(200, 200);
    board.set_color(BLUE);
    stroke(&mut board, (20.0, 100.0), (180.0, 100.0));
    assert_eq!(slide_pixel(&board, 0, 100, 100), Some(BLUE));

    assert!(board.toggle_eraser());
    stroke(&mut board, (20.0, 100.0), (180.0, 100.0));
    assert_eq!(slide_pixel(&board, 0, 100, 100), Some(WHITE));

    board.set_color(BLACK);
    assert!(!board.pen().erasing);
}

#[test]
fn test_clear_wipes_slide_and_overlay() {
    let mut board = board(800, 600);
    stroke(&mut board, (10.0, 10.0), (50.0, 50.0));
    board.insert_image(solid_image(200, 100, BLUE));

    board.clear();
    board.render();

    assert!(!board.overlays().is_active());
    assert_eq!(slide_pixel(&board, 0, 30, 30), Some(WHITE));
    assert_eq!(board.frame().pixel(150, 120), Some(WHITE));
}
