//! Slide management and persistence workflow tests

use slideboard::persistence::{FileBlobStore, MemoryBlobStore};
use slideboard::resize::ResizeCoordinator;
use slideboard::{Point, PointerEvent, Settings, Size, Whiteboard};

use crate::helpers::{board, slide_pixel, stroke, BLACK, WHITE};

#[test]
fn test_new_slide_appends_and_selects() {
    let mut board = board(400, 300);
    assert_eq!(board.new_slide(), 1);
    assert_eq!(board.new_slide(), 2);

    assert_eq!(board.store().count(), 3);
    assert_eq!(board.store().current(), 2);
    assert_eq!(board.thumbnails().len(), 3);
    assert_eq!(board.thumbnails().active(), Some(2));
}

#[test]
fn test_strokes_stay_on_their_slide() {
    let mut board = board(400, 300);
    stroke(&mut board, (10.0, 10.0), (100.0, 10.0));
    board.new_slide();
    stroke(&mut board, (10.0, 200.0), (100.0, 200.0));

    assert_eq!(slide_pixel(&board, 0, 50, 10), Some(BLACK));
    assert_eq!(slide_pixel(&board, 0, 50, 200), Some(WHITE));
    assert_eq!(slide_pixel(&board, 1, 50, 10), Some(WHITE));
    assert_eq!(slide_pixel(&board, 1, 50, 200), Some(BLACK));

    board.select_slide(0);
    assert_eq!(board.canvas().pixel(50, 10), Some(BLACK));
    assert_eq!(board.canvas().pixel(50, 200), Some(WHITE));
}

#[test]
fn test_thumbnail_click_selects_slide() {
    let mut board = board(400, 300);
    board.new_slide();
    board.new_slide();

    assert_eq!(board.click_thumbnail(Point::new(60.0, 150.0)), Some(1));
    assert_eq!(board.store().current(), 1);
    assert_eq!(board.thumbnails().active(), Some(1));

    assert_eq!(board.click_thumbnail(Point::new(60.0, 1000.0)), None);
    assert_eq!(board.store().current(), 1);
}

#[test]
fn test_select_out_of_range_is_rejected() {
    let mut board = board(400, 300);
    assert!(!board.select_slide(1));
    assert_eq!(board.store().current(), 0);
}

#[test]
fn test_thumbnails_follow_strokes() {
    let mut board = board(400, 300);
    let before = board.thumbnails().thumbnails()[0].image.clone();
    board.set_pen_width(40.0);
    stroke(&mut board, (0.0, 150.0), (400.0, 150.0));
    assert_ne!(board.thumbnails().thumbnails()[0].image, before);
}

#[test]
fn test_empty_storage_gives_one_blank_slide() {
    let board = Whiteboard::load(Settings::default(), Size::new(800, 600), &MemoryBlobStore::new());
    assert_eq!(board.store().count(), 1);
    assert_eq!(board.store().current(), 0);
    assert_eq!(board.canvas().pixel(400, 300), Some(WHITE));
}

#[test]
fn test_save_and_reload_board() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slides.json");
    let size = Size::new(300, 200);

    let mut board = board(size.width, size.height);
    stroke(&mut board, (10.0, 10.0), (100.0, 10.0));
    board.new_slide();
    stroke(&mut board, (10.0, 100.0), (100.0, 100.0));
    board.select_slide(0);

    let mut blobs = FileBlobStore::open(&path).unwrap();
    board.save(&mut blobs).unwrap();
    assert!(!board.has_unsaved_changes());

    let blobs = FileBlobStore::open(&path).unwrap();
    let restored = Whiteboard::load(Settings::default(), size, &blobs);
    assert_eq!(restored.store().count(), 2);
    assert_eq!(restored.store().current(), 0);
    assert_eq!(restored.store().slides(), board.store().slides());
    assert_eq!(restored.canvas().pixel(50, 10), Some(BLACK));
}

#[test]
fn test_resize_migrates_every_slide() {
    let mut board = board(400, 300);
    board.new_slide();
    board.new_slide();
    board.select_slide(1);

    assert!(board.resize_canvas(Size::new(800, 600)));
    assert!(!board.resize_canvas(Size::new(800, 600)));

    assert_eq!(board.store().count(), 3);
    assert_eq!(board.store().current(), 1);
    assert!(board.store().slides().iter().all(|s| s.size() == Size::new(800, 600)));
    board.render();
    assert_eq!(board.frame().size(), Size::new(800, 600));
}

#[test]
fn test_restart_at_same_window_keeps_slides() {
    let settings = Settings::default();
    let rc = ResizeCoordinator::new(&settings);
    let window = Size::new(1500, 1000);
    let mut blobs = MemoryBlobStore::new();

    let mut board = rc.load_board(settings.clone(), window, &blobs);
    assert_eq!(board.size(), Size::new(1370, 940));
    board.set_pen_width(1.0);
    stroke(&mut board, (700.0, 100.0), (900.0, 100.0));
    board.save(&mut blobs).unwrap();
    let saved = board.store().current_slide().clone();

    let mut restored = rc.load_board(settings, window, &blobs);
    assert_eq!(rc.apply(&mut restored, window), None);
    assert_eq!(restored.store().current_slide(), &saved);
    assert_eq!(restored.store().current_slide().pixel(800, 100), Some(BLACK));
}

#[test]
fn test_switching_updates_both_thumbnails() {
    let mut board = board(400, 300);
    board.new_slide();
    board.select_slide(0);
    let blank = board.thumbnails().thumbnails()[0].image.clone();

    board.set_pen_width(40.0);
    board.handle_pointer(PointerEvent::down(0.0, 150.0));
    board.handle_pointer(PointerEvent::moved(400.0, 150.0));
    // Stroke still in progress when switching: the switch commits it
    assert!(board.select_slide(1));

    let thumbs = board.thumbnails().thumbnails();
    assert_ne!(thumbs[0].image, blank);
    assert!(!thumbs[0].active);
    assert!(thumbs[1].active);
    assert_eq!(slide_pixel(&board, 0, 200, 150), Some(BLACK));
}
