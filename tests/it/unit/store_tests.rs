//! RasterStore Unit Tests

use crate::helpers::{BLACK, WHITE};
use slideboard::store::RasterStore;
use slideboard::{Raster, Rect, Size};

#[test]
fn test_slides_are_isolated() {
    let mut store = RasterStore::new(Size::new(40, 30), WHITE);
    let second = store.append(store.blank());
    assert_eq!(second, 1);

    if let Some(slide) = store.get_mut(0) {
        slide.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), BLACK);
    }

    assert_eq!(store.get(0).and_then(|s| s.pixel(5, 5)), Some(BLACK));
    assert_eq!(store.get(1).and_then(|s| s.pixel(5, 5)), Some(WHITE));
}

#[test]
fn test_replace_checks_index_and_size() {
    let mut store = RasterStore::new(Size::new(20, 20), WHITE);
    assert!(!store.replace(3, store.blank()));
    assert!(!store.replace(0, Raster::blank(Size::new(10, 10), WHITE)));
    assert!(store.replace(0, Raster::blank(Size::new(20, 20), BLACK)));
    assert_eq!(store.current_slide().pixel(0, 0), Some(BLACK));
}

#[test]
fn test_set_current_rejects_out_of_range() {
    let mut store = RasterStore::new(Size::new(10, 10), WHITE);
    store.append(store.blank());
    assert!(store.set_current(1));
    assert!(!store.set_current(2));
    assert_eq!(store.current(), 1);
}

#[test]
fn test_migrate_keeps_count_and_index() {
    let mut store = RasterStore::new(Size::new(100, 80), WHITE);
    store.append(store.blank());
    store.append(store.blank());
    store.set_current(2);

    store.migrate_all(Size::new(50, 40));

    assert_eq!(store.count(), 3);
    assert_eq!(store.current(), 2);
    assert!(store.slides().iter().all(|s| s.size() == Size::new(50, 40)));
}

#[test]
fn test_shrink_then_grow_is_lossy() {
    let size = Size::new(100, 100);
    let mut store = RasterStore::new(size, WHITE);
    if let Some(slide) = store.get_mut(0) {
        slide.fill_rect(Rect::new(50.0, 50.0, 1.0, 1.0), BLACK);
    }
    let before = store.current_slide().clone();

    store.migrate_all(Size::new(10, 10));
    store.migrate_all(size);

    assert_eq!(store.size(), size);
    assert_ne!(store.current_slide(), &before);
}

#[test]
fn test_migrate_to_same_size_is_noop() {
    let mut store = RasterStore::new(Size::new(30, 30), WHITE);
    if let Some(slide) = store.get_mut(0) {
        slide.fill_rect(Rect::new(3.0, 3.0, 1.0, 1.0), BLACK);
    }
    let before = store.current_slide().clone();
    store.migrate_all(Size::new(30, 30));
    assert_eq!(store.current_slide(), &before);
}
