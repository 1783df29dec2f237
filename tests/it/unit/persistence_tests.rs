//! Slide persistence unit tests

use slideboard::persistence::{
    self, BlobStore, FileBlobStore, MemoryBlobStore, CURRENT_KEY, SLIDES_KEY,
};
use slideboard::store::RasterStore;
use slideboard::{Rect, Size};

use crate::helpers::{BLACK, RED, WHITE};

fn three_slides(size: Size) -> RasterStore {
    let mut store = RasterStore::new(size, WHITE);
    store.append(store.blank());
    store.append(store.blank());
    if let Some(slide) = store.get_mut(0) {
        slide.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), BLACK);
    }
    if let Some(slide) = store.get_mut(2) {
        slide.fill_rect(Rect::new(10.0, 10.0, 4.0, 4.0), RED);
    }
    store.set_current(2);
    store
}

#[test]
fn test_memory_round_trip_preserves_pixels_and_index() {
    let size = Size::new(40, 30);
    let store = three_slides(size);
    let mut blobs = MemoryBlobStore::new();
    persistence::save_slides(&store, &mut blobs).unwrap();

    let loaded = persistence::load_slides(&blobs, size, WHITE);
    assert_eq!(loaded.count(), 3);
    assert_eq!(loaded.current(), 2);
    assert_eq!(loaded.slides(), store.slides());
}

#[test]
fn test_stored_format_is_data_url_array() {
    let mut blobs = MemoryBlobStore::new();
    persistence::save_slides(&three_slides(Size::new(8, 8)), &mut blobs).unwrap();

    let json = blobs.get(SLIDES_KEY).unwrap().unwrap();
    let urls: Vec<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(urls.len(), 3);
    assert!(urls.iter().all(|u| u.starts_with("data:image/png;base64,")));
    assert_eq!(blobs.get(CURRENT_KEY).unwrap().as_deref(), Some("2"));
}

#[test]
fn test_out_of_range_index_falls_back_to_first() {
    let size = Size::new(16, 16);
    let mut blobs = MemoryBlobStore::new();
    persistence::save_slides(&three_slides(size), &mut blobs).unwrap();
    blobs.set(CURRENT_KEY, "9".into()).unwrap();

    let loaded = persistence::load_slides(&blobs, size, WHITE);
    assert_eq!(loaded.count(), 3);
    assert_eq!(loaded.current(), 0);
}

#[test]
fn test_load_stretches_to_current_size() {
    let mut blobs = MemoryBlobStore::new();
    persistence::save_slides(&three_slides(Size::new(40, 30)), &mut blobs).unwrap();

    let loaded = persistence::load_slides(&blobs, Size::new(80, 60), WHITE);
    assert_eq!(loaded.size(), Size::new(80, 60));
    assert_eq!(loaded.get(0).and_then(|s| s.pixel(2, 2)), Some(BLACK));
}

#[test]
fn test_unreadable_slide_becomes_blank() {
    let size = Size::new(10, 10);
    let mut blobs = MemoryBlobStore::new();
    let good = persistence::encode_data_url(&RasterStore::create_blank(size, BLACK)).unwrap();
    let urls = vec![good, "garbage".to_string()];
    blobs.set(SLIDES_KEY, serde_json::to_string(&urls).unwrap()).unwrap();

    let loaded = persistence::load_slides(&blobs, size, WHITE);
    assert_eq!(loaded.count(), 2);
    assert_eq!(loaded.get(0).and_then(|s| s.pixel(5, 5)), Some(BLACK));
    assert_eq!(loaded.get(1).and_then(|s| s.pixel(5, 5)), Some(WHITE));
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let size = Size::new(24, 18);
    let store = three_slides(size);

    {
        let mut blobs = FileBlobStore::open(&path).unwrap();
        persistence::save_slides(&store, &mut blobs).unwrap();
    }
    assert!(path.exists());

    let blobs = FileBlobStore::open(&path).unwrap();
    let loaded = persistence::load_slides(&blobs, size, WHITE);
    assert_eq!(loaded.count(), 3);
    assert_eq!(loaded.current(), 2);
    assert_eq!(loaded.slides(), store.slides());
}

#[test]
fn test_missing_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = FileBlobStore::open(dir.path().join("absent.json")).unwrap();
    assert_eq!(blobs.get(SLIDES_KEY).unwrap(), None);

    let loaded = persistence::load_slides(&blobs, Size::new(10, 10), WHITE);
    assert_eq!(loaded.count(), 1);
}

#[test]
fn test_corrupt_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(FileBlobStore::open(&path).is_err());
}

#[test]
fn test_file_store_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut blobs = FileBlobStore::open(dir.path().join("storage.json")).unwrap();
    persistence::save_slides(&three_slides(Size::new(8, 8)), &mut blobs).unwrap();

    assert!(blobs.path().exists());
    assert!(!blobs.temp_path().exists());
}

#[test]
fn test_interrupted_write_keeps_previous_slides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let size = Size::new(12, 12);
    let store = three_slides(size);

    let mut blobs = FileBlobStore::open(&path).unwrap();
    persistence::save_slides(&store, &mut blobs).unwrap();
    // A write that died before the rename leaves only a partial temp file
    std::fs::write(blobs.temp_path(), "{\"whiteboardSli").unwrap();

    let reopened = FileBlobStore::open(&path).unwrap();
    let loaded = persistence::load_slides(&reopened, size, WHITE);
    assert_eq!(loaded.count(), 3);
    assert_eq!(loaded.slides(), store.slides());
}
