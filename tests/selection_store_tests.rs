//! Integration tests for the selection store and its persistence

use std::cell::RefCell;
use std::rc::Rc;

use synchronize::error::SiteError;
use synchronize::models::Catalog;
use synchronize::store::{
    FileStorage, MemoryStorage, SelectionStorage, SelectionStore, StoreEvent, STORAGE_KEY,
};
use tempfile::TempDir;

fn recorder(store: &mut SelectionStore) -> Rc<RefCell<Vec<StoreEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    store.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn test_selection_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");

    let mut store =
        SelectionStore::with_storage(Catalog::builtin(), Box::new(FileStorage::new(&path)));
    assert_eq!(store.current(), "cap");
    store.select("thor").unwrap();
    drop(store);

    let store = SelectionStore::with_storage(Catalog::builtin(), Box::new(FileStorage::new(&path)));
    assert_eq!(store.current(), "thor");
    assert_eq!(store.current_option().name, "Thor");
}

#[test]
fn test_corrupt_storage_falls_back_to_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut store =
        SelectionStore::with_storage(Catalog::builtin(), Box::new(FileStorage::new(&path)));
    assert_eq!(store.current(), "cap");

    // Writing replaces the corrupt file
    store.select("hulk").unwrap();
    assert_eq!(FileStorage::new(&path).load(STORAGE_KEY).as_deref(), Some("hulk"));
}

#[test]
fn test_stale_persisted_id_is_ignored() {
    let storage = MemoryStorage::with_entry(STORAGE_KEY, "loki");
    let store = SelectionStore::with_storage(Catalog::builtin(), Box::new(storage));
    assert_eq!(store.current(), "cap");
}

#[test]
fn test_remove_clears_saved_selection() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("storage.json");

    let mut storage = FileStorage::new(&path);
    storage.store(STORAGE_KEY, "spidey").unwrap();
    storage.store("other", "kept").unwrap();
    storage.remove(STORAGE_KEY).unwrap();

    assert_eq!(storage.load(STORAGE_KEY), None);
    assert_eq!(storage.load("other").as_deref(), Some("kept"));
}

#[test]
fn test_event_sequence_for_a_picker_session() {
    let mut store = SelectionStore::new(Catalog::builtin());
    let events = recorder(&mut store);

    assert!(store.set_modal_visible(true));
    assert!(!store.set_modal_visible(true));
    store.select("widow").unwrap();
    assert_eq!(
        store.select("nobody"),
        Err(SiteError::InvalidOption("nobody".to_string()))
    );
    assert!(store.set_modal_visible(false));

    assert_eq!(
        *events.borrow(),
        vec![
            StoreEvent::ModalVisibilityChanged(true),
            StoreEvent::SelectionChanged {
                previous: "cap".to_string(),
                current: "widow".to_string(),
            },
            StoreEvent::ModalVisibilityChanged(false),
        ]
    );
    assert_eq!(store.current(), "widow");
}

#[test]
fn test_reselecting_current_still_notifies() {
    let mut store = SelectionStore::new(Catalog::builtin());
    let events = recorder(&mut store);

    store.select("cap").unwrap();
    assert_eq!(
        *events.borrow(),
        vec![StoreEvent::SelectionChanged {
            previous: "cap".to_string(),
            current: "cap".to_string(),
        }]
    );
}

#[test]
fn test_custom_catalog_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r##"{
            "default": "falcon",
            "options": [
                { "id": "bucky", "name": "Winter Soldier", "color": "#3C3C46" },
                { "id": "falcon", "name": "Falcon", "color": "#B22222", "icon": "falcon.png" }
            ]
        }"##,
    )
    .unwrap();

    let catalog = Catalog::load(&path).unwrap();
    let mut store = SelectionStore::new(catalog);
    assert_eq!(store.current(), "falcon");
    store.select("bucky").unwrap();
    assert!(store.select("cap").is_err());
    assert_eq!(store.current(), "bucky");
}
