use super::*;

// =============================================================================
// MemoryStore
// =============================================================================

#[test]
fn memory_set_get_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get("token").unwrap(), None);
    store.set("token", "t1").unwrap();
    assert_eq!(store.get("token").unwrap().as_deref(), Some("t1"));
    store.remove("token").unwrap();
    assert_eq!(store.get("token").unwrap(), None);
}

#[test]
fn memory_remove_missing_is_ok() {
    assert!(MemoryStore::new().remove("nothing").is_ok());
}

// =============================================================================
// FileStore
// =============================================================================

#[test]
fn file_missing_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));
    assert_eq!(store.get("token").unwrap(), None);
}

#[test]
fn file_creates_parent_dirs_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");
    FileStore::new(&path).set("user", r#"{"id":1}"#).unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("user").unwrap().as_deref(), Some(r#"{"id":1}"#));
}

#[test]
fn file_remove_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));
    store.set("token", "t1").unwrap();
    store.set("theme", "dark").unwrap();
    store.remove("token").unwrap();
    assert_eq!(store.get("token").unwrap(), None);
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn file_corrupt_document_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    let store = FileStore::new(&path);
    assert!(matches!(store.get("token"), Err(StorageError::Corrupt { .. })));
}

#[test]
fn file_empty_document_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "").unwrap();
    assert_eq!(FileStore::new(&path).get("token").unwrap(), None);
}

#[test]
fn file_leaves_no_tmp_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    FileStore::new(&path).set("k", "v").unwrap();
    assert!(!path.with_extension("tmp").exists());
}
