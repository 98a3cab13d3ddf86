use aura_core::{BackgroundStore, Blob};
use std::collections::HashSet;
use tempfile::tempdir;

fn png(seed: u8) -> Blob {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend([seed; 16]);
    Blob::new("image/png", bytes)
}

#[test]
fn opens_lazily_and_creates_schema() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("nested").join("backgrounds.db");
    let store = BackgroundStore::new(&db);
    assert!(!db.exists());
    store.ensure_open().unwrap();
    store.ensure_open().unwrap();
    assert!(db.exists());

    let conn = rusqlite::Connection::open(&db).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(1) FROM sqlite_master WHERE type='table' AND name='backgrounds'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(tables, 1);
}

#[test]
fn upload_list_delete_scenario() {
    let dir = tempdir().unwrap();
    let store = BackgroundStore::new(dir.path().join("bg.db"));
    let before = chrono::Utc::now().timestamp_millis();
    let rec = store.add(png(1)).unwrap();
    let after = chrono::Utc::now().timestamp_millis();
    assert!(!rec.id.is_empty());
    assert!(rec.created_at >= before && rec.created_at <= after + 1);
    assert_eq!(rec.sha256.len(), 64);

    let all = store.get_all().unwrap();
    assert_eq!(all, vec![rec.clone()]);

    store.delete(&rec.id).unwrap();
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn get_all_is_newest_first() {
    let dir = tempdir().unwrap();
    let store = BackgroundStore::new(dir.path().join("bg.db"));
    for i in 0..6 {
        store.add(png(i)).unwrap();
    }
    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 6);
    for pair in all.windows(2) {
        assert!(pair[0].created_at > pair[1].created_at);
    }
    // last inserted comes first
    assert_eq!(all[0].file.bytes.last(), Some(&5));
}

#[test]
fn deleting_k_of_n_leaves_the_rest() {
    let dir = tempdir().unwrap();
    let store = BackgroundStore::new(dir.path().join("bg.db"));
    let ids: Vec<String> = (0..5).map(|i| store.add(png(i)).unwrap().id).collect();
    let deleted: HashSet<&String> = [&ids[0], &ids[3]].into_iter().collect();
    for id in &deleted {
        store.delete(id).unwrap();
    }
    let left = store.get_all().unwrap();
    assert_eq!(left.len(), 3);
    assert_eq!(store.count().unwrap(), 3);
    assert!(left.iter().all(|r| !deleted.contains(&r.id)));
}

#[test]
fn missing_id_is_none_and_delete_is_noop() {
    let dir = tempdir().unwrap();
    let store = BackgroundStore::new(dir.path().join("bg.db"));
    let rec = store.add(png(9)).unwrap();
    assert!(store.get_by_id("nope").unwrap().is_none());
    store.delete("nope").unwrap();
    let found = store.get_by_id(&rec.id).unwrap().expect("record");
    assert_eq!(found.file, png(9));
}

#[test]
fn records_survive_reopen() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("bg.db");
    let id = BackgroundStore::new(&db).add(png(3)).unwrap().id;
    let reopened = BackgroundStore::new(&db);
    assert_eq!(reopened.get_by_id(&id).unwrap().unwrap().file.media_type, "image/png");
}

#[test]
fn unopenable_path_is_a_storage_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();
    // parent "directory" is a regular file
    let store = BackgroundStore::new(blocker.join("bg.db"));
    let err = store.add(png(0)).unwrap_err();
    assert!(err.is_storage());
}
