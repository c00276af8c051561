//! End-to-end behaviour of a filesystem-backed stash.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use serde_json::{json, Value};
use varstash_sdk::{
    CodecError, Digest, EntryError, Hash64, JsonCodec, SoftDelete, Stash, StashConfig,
    ValueCodec, Xxh64Hash64,
};

fn config(tmp: &tempfile::TempDir) -> StashConfig {
    StashConfig::named("workspace").with_base_dir(tmp.path())
}

fn open(tmp: &tempfile::TempDir) -> Stash<JsonCodec> {
    Stash::open(config(tmp), JsonCodec).unwrap()
}

fn values(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn blob(stash: &Stash<JsonCodec>, name: &str) -> PathBuf {
    stash.root().join(format!("{name}.bin"))
}

#[test]
fn add_remove_change_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);

    // {a: [1,2,3], b: "x"} -> two entries
    let report = stash
        .save_entries(&values(&[("a", json!([1, 2, 3])), ("b", json!("x"))]))
        .unwrap();
    assert_eq!(report.inserted, vec!["a", "b"]);
    assert_eq!(stash.list_stored_names().unwrap(), vec!["a", "b"]);
    let a_digest = stash.entries().unwrap().get("a").unwrap();

    // {a: [1,2,3]} -> b removed and trashed, a untouched
    let report = stash
        .save_entries(&values(&[("a", json!([1, 2, 3]))]))
        .unwrap();
    assert_eq!(report.deleted, vec!["b"]);
    assert_eq!(report.unchanged, vec!["a"]);
    assert_eq!(report.blob_writes(), 0);
    assert_eq!(stash.list_stored_names().unwrap(), vec!["a"]);
    assert_eq!(stash.entries().unwrap().get("a"), Some(a_digest));
    assert!(!blob(&stash, "b").exists());
    let trashed: Vec<_> = fs::read_dir(stash.root().join(".trash"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(trashed.len(), 1);
    assert!(trashed[0].ends_with("-b.bin"));

    // {a: [9]} -> a rewritten with a new digest
    let report = stash.save_entries(&values(&[("a", json!([9]))])).unwrap();
    assert_eq!(report.updated, vec!["a"]);
    assert_ne!(stash.entries().unwrap().get("a"), Some(a_digest));
    assert_eq!(fs::read(blob(&stash, "a")).unwrap(), b"[9]");
}

#[test]
fn unchanged_save_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);
    let set = values(&[("x", json!({"k": [1, 2]})), ("y", json!(3.5))]);

    stash.save_entries(&set).unwrap();
    let meta_path = stash.root().join("_varstash_meta.json");
    let meta_before = fs::read(&meta_path).unwrap();
    let entries_before = stash.entries().unwrap();

    let report = stash.save_entries(&set).unwrap();

    assert!(report.is_noop());
    assert_eq!(report.unchanged, vec!["x", "y"]);
    assert_eq!(stash.entries().unwrap(), entries_before);
    assert_eq!(fs::read(&meta_path).unwrap(), meta_before);
}

#[test]
fn round_trip_preserves_serialized_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);
    let original = json!({"nested": {"list": [1, "two", null, 3.25]}, "flag": false});
    stash
        .save_entries(&values(&[("doc", original.clone())]))
        .unwrap();

    let reopened = open(&tmp);
    let mut ns: BTreeMap<String, Value> = BTreeMap::new();
    let report = reopened.load_all_entries(&mut ns).unwrap();

    assert!(report.is_complete());
    assert_eq!(
        JsonCodec.encode(&ns["doc"]).unwrap(),
        JsonCodec.encode(&original).unwrap()
    );
}

#[test]
fn load_sanitizes_names() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);
    stash
        .save_entries(&values(&[("1bad name!", json!(1)), ("ok", json!(2))]))
        .unwrap();

    let (ns, report) = stash.load_map().unwrap();
    assert_eq!(ns.keys().collect::<Vec<_>>(), vec!["x1bad_name_", "ok"]);
    assert_eq!(report.bound[0].0, "1bad name!");
}

/// JSON codec that refuses to encode objects containing a "secret" key and
/// treats `null` as not persistable.
struct Guarded;

impl ValueCodec for Guarded {
    type Value = Value;

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        if value.get("secret").is_some() {
            return Err(CodecError::Serialize("refusing to encode secrets".into()));
        }
        JsonCodec.encode(value)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        JsonCodec.decode(bytes)
    }

    fn is_persistable(&self, value: &Value) -> bool {
        !value.is_null()
    }
}

#[test]
fn one_bad_entry_does_not_block_the_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = Stash::open(config(&tmp), Guarded).unwrap();

    let report = stash
        .save_entries(&values(&[
            ("first", json!(1)),
            ("leak", json!({"secret": "hunter2"})),
            ("gone", Value::Null),
            ("last", json!([2])),
        ]))
        .unwrap();

    assert_eq!(report.inserted, vec!["first", "last"]);
    assert_eq!(report.skipped.len(), 2);
    assert!(matches!(report.skipped[0].reason, EntryError::Fingerprint(_)));
    assert!(matches!(report.skipped[1].reason, EntryError::NonPersistable));
    assert_eq!(stash.list_stored_names().unwrap(), vec!["first", "last"]);
}

#[test]
fn skipped_entry_keeps_previous_blob() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = Stash::open(config(&tmp), Guarded).unwrap();
    stash.save_entries(&values(&[("v", json!(7))])).unwrap();

    stash.save_entries(&values(&[("v", Value::Null)])).unwrap();

    assert_eq!(stash.list_stored_names().unwrap(), vec!["v"]);
    let (ns, _) = stash.load_map().unwrap();
    assert_eq!(ns["v"], json!(7));
}

#[test]
fn corrupt_metadata_aborts_save_and_load() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);
    stash.save_entries(&values(&[("a", json!(1))])).unwrap();
    fs::write(stash.root().join("_varstash_meta.json"), b"[1, 2").unwrap();

    assert!(stash.save_entries(&values(&[("a", json!(2))])).is_err());
    let mut ns: BTreeMap<String, Value> = BTreeMap::new();
    assert!(stash.load_all_entries(&mut ns).is_err());
    assert_eq!(fs::read(blob(&stash, "a")).unwrap(), b"1");
}

#[test]
fn missing_blob_is_skipped_on_load() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);
    stash
        .save_entries(&values(&[("a", json!(1)), ("b", json!(2))]))
        .unwrap();
    fs::remove_file(blob(&stash, "a")).unwrap();

    let (ns, report) = stash.load_map().unwrap();
    assert_eq!(ns.len(), 1);
    assert_eq!(report.failures[0].name, "a");
}

/// Records every soft-deleted path and moves the file aside.
#[derive(Default)]
struct RecordingTrash {
    deleted: Mutex<Vec<PathBuf>>,
}

impl SoftDelete for RecordingTrash {
    fn soft_delete(&self, path: &Path) -> std::io::Result<PathBuf> {
        let dest = path.with_extension("deleted");
        fs::rename(path, &dest)?;
        self.deleted.lock().unwrap().push(path.to_path_buf());
        Ok(dest)
    }
}

#[test]
fn host_soft_delete_capability_is_used() {
    let tmp = tempfile::tempdir().unwrap();
    let trash = Arc::new(RecordingTrash::default());
    let stash = open(&tmp).with_soft_delete(trash.clone());

    stash
        .save_entries(&values(&[("keep", json!(1)), ("drop", json!(2))]))
        .unwrap();
    stash.save_entries(&values(&[("keep", json!(1))])).unwrap();

    let deleted = trash.deleted.lock().unwrap();
    assert_eq!(deleted.len(), 1);
    assert!(deleted[0].ends_with("drop.bin"));
    assert!(stash.root().join("drop.deleted").exists());
}

#[test]
fn interrupted_save_leaves_detectable_orphan() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);
    stash.save_entries(&values(&[("a", json!(1))])).unwrap();

    // A blob written without the metadata write that should follow it.
    fs::write(blob(&stash, "late"), b"2").unwrap();

    let drift = stash.check().unwrap();
    assert_eq!(drift.orphaned_blobs, vec!["late"]);
    assert!(drift.missing_blobs.is_empty());

    // The next save that presents the name adopts the blob by rewriting it.
    let report = stash
        .save_entries(&values(&[("a", json!(1)), ("late", json!(2))]))
        .unwrap();
    assert_eq!(report.inserted, vec!["late"]);
    assert!(stash.check().unwrap().is_consistent());
}

#[test]
fn resaving_unchanged_value_restores_deleted_blob() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);
    let set = values(&[("a", json!([1, 2, 3]))]);
    stash.save_entries(&set).unwrap();
    fs::remove_file(blob(&stash, "a")).unwrap();
    assert_eq!(stash.check().unwrap().missing_blobs, vec!["a"]);

    let report = stash.save_entries(&set).unwrap();

    assert_eq!(report.updated, vec!["a"]);
    assert!(matches!(report.drift[0].reason, EntryError::MissingBlob));
    assert!(stash.check().unwrap().is_consistent());
    let (ns, load) = stash.load_map().unwrap();
    assert!(load.is_complete());
    assert_eq!(ns["a"], json!([1, 2, 3]));
}

#[test]
fn default_digests_are_xxh64_of_serialized_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let stash = open(&tmp);
    stash.save_entries(&values(&[("a", json!([1, 2, 3]))])).unwrap();

    let expected: Digest = Xxh64Hash64.hash64(b"[1,2,3]");
    assert_eq!(stash.entries().unwrap().get("a"), Some(expected));
}
