//! JSON file backed history store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use time::OffsetDateTime;
use tracing::{debug, info};

use skycast_types::SearchRecord;

use crate::error::{Error, Result};

/// Append-only search history kept as a JSON array in a single file.
///
/// The store itself does no locking. Callers that append from several tasks
/// must serialise access (the service keeps it behind a mutex). Each rewrite
/// goes through a temporary file and a rename, so readers never observe a
/// half-written array.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Use the history file at the given path. The file is created lazily.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Use the default history location.
    pub fn open_default() -> Self {
        Self::open(crate::default_history_path())
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the history file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Append a record for `city` stamped with the current local time.
    pub fn append_record(&self, city: &str) -> Result<SearchRecord> {
        self.append(SearchRecord::now(city))
    }

    /// Append a record for `city` stamped with `when`.
    pub fn append_record_at(&self, city: &str, when: OffsetDateTime) -> Result<SearchRecord> {
        self.append(SearchRecord::at(city, when))
    }

    fn append(&self, record: SearchRecord) -> Result<SearchRecord> {
        let mut history = self.load()?.unwrap_or_default();
        history.push(record.clone());
        self.write_all(&history)?;
        debug!(
            "Logged search for {:?} ({} records in {})",
            record.city,
            history.len(),
            self.path.display()
        );
        Ok(record)
    }

    /// Load every record in insertion order.
    ///
    /// Returns `Ok(None)` when the history file does not exist.
    pub fn load(&self) -> Result<Option<Vec<SearchRecord>>> {
        let Some(bytes) = self.raw_bytes()? else {
            return Ok(None);
        };
        let history = serde_json::from_slice(&bytes).map_err(|e| Error::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(history))
    }

    /// Literal contents of the history file, or `None` if it does not exist.
    pub fn raw_bytes(&self) -> Result<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write_all(&self, history: &[SearchRecord]) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            info!("Creating history directory {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let bytes = to_json_indented(history)?;
        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, bytes).map_err(|e| Error::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| Error::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Serialize with four-space indentation.
fn to_json_indented<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn temp_store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("search_history.json"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let (_dir, store) = temp_store();
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
        assert!(store.raw_bytes().unwrap().is_none());
    }

    #[test]
    fn test_append_creates_file() {
        let (_dir, store) = temp_store();
        let record = store.append_record("Berlin").unwrap();

        assert!(store.exists());
        let history = store.load().unwrap().unwrap();
        assert_eq!(history, vec![record]);
        assert_eq!(history[0].city, "Berlin");
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let (_dir, store) = temp_store();
        for city in ["Oslo", "Lima", "Accra"] {
            store.append_record(city).unwrap();
        }

        let cities: Vec<String> = store
            .load()
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|r| r.city)
            .collect();
        assert_eq!(cities, vec!["Oslo", "Lima", "Accra"]);
    }

    #[test]
    fn test_duplicate_cities_are_kept() {
        let (_dir, store) = temp_store();
        store.append_record("Paris").unwrap();
        store.append_record("Paris").unwrap();

        let history = store.load().unwrap().unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.city == "Paris"));
    }

    #[test]
    fn test_file_format_matches_history_layout() {
        let (_dir, store) = temp_store();
        store
            .append_record_at("Rome", datetime!(2024-05-01 09:30:00 UTC))
            .unwrap();

        let text = String::from_utf8(store.raw_bytes().unwrap().unwrap()).unwrap();
        assert_eq!(
            text,
            "[\n    {\n        \"city\": \"Rome\",\n        \"date\": \"2024-05-01 09:30:00\"\n    }\n]"
        );
    }

    #[test]
    fn test_appends_to_existing_file() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            r#"[{"city": "Cairo", "date": "2023-12-31 23:59:59"}]"#,
        )
        .unwrap();

        store.append_record("Quito").unwrap();

        let history = store.load().unwrap().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].city, "Cairo");
        assert_eq!(history[0].date, "2023-12-31 23:59:59");
        assert_eq!(history[1].city, "Quito");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load(), Err(Error::Corrupt { .. })));
        assert!(store.append_record("Oslo").is_err());
        // The corrupt file is left untouched
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{not json");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("nested/deeper/history.json"));

        store.append_record("Nairobi").unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (dir, store) = temp_store();
        store.append_record("Hanoi").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("search_history.json")]);
    }

    #[test]
    fn test_default_history_path() {
        let store = HistoryStore::open_default();
        assert_eq!(store.path(), Path::new("search_history.json"));
    }
}
