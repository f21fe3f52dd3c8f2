//! Persisted view preferences
//!
//! Filter state and column widths for each named view, stored as one JSON
//! file per view under the platform data directory. The blob format is the
//! in-memory shape; nothing else reads these files. Saves replace the file
//! atomically via a temp file in the same directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::view::{ColumnWidths, FilterState};

/// Everything a view remembers between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewPrefs {
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub column_widths: ColumnWidths,
}

/// Loads and saves per-view preference files
pub struct PrefsStore {
    dir: PathBuf,
}

impl PrefsStore {
    /// Store under the platform data dir (`<data dir>/sift/views`)
    pub fn new() -> Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?
            .join("sift")
            .join("views");
        Ok(Self { dir })
    }

    /// Store under an explicit directory (tests, portable installs)
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load preferences for a view. A missing file yields defaults; a file
    /// that fails to parse is treated the same after a warning, so a bad
    /// blob never wedges the view.
    pub fn load(&self, view: &str) -> ViewPrefs {
        let path = self.view_path(view);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(_) => return ViewPrefs::default(),
        };

        match serde_json::from_str(&data) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(view, path = %path.display(), error = %e, "Ignoring unreadable view preferences");
                ViewPrefs::default()
            }
        }
    }

    /// Save preferences for a view, replacing the file atomically
    pub fn save(&self, view: &str, prefs: &ViewPrefs) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.view_path(view);
        let json = serde_json::to_string_pretty(prefs)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&path)
            .map_err(|e| Error::Io(e.error))?;

        Ok(())
    }

    /// Remove a view's saved preferences, if any
    pub fn clear(&self, view: &str) -> Result<()> {
        let path = self.view_path(view);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn view_path(&self, view: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_view_name(view)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Reduce a view name to a safe file stem
fn sanitize_view_name(view: &str) -> String {
    let stem: String = view
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "default".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SortField;

    fn store() -> (tempfile::TempDir, PrefsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::with_dir(dir.path());
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load("transactions"), ViewPrefs::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, store) = store();

        let mut prefs = ViewPrefs::default();
        prefs.filters = prefs
            .filters
            .with_search(Some("starbucks".to_string()))
            .sorted_by(SortField::Amount);
        prefs.column_widths.resize("description", 320);

        store.save("transactions", &prefs).unwrap();
        assert_eq!(store.load("transactions"), prefs);
    }

    #[test]
    fn test_views_are_independent() {
        let (_dir, store) = store();

        let mut prefs = ViewPrefs::default();
        prefs.column_widths.resize("amount", 100);
        store.save("transactions", &prefs).unwrap();

        assert_eq!(store.load("accounts"), ViewPrefs::default());
        assert_eq!(store.load("transactions"), prefs);
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let (dir, store) = store();

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("transactions.json"), "{not json").unwrap();

        assert_eq!(store.load("transactions"), ViewPrefs::default());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_dir, store) = store();

        let prefs = ViewPrefs::default();
        store.save("transactions", &prefs).unwrap();
        store.clear("transactions").unwrap();
        store.clear("transactions").unwrap();
        assert_eq!(store.load("transactions"), ViewPrefs::default());
    }

    #[test]
    fn test_view_name_sanitized() {
        let (dir, store) = store();

        store
            .save("transactions/../../etc", &ViewPrefs::default())
            .unwrap();

        // Everything stays inside the store directory
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with(".json"));
        assert!(!entries[0].contains('/'));
    }
}
