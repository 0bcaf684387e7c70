//! Best-effort key/value string storage
//!
//! File-backed equivalent of the browser's LocalStorage: each key is one file
//! under a data directory. All operations are best-effort; failures are
//! logged and callers fall back to in-memory state.

use std::fs;
use std::path::PathBuf;

/// A string-keyed storage directory
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Open storage rooted at the given directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            log::warn!("Failed to create storage dir {:?}: {}", dir, e);
        }
        Self { dir }
    }

    /// Default data directory (`BRICKBREAK_DATA` or `.brickbreak`)
    pub fn open_default() -> Self {
        let dir = std::env::var("BRICKBREAK_DATA").unwrap_or_else(|_| ".brickbreak".to_string());
        Self::new(dir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are simple identifiers; strip anything path-like
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    /// Read the value stored under `key`, if any
    pub fn get_item(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to read storage key {key}: {e}");
                None
            }
        }
    }

    /// Write `value` under `key`; failures are logged, never propagated
    pub fn set_item(&self, key: &str, value: &str) {
        if let Err(e) = fs::write(self.path_for(key), value) {
            log::warn!("Failed to write storage key {key}: {e}");
        }
    }

    /// Remove `key` if present
    pub fn remove_item(&self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove storage key {key}: {e}"),
        }
    }
}
