//! Issue record persistence.
//!
//! The store is read in full at the start of the alert pass and written in
//! full at the end. `JsonFileStore` writes through a temp file and renames it
//! into place, and serializes cycles with an exclusive `<state>.lock` file.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::STATE_LOCK_STALE_AFTER;
use crate::error_handling::PersistenceError;
use crate::models::IssueRecord;

/// Open issues keyed by `domain:monitor`.
pub type IssueMap = BTreeMap<String, IssueRecord>;

/// Read-all / write-all persistence for issue records.
pub trait IssueStore {
    fn load(&self) -> Result<IssueMap, PersistenceError>;

    fn save(&self, issues: &IssueMap) -> Result<(), PersistenceError>;
}

/// JSON object on disk, pretty-printed.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Takes the single-writer lock for this store.
    ///
    /// # Errors
    ///
    /// `PersistenceError::Locked` if another cycle holds the lock, `Write` if
    /// the lock file cannot be created.
    pub fn lock(&self) -> Result<StoreLock, PersistenceError> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
                path: lock_path.clone(),
                source,
            })?;
        }
        remove_if_stale(&lock_path);

        match OpenOptions::new().write(true).create_new(true).open(&lock_path) {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                Ok(StoreLock { path: lock_path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(PersistenceError::Locked(self.path.clone()))
            }
            Err(source) => Err(PersistenceError::Write {
                path: lock_path,
                source,
            }),
        }
    }
}

fn remove_if_stale(lock_path: &Path) {
    let age = std::fs::metadata(lock_path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok());
    if let Some(age) = age.filter(|age| *age > STATE_LOCK_STALE_AFTER) {
        log::warn!(
            "Removing stale lock {} ({}s old)",
            lock_path.display(),
            age.as_secs()
        );
        let _ = std::fs::remove_file(lock_path);
    }
}

impl IssueStore for JsonFileStore {
    fn load(&self) -> Result<IssueMap, PersistenceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IssueMap::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(IssueMap::new());
        }
        serde_json::from_str(&content).map_err(|source| PersistenceError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, issues: &IssueMap) -> Result<(), PersistenceError> {
        let write_err = |source: std::io::Error| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        serde_json::to_writer_pretty(&mut tmp, issues)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        tmp.as_file_mut().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

/// Held for the duration of the alert pass; removes the lock file on drop.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("Failed to release lock {}: {e}", self.path.display());
        }
    }
}

/// Non-persistent store, for demo runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    issues: std::sync::Mutex<IssueMap>,
}

impl MemoryStore {
    pub fn new(issues: IssueMap) -> Self {
        MemoryStore {
            issues: std::sync::Mutex::new(issues),
        }
    }

    pub fn snapshot(&self) -> IssueMap {
        self.issues.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl IssueStore for MemoryStore {
    fn load(&self) -> Result<IssueMap, PersistenceError> {
        Ok(self.snapshot())
    }

    fn save(&self, issues: &IssueMap) -> Result<(), PersistenceError> {
        if let Ok(mut stored) = self.issues.lock() {
            *stored = issues.clone();
        }
        Ok(())
    }
}
