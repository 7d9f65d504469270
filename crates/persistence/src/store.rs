//! Where encoded save bytes live.

use crate::error::{PersistenceError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the save file inside a save directory.
pub const SAVE_FILE_NAME: &str = "idle_save.dat";

/// Exclusive owner of one persisted save slot.
pub trait SaveStore: Send {
    /// `None` when nothing has been saved yet.
    fn read(&self) -> Result<Option<Vec<u8>>>;
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn delete(&mut self) -> Result<()>;
    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Single file on disk, replaced atomically on every write.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store `SAVE_FILE_NAME` inside `dir`, creating the directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(SAVE_FILE_NAME),
        })
    }

    /// Store at an explicit file path. The parent directory must exist on write.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Io(e)),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let temp = self.temp_path();
        fs::write(&temp, bytes)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process store, for tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    bytes: Option<Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes: Some(bytes) }
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.bytes.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        self.bytes = None;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Platform data directory for saves, e.g. `~/.local/share/idle-template`.
pub fn default_save_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "idle-template")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(PersistenceError::NoSaveDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trip_and_delete() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::in_dir(tmp.path().join("nested")).unwrap();
        assert_eq!(store.read().unwrap(), None);

        store.write(b"first").unwrap();
        store.write(b"second").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some(&b"second"[..]));
        assert!(!store.temp_path().exists());
        assert!(store.path().ends_with(SAVE_FILE_NAME));

        store.delete().unwrap();
        assert_eq!(store.read().unwrap(), None);
        store.delete().unwrap();
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read().unwrap(), None);
        store.write(&[1, 2, 3]).unwrap();
        assert_eq!(store.read().unwrap(), Some(vec![1, 2, 3]));
        store.delete().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }
}
