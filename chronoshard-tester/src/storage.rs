use chronoshard_game::{GameStorage, PlayerState};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("Storage error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One pretty-printed JSON snapshot per slot under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slot names are reduced to `[A-Za-z0-9_-]` so they cannot escape the directory.
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        let mut name: String = slot
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if name.is_empty() {
            name.push('_');
        }
        self.dir.join(format!("{name}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> FileStorageError {
    FileStorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl GameStorage for JsonFileStorage {
    type Error = FileStorageError;

    fn save_game(&self, slot: &str, state: &PlayerState) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.slot_path(slot);
        let json = serde_json::to_vec_pretty(state)?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))
    }

    fn load_game(&self, slot: &str) -> Result<Option<PlayerState>, Self::Error> {
        let path = self.slot_path(slot);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn delete_save(&self, slot: &str) -> Result<(), Self::Error> {
        let path = self.slot_path(slot);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(io_error(&path, e)),
            _ => Ok(()),
        }
    }
}
