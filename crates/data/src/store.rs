use packdraw_core::{PersistenceError, SnapshotStore, UserSnapshot, SNAPSHOT_VERSION};
use std::fs;
use std::path::PathBuf;

pub fn default_state_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PACKDRAW_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".packdraw_state.json"))
}

/// Keeps one user snapshot as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&mut self, snapshot: &UserSnapshot) -> Result<(), PersistenceError> {
        let body = serde_json::to_string_pretty(snapshot)
            .map_err(|err| PersistenceError::Serialize(err.to_string()))?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<UserSnapshot>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let body = fs::read_to_string(&self.path)?;
        let snapshot: UserSnapshot = serde_json::from_str(&body)
            .map_err(|err| PersistenceError::Serialize(err.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(Some(snapshot))
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
