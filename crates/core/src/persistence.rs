use crate::{CurrencyLedger, InventoryStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything a user owns, as written to durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub version: u32,
    pub inventory: InventoryStore,
    pub currency: CurrencyLedger,
    pub saved_at: DateTime<Utc>,
}

impl UserSnapshot {
    pub fn capture(inventory: &InventoryStore, currency: &CurrencyLedger) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            inventory: inventory.clone(),
            currency: currency.clone(),
            saved_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl From<std::io::Error> for PersistenceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

/// Durable home for a user's snapshot. `load` returns `Ok(None)` when nothing
/// has been saved yet.
pub trait SnapshotStore {
    fn save(&mut self, snapshot: &UserSnapshot) -> Result<(), PersistenceError>;
    fn load(&self) -> Result<Option<UserSnapshot>, PersistenceError>;
    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// In-process store. Clones share one slot, so a caller can keep a handle to
/// what a session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<UserSnapshot>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &UserSnapshot) -> Result<(), PersistenceError> {
        *self.slot.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<UserSnapshot>, PersistenceError> {
        Ok(self.slot.borrow().clone())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}
