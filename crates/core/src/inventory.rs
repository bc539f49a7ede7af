use crate::{PlayerRecord, Rarity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryEntry {
    #[serde(flatten)]
    pub player: PlayerRecord,
    pub acquired_at: DateTime<Utc>,
    pub is_new: bool,
}

impl InventoryEntry {
    pub fn acquired(player: PlayerRecord, acquired_at: DateTime<Utc>) -> Self {
        Self {
            player,
            acquired_at,
            is_new: true,
        }
    }

    pub fn rarity(&self) -> Rarity {
        self.player.rarity
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStats {
    pub total_count: usize,
    pub per_rarity: BTreeMap<Rarity, usize>,
}

/// Append-only list of acquired cards, kept in acquisition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryStore {
    entries: Vec<InventoryEntry>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: InventoryEntry) {
        self.entries.push(entry);
    }

    pub fn all(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn filter_by_rarity(&self, rarity: Rarity) -> Vec<&InventoryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.rarity() == rarity)
            .collect()
    }

    pub fn stats(&self) -> InventoryStats {
        let mut per_rarity = BTreeMap::new();
        for entry in &self.entries {
            *per_rarity.entry(entry.rarity()).or_insert(0) += 1;
        }
        InventoryStats {
            total_count: self.entries.len(),
            per_rarity,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
