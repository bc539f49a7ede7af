use crate::{
    BatchResult, CurrencyLedger, DrawContext, DrawEngine, DrawError, DrawResult, InventoryEntry,
    InventoryStats, InventoryStore, PackType, PersistenceError, PlayerCatalog, RandomSource,
    Rarity, SessionConfig, SnapshotStore, UserSnapshot,
};
use chrono::Utc;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("catalog already loaded")]
    CatalogAlreadyLoaded,
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// One user's pack-opening state: their ledger, their inventory, the shared
/// read-only catalog once it arrives, and an optional durable store.
pub struct Session<R: RandomSource> {
    config: SessionConfig,
    catalog: Option<PlayerCatalog>,
    ledger: CurrencyLedger,
    inventory: InventoryStore,
    rng: R,
    store: Option<Box<dyn SnapshotStore>>,
}

impl<R: RandomSource> Session<R> {
    pub fn new(config: SessionConfig, rng: R) -> Self {
        let ledger = config.starting_ledger();
        Self {
            config,
            catalog: None,
            ledger,
            inventory: InventoryStore::new(),
            rng,
            store: None,
        }
    }

    /// Restores the user from `store`. Missing or unreadable data starts the
    /// user from the configured defaults.
    pub fn with_store(config: SessionConfig, rng: R, store: Box<dyn SnapshotStore>) -> Self {
        let mut session = Self::new(config, rng);
        match store.load() {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    entries = snapshot.inventory.len(),
                    saved_at = %snapshot.saved_at,
                    "restored user data"
                );
                session.ledger = snapshot.currency;
                session.inventory = snapshot.inventory;
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "stored user data unreadable, using defaults");
            }
        }
        session.store = Some(store);
        session
    }

    pub fn install_catalog(&mut self, catalog: PlayerCatalog) -> Result<(), SessionError> {
        if self.catalog.is_some() {
            return Err(SessionError::CatalogAlreadyLoaded);
        }
        tracing::info!(
            packs = catalog.packs().len(),
            examples = catalog.examples().len(),
            "catalog installed"
        );
        self.catalog = Some(catalog);
        Ok(())
    }

    pub fn catalog_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn catalog(&self) -> Option<&PlayerCatalog> {
        self.catalog.as_ref()
    }

    pub fn pack_info(&self, pack_id: &str) -> Option<&PackType> {
        self.catalog.as_ref()?.pack(pack_id)
    }

    pub fn open_pack(&mut self, pack_id: &str) -> Result<DrawResult, DrawError> {
        let catalog = self.catalog.as_ref().ok_or(DrawError::CatalogNotLoaded)?;
        let engine = DrawEngine::new(catalog);
        let mut ctx = DrawContext {
            ledger: &mut self.ledger,
            inventory: &mut self.inventory,
            rng: &mut self.rng,
        };
        let result = engine.open_pack(pack_id, &mut ctx, Utc::now())?;
        self.persist();
        Ok(result)
    }

    /// Draws ten packs, stopping at the first failure. Errors are reported
    /// inside the result instead of being returned.
    pub fn open_ten_pack(&mut self, pack_id: &str) -> BatchResult {
        let Some(catalog) = self.catalog.as_ref() else {
            return BatchResult {
                results: Vec::new(),
                total_cost: 0,
                currency: None,
                error: Some(DrawError::CatalogNotLoaded),
            };
        };
        let engine = DrawEngine::new(catalog);
        let mut ctx = DrawContext {
            ledger: &mut self.ledger,
            inventory: &mut self.inventory,
            rng: &mut self.rng,
        };
        let batch = engine.open_ten_pack(pack_id, &mut ctx, Utc::now);
        if !batch.results.is_empty() {
            self.persist();
        }
        batch
    }

    pub fn inventory(&self) -> &[InventoryEntry] {
        self.inventory.all()
    }

    pub fn inventory_by_rarity(&self, rarity: Rarity) -> Vec<&InventoryEntry> {
        self.inventory.filter_by_rarity(rarity)
    }

    pub fn inventory_stats(&self) -> InventoryStats {
        self.inventory.stats()
    }

    pub fn currency(&self) -> &BTreeMap<String, u64> {
        self.ledger.balances()
    }

    pub fn balance(&self, currency: &str) -> u64 {
        self.ledger.balance(currency)
    }

    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot::capture(&self.inventory, &self.ledger)
    }

    pub fn save(&mut self) -> Result<(), SessionError> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        store.save(&UserSnapshot::capture(&self.inventory, &self.ledger))?;
        Ok(())
    }

    /// Empties the inventory, restores the starting balances and drops the
    /// stored snapshot. In-memory state is reset even if clearing the store
    /// fails.
    pub fn reset_user_data(&mut self) -> Result<(), SessionError> {
        self.inventory.clear();
        self.ledger = self.config.starting_ledger();
        if let Some(store) = self.store.as_mut() {
            store.clear()?;
        }
        tracing::info!("user data reset");
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(err) = self.save() {
            tracing::warn!(error = %err, "autosave failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, RarityTier, RarityWeight, RngState, SNAPSHOT_VERSION};

    fn catalog() -> PlayerCatalog {
        PlayerCatalog::new(
            vec![PackType {
                id: "standard".to_string(),
                name: None,
                currency: "coins".to_string(),
                price: 100,
                rarity_probabilities: vec![
                    RarityWeight {
                        rarity: Rarity::Silver,
                        percent: 80.0,
                    },
                    RarityWeight {
                        rarity: Rarity::Gold,
                        percent: 20.0,
                    },
                ],
            }],
            vec![
                RarityTier::new(Rarity::Silver, 70, 79),
                RarityTier::new(Rarity::Gold, 80, 89),
            ],
            Vec::new(),
            vec!["CB".to_string(), "CF".to_string()],
        )
        .expect("catalog")
    }

    fn loaded_session(seed: u64) -> Session<RngState> {
        let mut session = Session::new(SessionConfig::default(), RngState::from_seed(seed));
        session.install_catalog(catalog()).expect("install");
        session
    }

    #[test]
    fn draws_fail_gracefully_before_catalog_arrives() {
        let mut session = Session::new(SessionConfig::default(), RngState::from_seed(1));
        assert!(!session.catalog_loaded());
        assert_eq!(session.open_pack("standard"), Err(DrawError::CatalogNotLoaded));
        let batch = session.open_ten_pack("standard");
        assert!(batch.results.is_empty());
        assert_eq!(batch.error, Some(DrawError::CatalogNotLoaded));
        assert!(session.pack_info("standard").is_none());
        assert_eq!(session.balance("coins"), 500);
    }

    #[test]
    fn catalog_installs_once() {
        let mut session = loaded_session(2);
        assert!(matches!(
            session.install_catalog(catalog()),
            Err(SessionError::CatalogAlreadyLoaded)
        ));
        assert_eq!(session.pack_info("standard").map(|p| p.price), Some(100));
    }

    #[test]
    fn ten_pack_with_four_and_a_half_prices() {
        let config = SessionConfig {
            starting_balances: vec![crate::StartingBalance {
                currency: "coins".to_string(),
                amount: 450,
            }],
        };
        let mut session = Session::new(config, RngState::from_seed(5));
        session.install_catalog(catalog()).expect("install");
        let batch = session.open_ten_pack("standard");
        assert_eq!(batch.results.len(), 4);
        assert_eq!(batch.total_cost, 400);
        assert!(batch.error_message().is_some_and(|msg| !msg.is_empty()));
        assert_eq!(session.balance("coins"), 50);
        assert_eq!(session.inventory().len(), 4);
    }

    #[test]
    fn ten_pack_always_runs_ten_draws() {
        let config = SessionConfig {
            starting_balances: vec![crate::StartingBalance {
                currency: "coins".to_string(),
                amount: 5000,
            }],
        };
        let mut session = Session::new(config, RngState::from_seed(4));
        session.install_catalog(catalog()).expect("install");
        let batch = session.open_ten_pack("standard");
        assert!(batch.is_complete());
        assert_eq!(batch.results.len(), crate::TEN_PACK_DRAWS);
        assert_eq!(batch.total_cost, 1000);
        assert_eq!(session.balance("coins"), 4000);
    }

    #[test]
    fn stats_and_filters_reflect_draws() {
        let mut session = loaded_session(6);
        for _ in 0..5 {
            session.open_pack("standard").expect("draw");
        }
        let stats = session.inventory_stats();
        assert_eq!(stats.total_count, 5);
        let silver = session.inventory_by_rarity(Rarity::Silver).len();
        let gold = session.inventory_by_rarity(Rarity::Gold).len();
        assert_eq!(silver + gold, 5);
        assert_eq!(stats.per_rarity.get(&Rarity::Silver).copied().unwrap_or(0), silver);
    }

    #[test]
    fn draws_autosave_and_restore() {
        let store = MemoryStore::new();
        let mut session = Session::with_store(
            SessionConfig::default(),
            RngState::from_seed(7),
            Box::new(store.clone()),
        );
        session.install_catalog(catalog()).expect("install");
        session.open_pack("standard").expect("draw");
        session.open_ten_pack("standard");

        let saved = store.load().expect("load").expect("snapshot");
        assert_eq!(saved.version, SNAPSHOT_VERSION);
        assert_eq!(saved.inventory.all(), session.inventory());
        assert_eq!(saved.currency.balances(), session.currency());

        let restored = Session::with_store(
            SessionConfig::default(),
            RngState::from_seed(8),
            Box::new(store.clone()),
        );
        assert_eq!(restored.inventory().len(), 5);
        assert_eq!(restored.inventory(), session.inventory());
        assert_eq!(restored.balance("coins"), 0);
    }

    #[test]
    fn reset_is_idempotent() {
        let store = MemoryStore::new();
        let mut session = Session::with_store(
            SessionConfig::default(),
            RngState::from_seed(9),
            Box::new(store.clone()),
        );
        session.install_catalog(catalog()).expect("install");
        session.open_pack("standard").expect("draw");

        for _ in 0..2 {
            session.reset_user_data().expect("reset");
            assert!(session.inventory().is_empty());
            assert_eq!(session.currency(), SessionConfig::default().starting_ledger().balances());
            assert!(store.load().expect("load").is_none());
        }
    }
}
