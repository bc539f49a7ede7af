use crate::{
    resolve_rarity, CurrencyLedger, InventoryEntry, InventoryStore, PlayerCatalog, PlayerRecord,
    RandomSource, Rarity, RarityTier, SyntheticPlayerGenerator,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TEN_PACK_DRAWS: usize = 10;

/// Stages of a single draw. `Validating` and `Charging` are the only stages a
/// draw can abort from; past `Charging` it always reaches `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStage {
    Validating,
    Charging,
    Resolving,
    Selecting,
    Recording,
    Done,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawError {
    #[error("catalog not loaded")]
    CatalogNotLoaded,
    #[error("unknown pack type {0}")]
    UnknownPackType(String),
    #[error("insufficient {currency}: need {required}, have {available}")]
    InsufficientCurrency {
        currency: String,
        required: u64,
        available: u64,
    },
}

impl DrawError {
    pub fn stage(&self) -> DrawStage {
        match self {
            DrawError::CatalogNotLoaded | DrawError::UnknownPackType(_) => DrawStage::Validating,
            DrawError::InsufficientCurrency { .. } => DrawStage::Charging,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub currency: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    pub player: PlayerRecord,
    pub rarity: Rarity,
    pub cost: Cost,
}

/// Outcome of a multi-draw. Draws completed before a failure are kept along
/// with their debits; `error` records what stopped the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<DrawResult>,
    pub total_cost: u64,
    pub currency: Option<String>,
    pub error: Option<DrawError>,
}

impl BatchResult {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Mutable user state a draw works against.
pub struct DrawContext<'a, R: RandomSource + ?Sized> {
    pub ledger: &'a mut CurrencyLedger,
    pub inventory: &'a mut InventoryStore,
    pub rng: &'a mut R,
}

/// Resolves pack purchases against a loaded catalog. Holds no state of its
/// own; everything it mutates comes in through [`DrawContext`].
pub struct DrawEngine<'a> {
    catalog: &'a PlayerCatalog,
}

impl<'a> DrawEngine<'a> {
    pub fn new(catalog: &'a PlayerCatalog) -> Self {
        Self { catalog }
    }

    pub fn open_pack<R: RandomSource + ?Sized>(
        &self,
        pack_id: &str,
        ctx: &mut DrawContext<'_, R>,
        now: DateTime<Utc>,
    ) -> Result<DrawResult, DrawError> {
        tracing::debug!(pack = pack_id, stage = ?DrawStage::Validating, "draw");
        let pack = self
            .catalog
            .pack(pack_id)
            .ok_or_else(|| DrawError::UnknownPackType(pack_id.to_string()))?;

        tracing::debug!(pack = pack_id, stage = ?DrawStage::Charging, price = pack.price, "draw");
        if !ctx.ledger.try_debit(&pack.currency, pack.price) {
            let available = ctx.ledger.balance(&pack.currency);
            tracing::info!(
                pack = pack_id,
                currency = %pack.currency,
                required = pack.price,
                available,
                "debit refused"
            );
            return Err(DrawError::InsufficientCurrency {
                currency: pack.currency.clone(),
                required: pack.price,
                available,
            });
        }

        // Validation guarantees a non-empty table, so this never falls through.
        let rarity = resolve_rarity(&pack.rarity_probabilities, &mut *ctx.rng)
            .unwrap_or(Rarity::White);
        tracing::debug!(pack = pack_id, stage = ?DrawStage::Resolving, %rarity, "draw");

        let player = self.select_player(rarity, &mut *ctx.rng);
        tracing::debug!(
            pack = pack_id,
            stage = ?DrawStage::Selecting,
            player = player.id,
            overall = player.overall,
            "draw"
        );

        tracing::debug!(pack = pack_id, stage = ?DrawStage::Recording, "draw");
        ctx.inventory
            .append(InventoryEntry::acquired(player.snapshot(), now));
        tracing::debug!(pack = pack_id, stage = ?DrawStage::Done, %rarity, "draw");

        Ok(DrawResult {
            player,
            rarity,
            cost: Cost {
                currency: pack.currency.clone(),
                amount: pack.price,
            },
        })
    }

    /// Runs `draws` sequential single draws, stopping at the first failure.
    /// Nothing already drawn is rolled back. `clock` is read once per draw.
    pub fn open_batch<R: RandomSource + ?Sized>(
        &self,
        pack_id: &str,
        draws: usize,
        ctx: &mut DrawContext<'_, R>,
        mut clock: impl FnMut() -> DateTime<Utc>,
    ) -> BatchResult {
        let mut batch = BatchResult {
            results: Vec::with_capacity(draws),
            total_cost: 0,
            currency: None,
            error: None,
        };
        for _ in 0..draws {
            match self.open_pack(pack_id, ctx, clock()) {
                Ok(result) => {
                    batch.total_cost += result.cost.amount;
                    if batch.currency.is_none() {
                        batch.currency = Some(result.cost.currency.clone());
                    }
                    batch.results.push(result);
                }
                Err(err) => {
                    tracing::warn!(
                        pack = pack_id,
                        completed = batch.results.len(),
                        error = %err,
                        "batch stopped early"
                    );
                    batch.error = Some(err);
                    break;
                }
            }
        }
        batch
    }

    pub fn open_ten_pack<R: RandomSource + ?Sized>(
        &self,
        pack_id: &str,
        ctx: &mut DrawContext<'_, R>,
        clock: impl FnMut() -> DateTime<Utc>,
    ) -> BatchResult {
        self.open_batch(pack_id, TEN_PACK_DRAWS, ctx, clock)
    }

    /// An example player of `rarity` if the catalog has one, otherwise a
    /// synthetic player built from the rarity's tier.
    fn select_player<R: RandomSource + ?Sized>(&self, rarity: Rarity, rng: &mut R) -> PlayerRecord {
        if let Some(player) = self.catalog.select_example(rarity, rng) {
            return player;
        }
        let generator = SyntheticPlayerGenerator::new(self.catalog.positions());
        let tier = self
            .catalog
            .tier(rarity)
            .cloned()
            .unwrap_or_else(|| RarityTier::new(rarity, 1, 99));
        tracing::debug!(%rarity, "no example player, generating one");
        generator.generate(&tier, rng)
    }
}
