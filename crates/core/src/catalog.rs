use crate::{table_total, Attribute, PlayerRecord, RandomSource, Rarity, RarityTier, RarityWeight};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

const PERCENT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackType {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub currency: String,
    pub price: u64,
    pub rarity_probabilities: Vec<RarityWeight>,
}

impl PackType {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn probability_total(&self) -> f64 {
        table_total(&self.rarity_probabilities)
    }

    pub fn sums_to_hundred(&self) -> bool {
        (self.probability_total() - 100.0).abs() <= PERCENT_TOLERANCE
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog declares no positions")]
    EmptyPositions,
    #[error("duplicate position {0}")]
    DuplicatePosition(String),
    #[error("duplicate rarity tier {0}")]
    DuplicateTier(Rarity),
    #[error("rarity tier {rarity} has invalid ability range {min}-{max}")]
    InvalidAbilityRange { rarity: Rarity, min: u8, max: u8 },
    #[error("duplicate pack type {0}")]
    DuplicatePack(String),
    #[error("pack {0} must have a positive price")]
    InvalidPrice(String),
    #[error("pack {0} has an empty probability table")]
    EmptyProbabilityTable(String),
    #[error("pack {pack} has negative probability for {rarity}")]
    NegativeProbability { pack: String, rarity: Rarity },
    #[error("{owner} references rarity {rarity} with no tier definition")]
    MissingTier { owner: String, rarity: Rarity },
    #[error("player {id} has overall {overall} outside 1-99")]
    InvalidOverall { id: u32, overall: u8 },
    #[error("player {id} has {attribute:?} {value} outside 1-99")]
    InvalidAttribute {
        id: u32,
        attribute: Attribute,
        value: u8,
    },
    #[error("player {id} is missing attribute {attribute:?}")]
    MissingAttribute { id: u32, attribute: Attribute },
    #[error("player {id} plays unknown position {position}")]
    UnknownPosition { id: u32, position: String },
}

/// Read-only card catalog: pack definitions, rarity tiers, example players
/// and the known positions.
#[derive(Debug, Clone)]
pub struct PlayerCatalog {
    packs: Vec<PackType>,
    tiers: Vec<RarityTier>,
    examples: Vec<PlayerRecord>,
    positions: Vec<String>,
}

impl PlayerCatalog {
    pub fn new(
        packs: Vec<PackType>,
        tiers: Vec<RarityTier>,
        examples: Vec<PlayerRecord>,
        positions: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            packs,
            tiers,
            examples,
            positions,
        };
        catalog.validate()?;
        for pack in catalog.irregular_packs() {
            tracing::warn!(
                pack = %pack.id,
                total = pack.probability_total(),
                "pack probabilities do not sum to 100"
            );
        }
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.positions.is_empty() {
            return Err(CatalogError::EmptyPositions);
        }
        let mut seen_positions = HashSet::new();
        for position in &self.positions {
            if !seen_positions.insert(position.as_str()) {
                return Err(CatalogError::DuplicatePosition(position.clone()));
            }
        }

        let mut seen_tiers = HashSet::new();
        for tier in &self.tiers {
            if !seen_tiers.insert(tier.rarity) {
                return Err(CatalogError::DuplicateTier(tier.rarity));
            }
            let range = tier.ability_range;
            if range.min < 1 || range.max > 99 || range.min > range.max {
                return Err(CatalogError::InvalidAbilityRange {
                    rarity: tier.rarity,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        let mut seen_packs = HashSet::new();
        for pack in &self.packs {
            if !seen_packs.insert(pack.id.as_str()) {
                return Err(CatalogError::DuplicatePack(pack.id.clone()));
            }
            if pack.price == 0 {
                return Err(CatalogError::InvalidPrice(pack.id.clone()));
            }
            if pack.rarity_probabilities.is_empty() {
                return Err(CatalogError::EmptyProbabilityTable(pack.id.clone()));
            }
            for row in &pack.rarity_probabilities {
                if row.percent < 0.0 {
                    return Err(CatalogError::NegativeProbability {
                        pack: pack.id.clone(),
                        rarity: row.rarity,
                    });
                }
                if !seen_tiers.contains(&row.rarity) {
                    return Err(CatalogError::MissingTier {
                        owner: format!("pack {}", pack.id),
                        rarity: row.rarity,
                    });
                }
            }
        }

        for player in &self.examples {
            if !seen_tiers.contains(&player.rarity) {
                return Err(CatalogError::MissingTier {
                    owner: format!("player {}", player.id),
                    rarity: player.rarity,
                });
            }
            if !(1..=99).contains(&player.overall) {
                return Err(CatalogError::InvalidOverall {
                    id: player.id,
                    overall: player.overall,
                });
            }
            if !seen_positions.contains(player.position.as_str()) {
                return Err(CatalogError::UnknownPosition {
                    id: player.id,
                    position: player.position.clone(),
                });
            }
            if let Some(attribute) = player.missing_attribute() {
                return Err(CatalogError::MissingAttribute {
                    id: player.id,
                    attribute,
                });
            }
            for (attribute, value) in &player.attributes {
                if !(1..=99).contains(value) {
                    return Err(CatalogError::InvalidAttribute {
                        id: player.id,
                        attribute: *attribute,
                        value: *value,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn pack(&self, id: &str) -> Option<&PackType> {
        self.packs.iter().find(|pack| pack.id == id)
    }

    pub fn packs(&self) -> &[PackType] {
        &self.packs
    }

    pub fn tier(&self, rarity: Rarity) -> Option<&RarityTier> {
        self.tiers.iter().find(|tier| tier.rarity == rarity)
    }

    pub fn tiers(&self) -> &[RarityTier] {
        &self.tiers
    }

    pub fn positions(&self) -> &[String] {
        &self.positions
    }

    pub fn examples(&self) -> &[PlayerRecord] {
        &self.examples
    }

    pub fn examples_for(&self, rarity: Rarity) -> impl Iterator<Item = &PlayerRecord> {
        self.examples
            .iter()
            .filter(move |player| player.rarity == rarity)
    }

    /// Packs whose probability table does not total 100. They still load and
    /// draw; see [`crate::resolve_roll`] for how the shortfall resolves.
    pub fn irregular_packs(&self) -> impl Iterator<Item = &PackType> {
        self.packs.iter().filter(|pack| !pack.sums_to_hundred())
    }

    /// Uniform pick among the example players of exactly `rarity`, returned as
    /// an owned copy.
    pub fn select_example<R: RandomSource + ?Sized>(
        &self,
        rarity: Rarity,
        rng: &mut R,
    ) -> Option<PlayerRecord> {
        let pool: Vec<&PlayerRecord> = self.examples_for(rarity).collect();
        let idx = rng.pick_index(pool.len())?;
        pool.get(idx).map(|player| player.snapshot())
    }

    /// Display color for a rarity, falling back to the white tier's color.
    pub fn rarity_color(&self, rarity: Rarity) -> &str {
        self.tier(rarity)
            .map(|tier| tier.display_color.as_str())
            .unwrap_or_else(|| Rarity::White.default_color())
    }

    pub fn rarity_class(&self, rarity: Rarity) -> &str {
        self.tier(rarity)
            .map(|tier| tier.display_class.as_str())
            .unwrap_or_else(|| Rarity::White.default_class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Foot, RngState};
    use std::collections::BTreeSet;

    fn player(id: u32, rarity: Rarity, overall: u8) -> PlayerRecord {
        PlayerRecord {
            id,
            name: format!("player-{id}"),
            english_name: format!("PLAYER {id}"),
            rarity,
            overall,
            position: "CF".to_string(),
            secondary_positions: BTreeSet::new(),
            age: 25,
            height: 180,
            weight: 74,
            preferred_foot: Foot::Right,
            club: "Test FC".to_string(),
            nationality: "Testland".to_string(),
            attributes: Attribute::ALL.into_iter().map(|attribute| (attribute, 80)).collect(),
            special_skills: BTreeSet::new(),
            play_style: "Balanced".to_string(),
            player_type: "All-rounder".to_string(),
        }
    }

    fn pack(id: &str, rows: &[(Rarity, f64)]) -> PackType {
        PackType {
            id: id.to_string(),
            name: None,
            currency: "GP".to_string(),
            price: 100,
            rarity_probabilities: rows
                .iter()
                .map(|(rarity, percent)| RarityWeight {
                    rarity: *rarity,
                    percent: *percent,
                })
                .collect(),
        }
    }

    fn tiers() -> Vec<RarityTier> {
        vec![
            RarityTier::new(Rarity::Bronze, 60, 69),
            RarityTier::new(Rarity::Silver, 70, 79),
            RarityTier::new(Rarity::Gold, 80, 89),
        ]
    }

    fn positions() -> Vec<String> {
        vec!["GK".to_string(), "CF".to_string()]
    }

    #[test]
    fn select_example_only_returns_matching_rarity() {
        let catalog = PlayerCatalog::new(
            vec![pack("bronze", &[(Rarity::Bronze, 100.0)])],
            tiers(),
            vec![
                player(1, Rarity::Gold, 85),
                player(2, Rarity::Silver, 72),
                player(3, Rarity::Gold, 88),
            ],
            positions(),
        )
        .expect("catalog");
        let mut rng = RngState::from_seed(9);
        for _ in 0..50 {
            let picked = catalog.select_example(Rarity::Gold, &mut rng).expect("gold");
            assert_eq!(picked.rarity, Rarity::Gold);
            assert!(picked.id == 1 || picked.id == 3);
        }
        assert!(catalog.select_example(Rarity::Bronze, &mut rng).is_none());
    }

    #[test]
    fn rejects_pack_rarity_without_tier() {
        let err = PlayerCatalog::new(
            vec![pack("legend", &[(Rarity::Legend, 100.0)])],
            tiers(),
            Vec::new(),
            positions(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::MissingTier {
                owner: "pack legend".to_string(),
                rarity: Rarity::Legend,
            }
        );
    }

    #[test]
    fn rejects_zero_price_and_duplicates() {
        let mut free = pack("free", &[(Rarity::Bronze, 100.0)]);
        free.price = 0;
        let err = PlayerCatalog::new(vec![free], tiers(), Vec::new(), positions()).unwrap_err();
        assert_eq!(err, CatalogError::InvalidPrice("free".to_string()));

        let err = PlayerCatalog::new(
            vec![
                pack("same", &[(Rarity::Bronze, 100.0)]),
                pack("same", &[(Rarity::Gold, 100.0)]),
            ],
            tiers(),
            Vec::new(),
            positions(),
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicatePack("same".to_string()));
    }

    #[test]
    fn rejects_bad_ability_range() {
        let mut bad = tiers();
        bad.push(RarityTier::new(Rarity::Legend, 99, 95));
        let err = PlayerCatalog::new(Vec::new(), bad, Vec::new(), positions()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidAbilityRange {
                rarity: Rarity::Legend,
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_player_values() {
        let mut bad = player(5, Rarity::Gold, 85);
        bad.attributes.insert(Attribute::Stamina, 0);
        let err = PlayerCatalog::new(Vec::new(), tiers(), vec![bad], positions()).unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidAttribute {
                id: 5,
                attribute: Attribute::Stamina,
                value: 0,
            }
        );

        let mut partial = player(7, Rarity::Gold, 85);
        partial.attributes.remove(&Attribute::Curl);
        let err = PlayerCatalog::new(Vec::new(), tiers(), vec![partial], positions()).unwrap_err();
        assert_eq!(
            err,
            CatalogError::MissingAttribute {
                id: 7,
                attribute: Attribute::Curl,
            }
        );

        let mut lost = player(6, Rarity::Gold, 85);
        lost.position = "LWB".to_string();
        let err = PlayerCatalog::new(Vec::new(), tiers(), vec![lost], positions()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPosition { id: 6, .. }));
    }

    #[test]
    fn flags_irregular_packs_without_rejecting() {
        let catalog = PlayerCatalog::new(
            vec![
                pack("even", &[(Rarity::Bronze, 70.0), (Rarity::Gold, 30.0)]),
                pack("short", &[(Rarity::Bronze, 70.0), (Rarity::Gold, 29.5)]),
            ],
            tiers(),
            Vec::new(),
            positions(),
        )
        .expect("catalog");
        let flagged: Vec<&str> = catalog
            .irregular_packs()
            .map(|pack| pack.id.as_str())
            .collect();
        assert_eq!(flagged, vec!["short"]);
    }

    #[test]
    fn display_lookup_falls_back_to_white() {
        let catalog = PlayerCatalog::new(Vec::new(), tiers(), Vec::new(), positions())
            .expect("catalog");
        assert_eq!(catalog.rarity_color(Rarity::Gold), "#FFD700");
        assert_eq!(catalog.rarity_class(Rarity::Legend), "white-ball");
    }
}
