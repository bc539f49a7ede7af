use serde::Deserialize;

pub use packdraw_core::{
    AbilityRange, Attribute, Foot, PackType, PlayerRecord, Rarity, RarityTier, RarityWeight,
};

/// The catalog document as published. Field names are checked strictly so a
/// reshaped document fails at load instead of drawing from missing data.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    pub pack_types: Vec<PackType>,
    pub rarity_tiers: Vec<RarityTierDef>,
    #[serde(default)]
    pub example_players: Vec<PlayerRecord>,
    pub positions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RarityTierDef {
    pub rarity: Rarity,
    pub ability_range: AbilityRangeDef,
    #[serde(default)]
    pub display_color: Option<String>,
    #[serde(default)]
    pub display_class: Option<String>,
}

/// Either `"80-89"` or `[80, 89]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AbilityRangeDef {
    Text(String),
    Pair([u8; 2]),
}
