use crate::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player quality tiers, lowest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    White,
    Bronze,
    Silver,
    Gold,
    Black,
    Legend,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::White,
        Rarity::Bronze,
        Rarity::Silver,
        Rarity::Gold,
        Rarity::Black,
        Rarity::Legend,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::White => "white",
            Rarity::Bronze => "bronze",
            Rarity::Silver => "silver",
            Rarity::Gold => "gold",
            Rarity::Black => "black",
            Rarity::Legend => "legend",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rarity| rarity.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn default_color(self) -> &'static str {
        match self {
            Rarity::White => "#CCCCCC",
            Rarity::Bronze => "#CD7F32",
            Rarity::Silver => "#C0C0C0",
            Rarity::Gold => "#FFD700",
            Rarity::Black => "#2C2C2C",
            Rarity::Legend => "#8B00FF",
        }
    }

    pub fn default_class(self) -> &'static str {
        match self {
            Rarity::White => "white-ball",
            Rarity::Bronze => "bronze-ball",
            Rarity::Silver => "silver-ball",
            Rarity::Gold => "gold-ball",
            Rarity::Black => "black-ball",
            Rarity::Legend => "legend-ball",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbilityRange {
    pub min: u8,
    pub max: u8,
}

impl AbilityRange {
    pub fn contains(&self, overall: u8) -> bool {
        (self.min..=self.max).contains(&overall)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RarityTier {
    pub rarity: Rarity,
    pub ability_range: AbilityRange,
    pub display_color: String,
    pub display_class: String,
}

impl RarityTier {
    pub fn new(rarity: Rarity, min: u8, max: u8) -> Self {
        Self {
            rarity,
            ability_range: AbilityRange { min, max },
            display_color: rarity.default_color().to_string(),
            display_class: rarity.default_class().to_string(),
        }
    }
}

/// One row of a pack's probability table. `percent` is out of 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RarityWeight {
    pub rarity: Rarity,
    pub percent: f64,
}

pub fn table_total(table: &[RarityWeight]) -> f64 {
    table.iter().map(|row| row.percent).sum()
}

/// Roll a rarity from a probability table in declared order.
pub fn resolve_rarity<R: RandomSource + ?Sized>(
    table: &[RarityWeight],
    rng: &mut R,
) -> Option<Rarity> {
    resolve_roll(table, rng.unit() * 100.0)
}

/// Walks the table accumulating percentages and returns the first rarity whose
/// running total reaches `roll`. A roll past the total (table sums below 100)
/// yields the first declared rarity, not a uniform pick.
pub fn resolve_roll(table: &[RarityWeight], roll: f64) -> Option<Rarity> {
    let mut cumulative = 0.0;
    for row in table {
        cumulative += row.percent;
        if cumulative >= roll {
            return Some(row.rarity);
        }
    }
    table.first().map(|row| row.rarity)
}
