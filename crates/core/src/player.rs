use crate::Rarity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    OffensiveAwareness,
    BallControl,
    Crossing,
    LowPass,
    LoftedPass,
    Finishing,
    PlaceKicking,
    Curl,
    Heading,
    Speed,
    Acceleration,
    Dribbling,
    BallWinning,
    DefensiveAwareness,
    PhysicalContact,
    Jump,
    Stamina,
    Goalkeeping,
}

impl Attribute {
    pub const ALL: [Attribute; 18] = [
        Attribute::OffensiveAwareness,
        Attribute::BallControl,
        Attribute::Crossing,
        Attribute::LowPass,
        Attribute::LoftedPass,
        Attribute::Finishing,
        Attribute::PlaceKicking,
        Attribute::Curl,
        Attribute::Heading,
        Attribute::Speed,
        Attribute::Acceleration,
        Attribute::Dribbling,
        Attribute::BallWinning,
        Attribute::DefensiveAwareness,
        Attribute::PhysicalContact,
        Attribute::Jump,
        Attribute::Stamina,
        Attribute::Goalkeeping,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Foot {
    Left,
    Right,
}

/// A player card. Inventory entries hold their own copy, so later catalog
/// changes never reach an acquired card. Every field is required and unknown
/// keys are rejected, so a misnamed field fails at load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlayerRecord {
    pub id: u32,
    pub name: String,
    pub english_name: String,
    pub rarity: Rarity,
    pub overall: u8,
    pub position: String,
    pub secondary_positions: BTreeSet<String>,
    pub age: u8,
    pub height: u16,
    pub weight: u16,
    pub preferred_foot: Foot,
    pub club: String,
    pub nationality: String,
    pub attributes: BTreeMap<Attribute, u8>,
    pub special_skills: BTreeSet<String>,
    pub play_style: String,
    pub player_type: String,
}

impl PlayerRecord {
    /// Independent value copy for handing out of the catalog.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<u8> {
        self.attributes.get(&attribute).copied()
    }

    pub fn missing_attribute(&self) -> Option<Attribute> {
        Attribute::ALL
            .into_iter()
            .find(|attribute| !self.attributes.contains_key(attribute))
    }
}
