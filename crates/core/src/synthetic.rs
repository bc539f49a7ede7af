use crate::{Attribute, Foot, PlayerRecord, RandomSource, RarityTier};
use std::collections::{BTreeMap, BTreeSet};

const SURNAMES: [&str; 10] = [
    "Wang", "Li", "Zhang", "Liu", "Chen", "Yang", "Zhao", "Huang", "Zhou", "Wu",
];
const GIVEN_NAMES: [&str; 10] = [
    "Wei", "Qiang", "Lei", "Jun", "Yong", "Feng", "Jie", "Tao", "Ming", "Chao",
];

const BASELINE_OFFSET: i64 = 20;
const VARIATION: i64 = 40;
const GOALKEEPING_MAX: i64 = 29;

/// Builds placeholder players for rarities the catalog has no examples for.
pub struct SyntheticPlayerGenerator<'a> {
    positions: &'a [String],
}

impl<'a> SyntheticPlayerGenerator<'a> {
    pub fn new(positions: &'a [String]) -> Self {
        Self { positions }
    }

    pub fn generate<R: RandomSource + ?Sized>(&self, tier: &RarityTier, rng: &mut R) -> PlayerRecord {
        let range = tier.ability_range;
        let overall = rng.int_inclusive(i64::from(range.min), i64::from(range.max)) as u8;
        let position = rng
            .pick_index(self.positions.len())
            .and_then(|idx| self.positions.get(idx))
            .cloned()
            .unwrap_or_default();

        PlayerRecord {
            id: rng.int_inclusive(1000, 10999) as u32,
            name: random_name(rng),
            english_name: "RANDOM PLAYER".to_string(),
            rarity: tier.rarity,
            overall,
            position,
            secondary_positions: BTreeSet::new(),
            age: rng.int_inclusive(18, 32) as u8,
            height: rng.int_inclusive(165, 194) as u16,
            weight: rng.int_inclusive(60, 84) as u16,
            preferred_foot: if rng.int_inclusive(0, 1) == 0 {
                Foot::Left
            } else {
                Foot::Right
            },
            club: "Unknown Club".to_string(),
            nationality: "Unknown".to_string(),
            attributes: random_attributes(overall, rng),
            special_skills: BTreeSet::new(),
            play_style: "Balanced".to_string(),
            player_type: "All-rounder".to_string(),
        }
    }
}

fn random_name<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let surname = SURNAMES[rng.pick_index(SURNAMES.len()).unwrap_or(0)];
    let given = GIVEN_NAMES[rng.pick_index(GIVEN_NAMES.len()).unwrap_or(0)];
    format!("{surname} {given}")
}

/// Outfield attributes scatter around `overall - 20` with a spread of 40.
/// Goalkeeping ignores the overall entirely.
fn random_attributes<R: RandomSource + ?Sized>(overall: u8, rng: &mut R) -> BTreeMap<Attribute, u8> {
    let baseline = i64::from(overall) - BASELINE_OFFSET;
    Attribute::ALL
        .into_iter()
        .map(|attribute| {
            let raw = match attribute {
                Attribute::Goalkeeping => rng.int_inclusive(0, GOALKEEPING_MAX),
                _ => baseline + rng.int_inclusive(0, VARIATION - 1),
            };
            (attribute, raw.clamp(1, 99) as u8)
        })
        .collect()
}
