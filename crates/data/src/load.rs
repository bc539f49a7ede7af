use crate::schema::{AbilityRange, AbilityRangeDef, CatalogDocument, RarityTier, RarityTierDef};
use anyhow::{bail, Context};
use packdraw_core::PlayerCatalog;
use std::fs;
use std::path::Path;

pub fn load_catalog(path: &Path) -> anyhow::Result<PlayerCatalog> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_catalog(&raw).with_context(|| format!("load {}", path.display()))
}

pub fn parse_catalog(raw: &str) -> anyhow::Result<PlayerCatalog> {
    let doc: CatalogDocument = serde_json::from_str(raw).context("parse catalog document")?;
    catalog_from_document(doc)
}

pub fn catalog_from_document(doc: CatalogDocument) -> anyhow::Result<PlayerCatalog> {
    let tiers = doc
        .rarity_tiers
        .into_iter()
        .map(tier_from_def)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let catalog = PlayerCatalog::new(doc.pack_types, tiers, doc.example_players, doc.positions)?;
    tracing::debug!(
        packs = catalog.packs().len(),
        tiers = catalog.tiers().len(),
        examples = catalog.examples().len(),
        positions = catalog.positions().len(),
        "catalog loaded"
    );
    Ok(catalog)
}

fn tier_from_def(def: RarityTierDef) -> anyhow::Result<RarityTier> {
    let ability_range = parse_ability_range(&def.ability_range)
        .with_context(|| format!("rarity tier {}", def.rarity))?;
    Ok(RarityTier {
        rarity: def.rarity,
        ability_range,
        display_color: def
            .display_color
            .unwrap_or_else(|| def.rarity.default_color().to_string()),
        display_class: def
            .display_class
            .unwrap_or_else(|| def.rarity.default_class().to_string()),
    })
}

pub fn parse_ability_range(def: &AbilityRangeDef) -> anyhow::Result<AbilityRange> {
    match def {
        AbilityRangeDef::Pair([min, max]) => Ok(AbilityRange {
            min: *min,
            max: *max,
        }),
        AbilityRangeDef::Text(text) => {
            let Some((min, max)) = text.split_once('-') else {
                bail!("ability range {text:?} is not of the form min-max");
            };
            let min = min
                .trim()
                .parse::<u8>()
                .with_context(|| format!("ability range {text:?} minimum"))?;
            let max = max
                .trim()
                .parse::<u8>()
                .with_context(|| format!("ability range {text:?} maximum"))?;
            Ok(AbilityRange { min, max })
        }
    }
}
