//! Bundled per-collection datasets and the collection registry.
//!
//! Each collection ships a static JSON catalog (identifier, name, image,
//! traits) compiled into the binary. The catalog is the base item list in the
//! local sort mode and the metadata source merged into market results.

use crate::filter::normalize_trait_category;
use crate::types::CatalogItem;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Trait categories surfaced in the filter sidebar. Anything else in the
/// dataset is searchable but not filterable.
pub const ALLOWED_TRAIT_CATEGORIES: [&str; 5] = ["Background", "Body", "Type", "Face", "Outfit"];

/// A registered collection: slug plus the on-chain coordinates the market
/// endpoints need.
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    pub slug: &'static str,
    pub display_name: &'static str,
    pub contract: &'static str,
    pub chain: &'static str,
    dataset: &'static str,
}

const COLLECTIONS: [Collection; 2] = [
    Collection {
        slug: "parodee-pixel-chaos",
        display_name: "Parodee: Pixel Chaos",
        contract: "0x9e1dadf6eb875cf927c85a430887f2945039f923",
        chain: "ethereum",
        dataset: include_str!("../data/parodee-pixel-chaos.json"),
    },
    Collection {
        slug: "parodee-hyperevm",
        display_name: "Parodee: HyperEVM",
        contract: "0x90df79459afc5fc58b7bfdca3c27c18b03a29d66",
        chain: "hyperevm",
        dataset: include_str!("../data/parodee-hyperevm.json"),
    },
];

/// Look up a collection by slug, falling back to the default (first
/// registered) collection when the slug is unknown.
pub fn collection_or_default(slug: &str) -> Collection {
    COLLECTIONS
        .iter()
        .find(|c| c.slug == slug)
        .copied()
        .unwrap_or(COLLECTIONS[0])
}

pub fn default_slug() -> &'static str {
    COLLECTIONS[0].slug
}

pub fn all_collections() -> &'static [Collection] {
    &COLLECTIONS
}

/// Parse a collection's bundled catalog. The datasets are bundled with the
/// binary, so a parse failure is a packaging bug and surfaces at startup.
pub fn load_catalog(collection: &Collection) -> Result<Vec<CatalogItem>> {
    serde_json::from_str(collection.dataset)
        .with_context(|| format!("malformed bundled dataset for '{}'", collection.slug))
}

/// Collect the filterable traits present in a catalog: normalized category ->
/// sorted, deduped value list, restricted to the allowed categories.
pub fn available_traits(items: &[CatalogItem]) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for item in items {
        for t in &item.attributes {
            if t.trait_type.is_empty() {
                continue;
            }
            let category = normalize_trait_category(&t.trait_type);
            if !ALLOWED_TRAIT_CATEGORIES.contains(&category.as_str()) {
                continue;
            }
            let values = map.entry(category).or_default();
            if !values.contains(&t.value) {
                values.push(t.value.clone());
            }
        }
    }
    for values in map.values_mut() {
        values.sort();
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TraitAttribute;

    #[test]
    fn bundled_datasets_parse() {
        for collection in all_collections() {
            let items = load_catalog(collection).expect("bundled dataset must parse");
            assert!(!items.is_empty());
            // Identifiers are numeric strings in the bundled sets
            assert!(items.iter().all(|i| i.identifier.parse::<u64>().is_ok()));
        }
    }

    #[test]
    fn unknown_slug_falls_back_to_default() {
        let c = collection_or_default("no-such-collection");
        assert_eq!(c.slug, default_slug());
    }

    #[test]
    fn traits_are_normalized_sorted_and_restricted() {
        let items = vec![CatalogItem {
            identifier: "1".into(),
            name: None,
            image_url: None,
            attributes: vec![
                TraitAttribute { trait_type: "background".into(), value: "Red".into() },
                TraitAttribute { trait_type: "Background".into(), value: "Blue".into() },
                TraitAttribute { trait_type: "Shoelaces".into(), value: "Long".into() },
            ],
        }];
        let traits = available_traits(&items);
        assert_eq!(traits.len(), 1);
        assert_eq!(traits["Background"], vec!["Blue".to_string(), "Red".to_string()]);
    }
}
