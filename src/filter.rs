//! Pure predicates for the browsing view: free-text search and trait
//! filtering. Kept free of UI state so they can be tested in isolation.

use crate::types::CatalogItem;
use std::collections::BTreeMap;

/// Selected trait values keyed by normalized category name.
/// Conjunctive across categories, disjunctive within one.
pub type TraitSelection = BTreeMap<String, Vec<String>>;

/// Normalize a trait category name: uppercase the first letter, leave the
/// rest untouched. Total over its input: empty stays empty, already-mixed
/// case is preserved after the first character ("body" -> "Body",
/// "oUTFIT" -> "OUTFIT").
pub fn normalize_trait_category(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Case-insensitive substring search against name, identifier, and every
/// trait type/value pair. An empty or whitespace-only query matches all.
pub fn matches_search(item: &CatalogItem, query: &str) -> bool {
    matches_search_fields(item.name.as_deref(), &item.identifier, &item.attributes, query)
}

/// Field-level form of [`matches_search`], usable for merged display items
/// that are not backed by a `CatalogItem`.
pub fn matches_search_fields(
    name: Option<&str>,
    identifier: &str,
    attributes: &[crate::types::TraitAttribute],
    query: &str,
) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }

    if let Some(name) = name {
        if name.to_lowercase().contains(&q) {
            return true;
        }
    }
    if identifier.to_lowercase().contains(&q) {
        return true;
    }
    attributes
        .iter()
        .any(|t| t.value.to_lowercase().contains(&q) || t.trait_type.to_lowercase().contains(&q))
}

/// An item passes when, for every selected category, at least one of its
/// traits in that category is among the selected values. Categories are
/// compared after normalization.
pub fn matches_traits(item: &CatalogItem, selected: &TraitSelection) -> bool {
    selected.iter().all(|(category, values)| {
        if values.is_empty() {
            return true;
        }
        item.attributes.iter().any(|t| {
            normalize_trait_category(&t.trait_type) == *category && values.contains(&t.value)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TraitAttribute;

    fn item(identifier: &str, name: &str, traits: &[(&str, &str)]) -> CatalogItem {
        CatalogItem {
            identifier: identifier.to_string(),
            name: Some(name.to_string()),
            image_url: None,
            attributes: traits
                .iter()
                .map(|(t, v)| TraitAttribute {
                    trait_type: t.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn normalize_capitalizes_first_letter_only() {
        assert_eq!(normalize_trait_category("background"), "Background");
        assert_eq!(normalize_trait_category("Background"), "Background");
        assert_eq!(normalize_trait_category("oUTFIT"), "OUTFIT");
        assert_eq!(normalize_trait_category(""), "");
    }

    #[test]
    fn search_matches_name_id_and_traits() {
        let it = item("42", "Pixel Guy", &[("Face", "Grumpy")]);
        assert!(matches_search(&it, "grumpy"));
        assert!(matches_search(&it, "PIXEL"));
        assert!(matches_search(&it, "42"));
        assert!(matches_search(&it, "face"));
        assert!(!matches_search(&it, "99"));
    }

    #[test]
    fn search_empty_query_matches_all() {
        let it = item("1", "One", &[]);
        assert!(matches_search(&it, ""));
        assert!(matches_search(&it, "   "));
    }

    #[test]
    fn trait_filter_is_and_across_or_within() {
        let robot = item("1", "A", &[("Background", "Red"), ("Body", "Robot")]);
        let alien = item("2", "B", &[("Background", "Red"), ("Body", "Alien")]);
        let blue = item("3", "C", &[("Background", "Blue"), ("Body", "Robot")]);

        let mut sel = TraitSelection::new();
        sel.insert("Background".into(), vec!["Red".into()]);
        sel.insert("Body".into(), vec!["Robot".into()]);

        assert!(matches_traits(&robot, &sel));
        assert!(!matches_traits(&alien, &sel));
        assert!(!matches_traits(&blue, &sel));

        // OR within a category
        sel.insert("Body".into(), vec!["Robot".into(), "Alien".into()]);
        assert!(matches_traits(&robot, &sel));
        assert!(matches_traits(&alien, &sel));
    }

    #[test]
    fn trait_filter_normalizes_item_categories() {
        let lower = item("1", "A", &[("background", "Red")]);
        let mut sel = TraitSelection::new();
        sel.insert("Background".into(), vec!["Red".into()]);
        assert!(matches_traits(&lower, &sel));
    }

    #[test]
    fn empty_selection_passes_everything() {
        let it = item("1", "A", &[]);
        assert!(matches_traits(&it, &TraitSelection::new()));
        let mut sel = TraitSelection::new();
        sel.insert("Background".into(), vec![]);
        assert!(matches_traits(&it, &sel));
    }
}
