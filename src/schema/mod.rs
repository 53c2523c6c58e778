use std::collections::BTreeMap;
use tracing::warn;

/// Closed entity-type vocabulary, each mapped to a canonical schema.org URI.
/// The URIs are descriptive context for the model, not enforced types.
const ENTITY_TYPES: &[(&str, &str)] = &[
    ("product", "https://schema.org/Product"),
    ("rating", "https://schema.org/AggregateRating"),
    ("price", "https://schema.org/Offer"),
    ("characteristic", "https://schema.org/PropertyValue"),
    ("material", "https://schema.org/Text"),
    ("manufacturer", "https://schema.org/Organization"),
    ("brand", "https://schema.org/Brand"),
    ("measurement", "https://schema.org/QuantitativeValue"),
    ("organization", "https://schema.org/Organization"),
    ("color", "https://schema.org/Text"),
];

/// Closed relation-type vocabulary. The source listing carries `hasColor`
/// twice; registry construction keeps the last entry and logs the overwrite.
const RELATION_TYPES: &[(&str, &str)] = &[
    ("hasCharacteristic", "https://schema.org/additionalProperty"),
    ("hasColor", "https://schema.org/color"),
    ("hasBrand", "https://schema.org/brand"),
    ("isProducedBy", "https://schema.org/manufacturer"),
    ("hasColor", "https://schema.org/color"),
    ("hasMeasurement", "https://schema.org/hasMeasurement"),
    ("isSimilarTo", "https://schema.org/isSimilarTo"),
    ("madeOfMaterial", "https://schema.org/material"),
    ("hasPrice", "https://schema.org/offers"),
    ("hasRating", "https://schema.org/aggregateRating"),
    ("relatedTo", "https://schema.org/isRelatedTo"),
];

/// Static registry of the entity and relation types the extraction may
/// produce. Fixed at startup; no mutation operations.
#[derive(Debug, Clone)]
pub struct ExtractionSchema {
    entity_types: BTreeMap<String, String>,
    relation_types: BTreeMap<String, String>,
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self {
            entity_types: build_registry("entity", ENTITY_TYPES),
            relation_types: build_registry("relation", RELATION_TYPES),
        }
    }
}

fn build_registry(kind: &str, listing: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut registry = BTreeMap::new();
    for (name, uri) in listing {
        if let Some(previous) = registry.insert((*name).to_string(), (*uri).to_string()) {
            warn!(
                "Duplicate {} type '{}': replacing '{}' with '{}'",
                kind, name, previous, uri
            );
        }
    }
    registry
}

impl ExtractionSchema {
    pub fn entity_types(&self) -> &BTreeMap<String, String> {
        &self.entity_types
    }

    pub fn relation_types(&self) -> &BTreeMap<String, String> {
        &self.relation_types
    }

    pub fn is_entity_type(&self, name: &str) -> bool {
        self.entity_types.contains_key(name)
    }

    pub fn is_relation_type(&self, name: &str) -> bool {
        self.relation_types.contains_key(name)
    }

    /// Render the entity-type listing as it appears in the prompt.
    pub fn entity_types_listing(&self) -> String {
        render_listing(&self.entity_types)
    }

    /// Render the relation-type listing as it appears in the prompt.
    pub fn relation_types_listing(&self) -> String {
        render_listing(&self.relation_types)
    }
}

fn render_listing(registry: &BTreeMap<String, String>) -> String {
    let mut listing = String::new();
    for (name, uri) in registry {
        listing.push_str(&format!("\"{}\": \"{}\"\n", name, uri));
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let schema = ExtractionSchema::default();

        assert_eq!(schema.entity_types().len(), 10);
        // 11 listed entries, one duplicate key
        assert_eq!(schema.relation_types().len(), 10);

        assert!(schema.is_entity_type("product"));
        assert!(schema.is_entity_type("color"));
        assert!(!schema.is_entity_type("hasColor"));

        assert!(schema.is_relation_type("hasColor"));
        assert!(schema.is_relation_type("relatedTo"));
        assert!(!schema.is_relation_type("product"));
    }

    #[test]
    fn test_duplicate_key_overwrites() {
        let registry = build_registry(
            "relation",
            &[("hasColor", "https://example.org/first"), ("hasColor", "https://example.org/second")],
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("hasColor").map(String::as_str), Some("https://example.org/second"));
    }

    #[test]
    fn test_listing_contains_all_entries() {
        let schema = ExtractionSchema::default();
        let listing = schema.entity_types_listing();

        for name in schema.entity_types().keys() {
            assert!(listing.contains(&format!("\"{}\"", name)));
        }
        assert!(listing.contains("https://schema.org/Product"));
    }
}
