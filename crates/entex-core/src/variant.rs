//! Extraction variants.

use std::str::FromStr;

use thiserror::Error;

/// The two extraction flavors served by entex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Medical entities from a tweet or short text.
    Medical,
    /// Named entities with associated city, country and ISO code.
    Entities,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown variant: '{0}'. Supported variants: medical, entities")]
pub struct ParseVariantError(pub String);

impl Variant {
    /// All variants in display order.
    pub const ALL: [Variant; 2] = [Variant::Medical, Variant::Entities];

    /// URL path segment and config key for this variant.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Variant::Medical => "medical",
            Variant::Entities => "entities",
        }
    }

    /// Prefix used for `ENTEX_<VARIANT>_*` environment overrides.
    #[must_use]
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Variant::Medical => "MEDICAL",
            Variant::Entities => "ENTITIES",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "medical" | "med" => Ok(Variant::Medical),
            "entities" | "entity" | "ner" | "geo" => Ok(Variant::Entities),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}
