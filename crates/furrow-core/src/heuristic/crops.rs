//! Crop families and the alias table used to recognise them.

use std::fmt;

use crate::models::normalize_crop_name;

/// Crop families with dedicated heuristic templates or maturity lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropFamily {
    Rice,
    Wheat,
    Maize,
    SweetCorn,
    Potato,
    Tomato,
    Onion,
    Cotton,
    Sugarcane,
    /// Anything the alias table does not recognise
    Generic,
}

/// Normalized aliases, matched as whole-word sequences.
const ALIASES: &[(&str, CropFamily)] = &[
    ("rice", CropFamily::Rice),
    ("paddy", CropFamily::Rice),
    ("basmati", CropFamily::Rice),
    ("wheat", CropFamily::Wheat),
    ("maize", CropFamily::Maize),
    ("corn", CropFamily::Maize),
    ("sweet corn", CropFamily::SweetCorn),
    ("sweetcorn", CropFamily::SweetCorn),
    ("potato", CropFamily::Potato),
    ("potatoes", CropFamily::Potato),
    ("tomato", CropFamily::Tomato),
    ("tomatoes", CropFamily::Tomato),
    ("onion", CropFamily::Onion),
    ("onions", CropFamily::Onion),
    ("cotton", CropFamily::Cotton),
    ("sugarcane", CropFamily::Sugarcane),
    ("sugar cane", CropFamily::Sugarcane),
];

impl CropFamily {
    /// Days from planting to expected harvest.
    pub fn maturity_days(&self) -> u32 {
        match self {
            CropFamily::Rice => 120,
            CropFamily::Wheat => 120,
            CropFamily::Maize => 100,
            CropFamily::SweetCorn => 85,
            CropFamily::Potato => 95,
            CropFamily::Tomato => 95,
            CropFamily::Onion => 125,
            CropFamily::Cotton => 160,
            CropFamily::Sugarcane => 330,
            CropFamily::Generic => 110,
        }
    }

    /// Whether the family is scheduled with milestone one-off tasks instead
    /// of a generic watering cadence.
    pub fn uses_milestones(&self) -> bool {
        matches!(self, CropFamily::Rice | CropFamily::Wheat)
    }

    /// Resolves the family for a crop, trying the name before the type.
    pub fn for_crop(crop_name: &str, crop_type: &str) -> Self {
        Self::lookup(crop_name)
            .or_else(|| Self::lookup(crop_type))
            .unwrap_or(CropFamily::Generic)
    }

    /// Looks a free-text crop description up in the alias table.
    ///
    /// An exact normalized match wins outright. Otherwise every alias that
    /// appears as a whole-word sequence is a candidate and the longest one
    /// (most words, then most characters) wins, so "sweet corn" beats
    /// "corn" and "corn" never matches inside "peppercorn".
    pub fn lookup(text: &str) -> Option<Self> {
        let normalized = normalize_crop_name(text);
        if normalized.is_empty() {
            return None;
        }
        if let Some(&(_, family)) = ALIASES.iter().find(|(alias, _)| *alias == normalized) {
            return Some(family);
        }

        let words: Vec<&str> = normalized.split(' ').collect();
        ALIASES
            .iter()
            .filter(|(alias, _)| contains_words(&words, alias))
            .max_by_key(|(alias, _)| (alias.split(' ').count(), alias.len()))
            .map(|&(_, family)| family)
    }
}

impl fmt::Display for CropFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CropFamily::Rice => "rice",
            CropFamily::Wheat => "wheat",
            CropFamily::Maize => "maize",
            CropFamily::SweetCorn => "sweet corn",
            CropFamily::Potato => "potato",
            CropFamily::Tomato => "tomato",
            CropFamily::Onion => "onion",
            CropFamily::Cotton => "cotton",
            CropFamily::Sugarcane => "sugarcane",
            CropFamily::Generic => "generic",
        };
        f.write_str(name)
    }
}

fn contains_words(words: &[&str], alias: &str) -> bool {
    let needle: Vec<&str> = alias.split(' ').collect();
    words.windows(needle.len()).any(|window| window == needle.as_slice())
}
