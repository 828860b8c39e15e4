//! Supported languages and per-locale text.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages a plan's text can be localized into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English, also the first fallback for every lookup
    #[default]
    En,
    /// Hindi
    Hi,
    /// Punjabi
    Pa,
}

impl Language {
    /// All supported languages in fallback order.
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Pa];

    /// ISO 639-1 code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Pa => "pa",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "hi" | "hindi" => Ok(Language::Hi),
            "pa" | "punjabi" => Ok(Language::Pa),
            _ => Err(format!("Unsupported language: {s}")),
        }
    }
}

/// Text with one optional slot per supported locale.
///
/// Serialized as a map keyed by language code, e.g.
/// `{"en": "Water seedlings", "hi": "..."}`. Missing keys stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pa: Option<String>,
}

impl LocalizedText {
    /// English-only text.
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            en: Some(text.into()),
            ..Default::default()
        }
    }

    /// The text stored for exactly this language, ignoring blank entries.
    pub fn get(&self, language: Language) -> Option<&str> {
        let slot = match language {
            Language::En => &self.en,
            Language::Hi => &self.hi,
            Language::Pa => &self.pa,
        };
        slot.as_deref().filter(|text| !text.trim().is_empty())
    }

    /// True when no locale carries any text.
    pub fn is_empty(&self) -> bool {
        Language::ALL.iter().all(|lang| self.get(*lang).is_none())
    }

    /// Resolves text for `language`: the requested locale, then English,
    /// then the first other locale present.
    pub fn resolve(&self, language: Language) -> Option<&str> {
        self.get(language)
            .or_else(|| self.get(Language::En))
            .or_else(|| Language::ALL.iter().find_map(|lang| self.get(*lang)))
    }

    /// Like [`resolve`](Self::resolve), falling back to the raw
    /// non-localized text.
    pub fn resolve_or(&self, language: Language, raw: &str) -> String {
        self.resolve(language).unwrap_or(raw).to_string()
    }
}
