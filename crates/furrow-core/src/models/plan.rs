//! Plan model definition and related functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{CadenceRule, Language, LocalizedText, OneOffTask, PlanSource, PlanStatus};

/// Represents a persisted crop-care plan with its rule collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Deterministic identifier, see [`Plan::derive_id`]
    pub id: String,

    /// Owner of the plan
    pub user_id: String,

    /// Free-text crop category as entered (e.g. "cereal")
    pub crop_type: String,

    /// Crop name as entered (e.g. "Basmati rice")
    pub crop_name: String,

    /// Cultivated area, always positive
    pub area_acres: f64,

    pub planting_date: Date,

    /// Always strictly after the planting date
    pub expected_harvest_date: Date,

    /// Day after harvest; the plan is swept once this date has passed
    pub cleanup_after_date: Date,

    #[serde(default)]
    pub status: PlanStatus,

    /// Generator of the current rule content, `None` until content exists
    pub source: Option<PlanSource>,

    /// Whether the oracle has ever been invoked for this plan
    #[serde(default)]
    pub generation_attempted: bool,

    /// Failure text of the last oracle attempt
    pub generation_error: Option<String>,

    #[serde(default)]
    pub title: LocalizedText,

    #[serde(default)]
    pub overview: LocalizedText,

    #[serde(default)]
    pub watering_rules: Vec<CadenceRule>,

    #[serde(default)]
    pub recurring_tasks: Vec<CadenceRule>,

    #[serde(default)]
    pub one_off_tasks: Vec<OneOffTask>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,
}

/// Rule content produced by a generator, applied to a plan in one write.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanContent {
    pub title: LocalizedText,
    pub overview: LocalizedText,
    pub expected_harvest_date: Date,
    pub watering_rules: Vec<CadenceRule>,
    pub recurring_tasks: Vec<CadenceRule>,
    pub one_off_tasks: Vec<OneOffTask>,
}

impl PlanContent {
    /// Total number of rules across all collections.
    pub fn rule_count(&self) -> usize {
        self.watering_rules.len() + self.recurring_tasks.len() + self.one_off_tasks.len()
    }
}

impl Plan {
    /// Computes the deterministic plan id for a crop, planting date and
    /// area.
    ///
    /// The crop name is normalized with [`normalize_crop_name`] and the area
    /// is rounded to two decimals, so cosmetic input differences map to the
    /// same plan.
    pub fn derive_id(crop_name: &str, planting_date: Date, area_acres: f64) -> String {
        let key = format!(
            "{}|{}|{:.2}",
            normalize_crop_name(crop_name),
            planting_date,
            area_acres
        );
        let digest = Sha256::digest(key.as_bytes());
        format!("plan_{}", &hex::encode(digest)[..16])
    }

    /// Whether a generator has already populated this plan.
    pub fn has_rule_content(&self) -> bool {
        self.source.is_some() && self.rule_count() > 0
    }

    /// Total number of rules across all collections.
    pub fn rule_count(&self) -> usize {
        self.watering_rules.len() + self.recurring_tasks.len() + self.one_off_tasks.len()
    }

    /// Plan title in `language`, falling back to "<crop> care plan".
    pub fn display_title(&self, language: Language) -> String {
        self.title
            .resolve(language)
            .map(String::from)
            .unwrap_or_else(|| default_title(&self.crop_name))
    }

    /// Replaces generated fields with `content`.
    pub fn apply_content(&mut self, content: PlanContent, source: PlanSource) {
        self.title = content.title;
        self.overview = content.overview;
        self.expected_harvest_date = content.expected_harvest_date;
        self.cleanup_after_date = crate::calendar::add_days(content.expected_harvest_date, 1);
        self.watering_rules = content.watering_rules;
        self.recurring_tasks = content.recurring_tasks;
        self.one_off_tasks = content.one_off_tasks;
        self.source = Some(source);
    }
}

/// Fallback plan title for a crop.
pub fn default_title(crop_name: &str) -> String {
    format!("{} care plan", crop_name.trim())
}

/// Lowercases a crop name and collapses punctuation and whitespace runs
/// into single spaces.
pub fn normalize_crop_name(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
