//! Result wrapper types for displaying operation outcomes.
//!
//! Each wrapper pairs the affected plan with the language its text should be
//! resolved in.

use std::fmt;

use super::models::PlanDetails;
use crate::models::{Language, Plan};

/// Outcome of creating (or re-requesting) a plan.
///
/// # Examples
///
/// ```rust
/// use furrow_core::{
///     display::CreateResult,
///     models::{Language, LocalizedText, Plan, PlanStatus},
/// };
/// use jiff::{civil::date, Timestamp};
///
/// let plan = Plan {
///     id: "plan_0123456789abcdef".to_string(),
///     user_id: "farmer-1".to_string(),
///     crop_type: String::new(),
///     crop_name: "Okra".to_string(),
///     area_acres: 1.0,
///     planting_date: date(2024, 2, 1),
///     expected_harvest_date: date(2024, 5, 21),
///     cleanup_after_date: date(2024, 5, 22),
///     status: PlanStatus::Active,
///     source: None,
///     generation_attempted: false,
///     generation_error: None,
///     title: LocalizedText::default(),
///     overview: LocalizedText::default(),
///     watering_rules: vec![],
///     recurring_tasks: vec![],
///     one_off_tasks: vec![],
///     created_at: Timestamp::UNIX_EPOCH,
///     updated_at: Timestamp::UNIX_EPOCH,
/// };
///
/// let output = CreateResult::new(plan, Language::En).to_string();
/// assert!(output.starts_with("Plan ready with ID: plan_0123456789abcdef"));
/// assert!(output.contains("# Okra care plan"));
/// ```
pub struct CreateResult {
    pub plan: Plan,
    pub language: Language,
}

impl CreateResult {
    pub fn new(plan: Plan, language: Language) -> Self {
        Self { plan, language }
    }
}

impl fmt::Display for CreateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plan ready with ID: {}", self.plan.id)?;
        writeln!(f)?;
        write!(f, "{}", PlanDetails::new(&self.plan, self.language))
    }
}

/// Outcome of a plan status change.
pub struct UpdateResult {
    pub plan: Plan,
    pub language: Language,
    pub changes: Vec<String>,
}

impl UpdateResult {
    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(plan: Plan, language: Language, changes: Vec<String>) -> Self {
        Self {
            plan,
            language,
            changes,
        }
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated plan with ID: {}", self.plan.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", PlanDetails::new(&self.plan, self.language))
    }
}

/// Outcome of a permanent delete.
pub struct DeleteResult {
    pub plan: Plan,
    pub language: Language,
}

impl DeleteResult {
    pub fn new(plan: Plan, language: Language) -> Self {
        Self { plan, language }
    }
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted plan '{}' (ID: {})",
            self.plan.display_title(self.language),
            self.plan.id
        )
    }
}
