//! Read-side helpers over expanded task instances.
//!
//! The planner composes these with [`crate::expand::expand`] to build the
//! upcoming agenda and per-day views.

use std::cmp::Ordering;

use jiff::{civil::Date, Timestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::{TaskInstance, TaskKind};

/// `20 mm`, `20-25 mm`, `1.5 L`, `10–12 litres`
static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)(?:\s*[-–]\s*(\d+(?:\.\d+)?))?\s*(mm|l|litres?|liters?)\b",
    )
    .expect("amount regex should be valid")
});

/// One plan's slice of the upcoming agenda.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingPlan {
    pub plan_id: String,
    pub title: String,
    pub crop_name: String,
    pub expected_harvest_date: Date,
    pub updated_at: Timestamp,
    pub instances: Vec<TaskInstance>,
}

impl UpcomingPlan {
    /// Due date of the plan's earliest instance, if it has any.
    pub fn next_due(&self) -> Option<Date> {
        self.instances.first().map(|instance| instance.due_date)
    }
}

/// Upcoming tasks across the caller's active plans.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agenda {
    pub from: Date,
    pub to: Date,
    /// Ranked with [`rank_upcoming`]
    pub plans: Vec<UpcomingPlan>,
}

impl Agenda {
    /// Every instance across all plans, ordered by due date then title.
    pub fn instances(&self) -> Vec<TaskInstance> {
        merge_instances(&self.plans)
    }

    pub fn is_empty(&self) -> bool {
        self.plans.iter().all(|plan| plan.instances.is_empty())
    }
}

/// Orders agendas by nearest next instance (plans with nothing due last),
/// then earliest harvest, then most recently updated, then title.
pub fn rank_upcoming(plans: &mut [UpcomingPlan]) {
    plans.sort_by(|a, b| {
        compare_next_due(a.next_due(), b.next_due())
            .then_with(|| a.expected_harvest_date.cmp(&b.expected_harvest_date))
            .then_with(|| b.updated_at.cmp(&a.updated_at))
            .then_with(|| a.title.cmp(&b.title))
    });
}

fn compare_next_due(a: Option<Date>, b: Option<Date>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Merges ranked agendas into one list ordered by due date, then title.
///
/// The sort is stable, so instances on the same day keep plan rank order
/// when titles tie.
pub fn merge_instances(plans: &[UpcomingPlan]) -> Vec<TaskInstance> {
    let mut merged: Vec<TaskInstance> = plans
        .iter()
        .flat_map(|plan| plan.instances.iter().cloned())
        .collect();
    merged.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.title.cmp(&b.title)));
    merged
}

/// Extracts a watering amount such as `20-25 mm` or `2 L` from free text.
///
/// Returns `None` when nothing recognisable is present; never fails.
pub fn amount_hint(text: &str) -> Option<String> {
    let captures = AMOUNT_PATTERN.captures(text)?;
    let low = captures.get(1)?.as_str();
    let unit = if captures.get(3)?.as_str().eq_ignore_ascii_case("mm") {
        "mm"
    } else {
        "L"
    };
    Some(match captures.get(2) {
        Some(high) => format!("{low}-{} {unit}", high.as_str()),
        None => format!("{low} {unit}"),
    })
}

/// Fills in `amount_hint` on watering instances from their notes.
pub fn attach_amount_hints(instances: &mut [TaskInstance]) {
    for instance in instances
        .iter_mut()
        .filter(|instance| instance.kind == TaskKind::Watering)
    {
        instance.amount_hint = instance.notes.as_deref().and_then(amount_hint);
    }
}
