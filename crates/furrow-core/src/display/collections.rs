//! Collection wrapper types for displaying groups of domain objects.
//!
//! These wrappers format collections with consistent structure and empty
//! collection handling. They never print a top-level title; the caller
//! decides on headings.

use std::{fmt, ops::Index};

use jiff::{civil::Date, tz::TimeZone};

use super::datetime::LocalDateTime;
use crate::{
    models::{PlanSummary, TaskInstance},
    notify::ScheduledNotification,
    query::Agenda,
};

/// Newtype wrapper for displaying collections of plan summaries.
///
/// # Examples
///
/// ```rust
/// use furrow_core::{
///     display::PlanSummaries,
///     models::{PlanStatus, PlanSummary},
/// };
/// use jiff::{civil::date, Timestamp};
///
/// let plan = PlanSummary {
///     id: "plan_0123456789abcdef".to_string(),
///     title: "Rice care plan".to_string(),
///     crop_name: "Rice".to_string(),
///     area_acres: 2.5,
///     status: PlanStatus::Active,
///     source: None,
///     planting_date: date(2024, 6, 1),
///     expected_harvest_date: date(2024, 9, 29),
///     updated_at: Timestamp::UNIX_EPOCH,
///     rule_count: 0,
/// };
///
/// let summaries = PlanSummaries(vec![plan]);
/// let output = format!("{}", summaries);
/// assert!(output.contains("## Rice care plan (ID: plan_0123456789abcdef)"));
/// ```
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl PlanSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of plan summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the plan summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, PlanSummary> {
        self.0.iter()
    }
}

impl Index<usize> for PlanSummaries {
    type Output = PlanSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a PlanSummaries {
    type Item = &'a PlanSummary;
    type IntoIter = std::slice::Iter<'a, PlanSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No plans found.")
        } else {
            for plan in &self.0 {
                write!(f, "{plan}")?;
            }
            Ok(())
        }
    }
}

/// Task instances grouped under one heading per due date.
///
/// Expects instances already in expansion order (date, then title).
pub struct TaskList(pub Vec<TaskInstance>);

impl TaskList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn fmt_by_day(f: &mut fmt::Formatter<'_>, instances: &[TaskInstance], level: &str) -> fmt::Result {
    let mut current: Option<Date> = None;
    for instance in instances {
        if current != Some(instance.due_date) {
            if current.is_some() {
                writeln!(f)?;
            }
            writeln!(f, "{level} {}", instance.due_date.strftime("%a %Y-%m-%d"))?;
            writeln!(f)?;
            current = Some(instance.due_date);
        }
        write!(f, "{instance}")?;
    }
    Ok(())
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No tasks found.")
        } else {
            fmt_by_day(f, &self.0, "##")
        }
    }
}

impl fmt::Display for Agenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No tasks due between {} and {}.", self.from, self.to);
        }

        for plan in self.plans.iter().filter(|plan| !plan.instances.is_empty()) {
            writeln!(f, "## {} (ID: {})", plan.title, plan.plan_id)?;
            writeln!(f)?;
            fmt_by_day(f, &plan.instances, "###")?;
            writeln!(f)?;
        }

        let idle: Vec<&str> = self
            .plans
            .iter()
            .filter(|plan| plan.instances.is_empty())
            .map(|plan| plan.title.as_str())
            .collect();
        if !idle.is_empty() {
            writeln!(f, "Nothing due for: {}", idle.join(", "))?;
        }
        Ok(())
    }
}

/// Scheduled reminders with triggers shown in the planner's time zone.
pub struct Notifications {
    pub items: Vec<ScheduledNotification>,
    pub time_zone: TimeZone,
}

impl fmt::Display for Notifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return writeln!(f, "No reminders to schedule.");
        }
        for item in &self.items {
            writeln!(
                f,
                "- `{}` {} {} **{}**: {}",
                item.id,
                LocalDateTime::new(&item.trigger, self.time_zone.clone()),
                item.payload.kind.icon(),
                item.payload.title,
                item.payload.body
            )?;
        }
        Ok(())
    }
}
