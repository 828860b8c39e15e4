//! Concrete dated occurrences derived from plan rules.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{ClockTime, TaskKind, TimeOfDay};

/// One dated occurrence of a rule. Derived on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    pub plan_id: String,
    pub crop_name: String,
    /// Plan title resolved in the requested language
    pub plan_title: String,
    pub kind: TaskKind,
    /// Task title resolved in the requested language
    pub title: String,
    pub due_date: Date,
    pub time_of_day: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Watering amount extracted from the notes, e.g. "20-25 mm"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_hint: Option<String>,
}
