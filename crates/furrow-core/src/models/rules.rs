//! Schedule rules stored on a plan.
//!
//! A plan carries two rule shapes: cadence rules defined by
//! `(start_day, end_day, every_days)` relative to the planting date, and
//! one-off tasks bound to an explicit calendar date. Watering rules and
//! recurring task rules share the [`CadenceRule`] shape and differ only in
//! their [`TaskKind`].

use std::{fmt, str::FromStr};

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

use super::LocalizedText;

/// Category of work a rule or task instance represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Irrigation
    Watering,
    /// Fertilizer application
    Fertilizer,
    /// Pest monitoring and control
    Pest,
    /// Disease-risk checks
    Disease,
    /// General field work (scouting, drainage)
    Field,
    /// Harvest
    Harvest,
    /// Any tag this version does not recognise
    #[default]
    #[serde(other)]
    Other,
}

impl TaskKind {
    /// Lowercase tag used in storage and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Watering => "watering",
            TaskKind::Fertilizer => "fertilizer",
            TaskKind::Pest => "pest",
            TaskKind::Disease => "disease",
            TaskKind::Field => "field",
            TaskKind::Harvest => "harvest",
            TaskKind::Other => "other",
        }
    }
}

/// Coarse time-of-day bucket for a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Lowercase tag used in storage and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }

    /// Clock time used when a task has no explicit `HH:mm`.
    pub fn default_time(&self) -> Time {
        match self {
            TimeOfDay::Morning => Time::constant(7, 0, 0, 0),
            TimeOfDay::Afternoon => Time::constant(13, 0, 0, 0),
            TimeOfDay::Evening => Time::constant(18, 0, 0, 0),
            TimeOfDay::Night => Time::constant(20, 30, 0, 0),
        }
    }
}

/// A 24-hour `HH:mm` clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(Time);

impl ClockTime {
    /// Builds a clock time from hour and minute.
    pub fn new(hour: i8, minute: i8) -> Result<Self, String> {
        Time::new(hour, minute, 0, 0)
            .map(Self)
            .map_err(|e| format!("Invalid clock time {hour:02}:{minute:02}: {e}"))
    }

    /// The underlying civil time.
    pub fn time(&self) -> Time {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid clock time '{s}', expected HH:mm");
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if minute.len() != 2 || hour.is_empty() || hour.len() > 2 {
            return Err(invalid());
        }
        let hour: i8 = hour.parse().map_err(|_| invalid())?;
        let minute: i8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Cadence of a rule: every `n` days, or the stop sentinel.
///
/// `Stop` marks a rule that documents a policy ("irrigation ends here") and
/// never produces occurrences. It is serialized as the string `"stop"`;
/// positive cadences serialize as plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EveryDaysRepr", into = "EveryDaysRepr")]
pub enum EveryDays {
    Days(u32),
    Stop,
}

impl EveryDays {
    /// The step in days, or `None` for the stop sentinel.
    pub fn step(&self) -> Option<u32> {
        match self {
            EveryDays::Days(n) => Some(*n),
            EveryDays::Stop => None,
        }
    }
}

impl fmt::Display for EveryDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EveryDays::Days(1) => write!(f, "daily"),
            EveryDays::Days(n) => write!(f, "every {n} days"),
            EveryDays::Stop => write!(f, "stop"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum EveryDaysRepr {
    Number(i64),
    Text(String),
}

impl TryFrom<EveryDaysRepr> for EveryDays {
    type Error = String;

    fn try_from(value: EveryDaysRepr) -> Result<Self, Self::Error> {
        match value {
            EveryDaysRepr::Number(n) if n >= 1 => u32::try_from(n)
                .map(EveryDays::Days)
                .map_err(|_| format!("everyDays {n} is too large")),
            EveryDaysRepr::Number(n) => Err(format!("everyDays must be at least 1, got {n}")),
            EveryDaysRepr::Text(s) if s.trim().eq_ignore_ascii_case("stop") => Ok(EveryDays::Stop),
            EveryDaysRepr::Text(s) => Err(format!(
                "everyDays must be a number or \"stop\", got {s:?}"
            )),
        }
    }
}

impl From<EveryDays> for EveryDaysRepr {
    fn from(value: EveryDays) -> Self {
        match value {
            EveryDays::Days(n) => EveryDaysRepr::Number(i64::from(n)),
            EveryDays::Stop => EveryDaysRepr::Text("stop".to_string()),
        }
    }
}

/// A rule that repeats on a fixed cadence between two day offsets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CadenceRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub kind: TaskKind,
    /// Raw, non-localized title
    #[serde(default)]
    pub title: String,
    /// First day (inclusive) counted from planting
    pub start_day: u32,
    /// Last day (inclusive) counted from planting
    pub end_day: u32,
    pub every_days: EveryDays,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "LocalizedText::is_empty")]
    pub title_i18n: LocalizedText,
    /// Raw, non-localized notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "LocalizedText::is_empty")]
    pub notes_i18n: LocalizedText,
}

impl CadenceRule {
    /// Checks the structural invariants of the rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_day > self.end_day {
            return Err(format!(
                "rule '{}' starts on day {} after it ends on day {}",
                self.id, self.start_day, self.end_day
            ));
        }
        if self.end_day > crate::calendar::MAX_DAY_OFFSET {
            return Err(format!(
                "rule '{}' ends on day {}, beyond the supported horizon",
                self.id, self.end_day
            ));
        }
        if self.title.trim().is_empty() && self.title_i18n.is_empty() {
            return Err(format!("rule '{}' has no title", self.id));
        }
        Ok(())
    }
}

/// A task due on one explicit calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OneOffTask {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub kind: TaskKind,
    /// Raw, non-localized title
    #[serde(default)]
    pub title: String,
    pub due_date: Date,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "LocalizedText::is_empty")]
    pub title_i18n: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "LocalizedText::is_empty")]
    pub notes_i18n: LocalizedText,
}

impl OneOffTask {
    /// Checks the structural invariants of the task.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() && self.title_i18n.is_empty() {
            return Err(format!("one-off task '{}' has no title", self.id));
        }
        Ok(())
    }
}

/// Removes one-off tasks that repeat an earlier `(kind, title, due date)`.
pub fn dedup_one_off_tasks(tasks: &mut Vec<OneOffTask>) {
    let mut seen = std::collections::HashSet::new();
    tasks.retain(|task| seen.insert((task.kind, task.title.clone(), task.due_date)));
}
