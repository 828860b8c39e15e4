//! Status and provenance enumerations for plans.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Plan is in season and shows up in upcoming views
    #[default]
    Active,

    /// Plan has been closed by the grower
    Completed,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(PlanStatus::Active),
            "completed" => Ok(PlanStatus::Completed),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Active => "active",
            PlanStatus::Completed => "completed",
        }
    }
}

/// Which generator produced a plan's rule content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    /// Content came from the external generation oracle
    Oracle,

    /// Content came from the deterministic rule tables
    Heuristic,
}

impl FromStr for PlanSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "oracle" => Ok(PlanSource::Oracle),
            "heuristic" => Ok(PlanSource::Heuristic),
            _ => Err(format!("Invalid plan source: {s}")),
        }
    }
}

impl PlanSource {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanSource::Oracle => "oracle",
            PlanSource::Heuristic => "heuristic",
        }
    }
}
