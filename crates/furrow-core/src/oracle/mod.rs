//! Seam for the external plan-generation oracle.
//!
//! The planner asks an oracle for plan content at most once per plan. Any
//! failure, including a well-formed response that fails validation, is
//! absorbed by the planner and the heuristic builder runs instead.

use std::time::Duration;

use async_trait::async_trait;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    heuristic::clamp_harvest,
    models::{
        dedup_one_off_tasks, CadenceRule, LocalizedText, OneOffTask, PlanContent, TaskKind,
    },
};

pub mod command;

pub use command::CommandOracle;

/// Failures reported by a [`GenerationOracle`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// The oracle could not be reached or started
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    /// No response within the configured time budget
    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),
    /// The response could not be parsed or failed validation
    #[error("malformed oracle response: {0}")]
    Malformed(String),
    /// The oracle answered with an explicit failure
    #[error("oracle failed: {0}")]
    Failed(String),
}

/// Request sent to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRequest {
    pub crop_type: String,
    pub crop_name: String,
    pub area_acres: f64,
    pub planting_date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_harvest_date: Option<Date>,
    pub country: String,
}

/// Dates block of an oracle response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleDates {
    #[serde(default)]
    pub planting_date: Option<Date>,
    #[serde(default)]
    pub expected_harvest_date: Option<Date>,
}

/// Plan content as produced by the oracle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleResponse {
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub overview: LocalizedText,
    #[serde(default)]
    pub dates: Option<OracleDates>,
    #[serde(default)]
    pub watering_rules: Vec<CadenceRule>,
    #[serde(default)]
    pub recurring_tasks: Vec<CadenceRule>,
    #[serde(default)]
    pub one_off_tasks: Vec<OneOffTask>,
}

impl OracleResponse {
    /// Validates the response and converts it into plan content.
    ///
    /// The harvest date comes from the caller's override when present, then
    /// from the response, then from `default_harvest`; it is always forced
    /// strictly after planting. Watering rules are re-tagged as watering and
    /// missing rule ids are filled in positionally.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::Malformed` when the response has no rules at
    /// all or any rule is malformed.
    pub fn into_content(
        self,
        planting_date: Date,
        harvest_override: Option<Date>,
        default_harvest: Date,
    ) -> Result<PlanContent, OracleError> {
        let mut watering_rules = self.watering_rules;
        let mut recurring_tasks = self.recurring_tasks;
        let mut one_off_tasks = self.one_off_tasks;

        if watering_rules.is_empty() && recurring_tasks.is_empty() && one_off_tasks.is_empty() {
            return Err(OracleError::Malformed("response contains no rules".into()));
        }

        for (index, rule) in watering_rules.iter_mut().enumerate() {
            rule.kind = TaskKind::Watering;
            fill_id(&mut rule.id, "watering", index);
        }
        for (index, rule) in recurring_tasks.iter_mut().enumerate() {
            fill_id(&mut rule.id, "recurring", index);
        }
        for (index, task) in one_off_tasks.iter_mut().enumerate() {
            fill_id(&mut task.id, "task", index);
        }

        for rule in watering_rules.iter().chain(&recurring_tasks) {
            rule.validate().map_err(OracleError::Malformed)?;
        }
        for task in &one_off_tasks {
            task.validate().map_err(OracleError::Malformed)?;
        }
        dedup_one_off_tasks(&mut one_off_tasks);

        let harvest = harvest_override
            .or_else(|| self.dates.and_then(|d| d.expected_harvest_date))
            .unwrap_or(default_harvest);

        Ok(PlanContent {
            title: self.title,
            overview: self.overview,
            expected_harvest_date: clamp_harvest(planting_date, harvest),
            watering_rules,
            recurring_tasks,
            one_off_tasks,
        })
    }
}

fn fill_id(id: &mut String, prefix: &str, index: usize) {
    if id.trim().is_empty() {
        *id = format!("{prefix}-{index}");
    }
}

/// Source of generated plan content.
#[async_trait]
pub trait GenerationOracle: Send + Sync {
    /// Generates plan content for one planting.
    async fn generate(&self, request: &OracleRequest) -> Result<OracleResponse, OracleError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::json;

    use super::*;
    use crate::models::EveryDays;

    fn response(value: serde_json::Value) -> OracleResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_response_parses_localized_rules() {
        let parsed = response(json!({
            "title": {"en": "Tomato plan", "hi": "टमाटर योजना"},
            "dates": {"plantingDate": "2024-02-01", "expectedHarvestDate": "2024-05-01"},
            "wateringRules": [{
                "id": "",
                "kind": "fertilizer",
                "title": "Water",
                "startDay": 0,
                "endDay": 30,
                "everyDays": 2,
                "timeOfDay": "morning",
                "notes": "Apply 10 mm"
            }],
            "recurringTasks": [{
                "id": "spray",
                "kind": "mystery",
                "title": "Spray",
                "startDay": 10,
                "endDay": 40,
                "everyDays": "stop",
                "timeOfDay": "evening",
                "time": "17:45"
            }]
        }));

        let content = parsed
            .into_content(date(2024, 2, 1), None, date(2024, 6, 1))
            .unwrap();
        assert_eq!(content.expected_harvest_date, date(2024, 5, 1));
        assert_eq!(content.watering_rules[0].kind, TaskKind::Watering);
        assert_eq!(content.watering_rules[0].id, "watering-0");
        assert_eq!(content.recurring_tasks[0].kind, TaskKind::Other);
        assert_eq!(content.recurring_tasks[0].every_days, EveryDays::Stop);
        assert_eq!(content.title.get(crate::models::Language::Hi), Some("टमाटर योजना"));
    }

    #[test]
    fn test_empty_response_is_malformed() {
        let err = OracleResponse::default()
            .into_content(date(2024, 2, 1), None, date(2024, 6, 1))
            .unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
    }

    #[test]
    fn test_inverted_rule_is_malformed() {
        let parsed = response(json!({
            "recurringTasks": [{
                "id": "x", "kind": "field", "title": "Walk",
                "startDay": 20, "endDay": 10, "everyDays": 3, "timeOfDay": "morning"
            }]
        }));
        let err = parsed
            .into_content(date(2024, 2, 1), None, date(2024, 6, 1))
            .unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
    }

    #[test]
    fn test_zero_cadence_fails_to_parse() {
        let parsed = serde_json::from_value::<OracleResponse>(json!({
            "recurringTasks": [{
                "id": "x", "kind": "field", "title": "Walk",
                "startDay": 0, "endDay": 10, "everyDays": 0, "timeOfDay": "morning"
            }]
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_harvest_override_wins_and_is_clamped() {
        let parsed = response(json!({
            "dates": {"expectedHarvestDate": "2024-05-01"},
            "oneOffTasks": [{
                "id": "h", "kind": "harvest", "title": "Harvest",
                "dueDate": "2024-04-30", "timeOfDay": "morning"
            }]
        }));
        let content = parsed
            .clone()
            .into_content(date(2024, 2, 1), Some(date(2024, 4, 20)), date(2024, 6, 1))
            .unwrap();
        assert_eq!(content.expected_harvest_date, date(2024, 4, 20));

        let content = parsed
            .into_content(date(2024, 2, 1), Some(date(2024, 1, 1)), date(2024, 6, 1))
            .unwrap();
        assert_eq!(content.expected_harvest_date, date(2024, 2, 2));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = OracleRequest {
            crop_type: "cereal".into(),
            crop_name: "rice".into(),
            area_acres: 1.5,
            planting_date: date(2024, 6, 1),
            expected_harvest_date: None,
            country: "IN".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["plantingDate"], "2024-06-01");
        assert_eq!(value["areaAcres"], 1.5);
        assert!(value.get("expectedHarvestDate").is_none());
    }
}
