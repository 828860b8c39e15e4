//! Tests for the planner module.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use jiff::civil::date;
use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::{
    models::{PlanFilter, PlanSource, PlanStatus, TaskKind},
    notify::{NotificationSink, ScheduledNotification, SinkError, MAX_SCHEDULED},
    oracle::{OracleError, OracleRequest, OracleResponse},
    params::{
        DeletePlan, ExpandTasks, ListPlans, PlanRef, ProjectNotifications, TasksOnDate, Upcoming,
        UpsertPlan,
    },
};

const NOW: &str = "2024-02-03T00:00:00Z";

/// Oracle double that counts calls and answers with a canned outcome.
struct StubOracle {
    calls: AtomicUsize,
    outcome: std::result::Result<serde_json::Value, OracleError>,
    delay: Duration,
}

impl StubOracle {
    fn answering(value: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Ok(value),
            delay: Duration::ZERO,
        })
    }

    fn failing(error: OracleError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Err(error),
            delay: Duration::ZERO,
        })
    }

    fn slow(value: serde_json::Value, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Ok(value),
            delay,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationOracle for StubOracle {
    async fn generate(
        &self,
        _request: &OracleRequest,
    ) -> std::result::Result<OracleResponse, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let value = self.outcome.clone()?;
        serde_json::from_value(value).map_err(|e| OracleError::Malformed(e.to_string()))
    }
}

/// Sink double recording every call in order.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
    fail_schedule: bool,
}

impl RecordingSink {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn schedule(
        &self,
        notification: &ScheduledNotification,
    ) -> std::result::Result<(), SinkError> {
        if self.fail_schedule {
            return Err(SinkError("permission denied".into()));
        }
        self.events
            .lock()
            .unwrap()
            .push(format!("schedule:{}", notification.id));
        Ok(())
    }

    async fn cancel_by_id(&self, id: &str) -> std::result::Result<(), SinkError> {
        self.events.lock().unwrap().push(format!("cancel:{id}"));
        Ok(())
    }
}

fn oracle_plan() -> serde_json::Value {
    json!({
        "title": {"en": "Okra drip plan", "hi": "भिंडी ड्रिप योजना"},
        "overview": {"en": "Drip irrigation schedule."},
        "dates": {"plantingDate": "2024-02-01", "expectedHarvestDate": "2024-05-01"},
        "wateringRules": [{
            "id": "drip",
            "title": "Drip irrigation",
            "startDay": 0,
            "endDay": 60,
            "everyDays": 2,
            "timeOfDay": "evening",
            "notes": "Run drip for 2 L per plant"
        }]
    })
}

fn builder(temp_dir: &TempDir) -> PlannerBuilder {
    PlannerBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_user(Some("farmer-1"))
        .with_time_zone(TimeZone::UTC)
        .with_fixed_now(NOW.parse().unwrap())
}

/// Helper function to create a test planner without an oracle
async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planner = builder(&temp_dir)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

async fn create_planner_with_oracle(oracle: Arc<StubOracle>) -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planner = builder(&temp_dir)
        .with_oracle(oracle)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

fn okra() -> UpsertPlan {
    UpsertPlan {
        crop_type: "vegetable".to_string(),
        crop_name: "Okra".to_string(),
        area_acres: 1.0,
        planting_date: "2024-02-01".to_string(),
        expected_harvest_date: None,
    }
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let (_temp_dir, planner) = create_test_planner().await;

    let first = planner.upsert_plan(&okra()).await.unwrap();
    let plan = planner.require_plan(&first).await.unwrap();

    let again = planner
        .upsert_plan(&UpsertPlan {
            crop_name: "  okra ".to_string(),
            area_acres: 1.001,
            ..okra()
        })
        .await
        .unwrap();
    assert_eq!(first, again);

    let reloaded = planner.require_plan(&again).await.unwrap();
    assert_eq!(reloaded, plan);
    assert_eq!(reloaded.source, Some(PlanSource::Heuristic));
    assert_eq!(reloaded.expected_harvest_date, date(2024, 5, 21));
    assert_eq!(reloaded.cleanup_after_date, date(2024, 5, 22));
    assert!(!reloaded.generation_attempted);

    let plans = planner.list_plans(PlanFilter::default()).await.unwrap();
    assert_eq!(plans.len(), 1);
}

#[tokio::test]
async fn test_oracle_content_is_used_and_consulted_once() {
    let oracle = StubOracle::answering(oracle_plan());
    let (_temp_dir, planner) = create_planner_with_oracle(oracle.clone()).await;

    let id = planner.upsert_plan(&okra()).await.unwrap();
    planner.upsert_plan(&okra()).await.unwrap();
    assert_eq!(oracle.calls(), 1);

    let plan = planner.require_plan(&id).await.unwrap();
    assert_eq!(plan.source, Some(PlanSource::Oracle));
    assert!(plan.generation_attempted);
    assert_eq!(plan.generation_error, None);
    assert_eq!(plan.expected_harvest_date, date(2024, 5, 1));
    assert_eq!(plan.watering_rules.len(), 1);
    assert_eq!(plan.watering_rules[0].kind, TaskKind::Watering);
}

#[tokio::test]
async fn test_oracle_failure_falls_back_to_heuristic() {
    let oracle = StubOracle::failing(OracleError::Failed("quota exceeded".into()));
    let (_temp_dir, planner) = create_planner_with_oracle(oracle.clone()).await;

    let id = planner.upsert_plan(&okra()).await.unwrap();
    let plan = planner.require_plan(&id).await.unwrap();
    assert_eq!(plan.source, Some(PlanSource::Heuristic));
    assert!(plan.generation_attempted);
    assert_eq!(
        plan.generation_error.as_deref(),
        Some("oracle failed: quota exceeded")
    );
    assert!(plan.has_rule_content());

    // The failed attempt is not retried.
    planner.upsert_plan(&okra()).await.unwrap();
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn test_invalid_oracle_response_falls_back() {
    let oracle = StubOracle::answering(json!({
        "wateringRules": [{
            "title": "Backwards",
            "startDay": 30,
            "endDay": 10,
            "everyDays": 2
        }]
    }));
    let (_temp_dir, planner) = create_planner_with_oracle(oracle).await;

    let id = planner.upsert_plan(&okra()).await.unwrap();
    let plan = planner.require_plan(&id).await.unwrap();
    assert_eq!(plan.source, Some(PlanSource::Heuristic));
    assert!(plan
        .generation_error
        .as_deref()
        .is_some_and(|e| e.starts_with("malformed oracle response")));
}

#[tokio::test]
async fn test_concurrent_upserts_consult_oracle_once() {
    let oracle = StubOracle::slow(oracle_plan(), Duration::from_millis(200));
    let (_temp_dir, planner) = create_planner_with_oracle(oracle.clone()).await;

    let params = okra();
    let (a, b) = tokio::join!(planner.upsert_plan(&params), planner.upsert_plan(&params));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(oracle.calls(), 1);

    let plan = planner.require_plan(&a).await.unwrap();
    assert_eq!(plan.source, Some(PlanSource::Oracle));
}

#[tokio::test]
async fn test_upsert_rejects_invalid_input_without_writing() {
    let (_temp_dir, planner) = create_test_planner().await;

    let result = planner
        .upsert_plan(&UpsertPlan {
            area_acres: 0.0,
            ..okra()
        })
        .await;
    assert!(matches!(
        result,
        Err(PlannerError::InvalidInput { ref field, .. }) if field == "area_acres"
    ));

    let result = planner
        .upsert_plan(&UpsertPlan {
            planting_date: "2024-02-30".to_string(),
            ..okra()
        })
        .await;
    assert!(matches!(
        result,
        Err(PlannerError::InvalidInput { ref field, .. }) if field == "planting_date"
    ));

    let result = planner
        .upsert_plan(&UpsertPlan {
            crop_name: "   ".to_string(),
            ..okra()
        })
        .await;
    assert!(matches!(result, Err(PlannerError::InvalidInput { .. })));

    let plans = planner.list_plans(PlanFilter::default()).await.unwrap();
    assert!(plans.is_empty());
}

#[tokio::test]
async fn test_harvest_override_is_clamped_after_planting() {
    let (_temp_dir, planner) = create_test_planner().await;

    let id = planner
        .upsert_plan(&UpsertPlan {
            expected_harvest_date: Some("2024-01-15".to_string()),
            ..okra()
        })
        .await
        .unwrap();
    let plan = planner.require_plan(&id).await.unwrap();
    assert_eq!(plan.expected_harvest_date, date(2024, 2, 2));
    // A one-day season has no room for the weekly scouting walk.
    assert!(plan.recurring_tasks.is_empty());
    for rule in plan.watering_rules.iter().chain(&plan.recurring_tasks) {
        assert!(rule.validate().is_ok(), "{rule:?}");
    }
}

#[tokio::test]
async fn test_operations_require_user() {
    let temp_dir = TempDir::new().unwrap();
    let planner = builder(&temp_dir)
        .with_user(None::<&str>)
        .build()
        .await
        .unwrap();

    assert!(matches!(
        planner.upsert_plan(&okra()).await,
        Err(PlannerError::Unauthenticated { .. })
    ));
    assert!(matches!(
        planner.upcoming(&Upcoming::default()).await,
        Err(PlannerError::Unauthenticated { .. })
    ));
    // Sweeping is not user-scoped.
    assert_eq!(planner.sweep().await.unwrap(), 0);
}

#[tokio::test]
async fn test_plans_are_scoped_to_user() {
    let temp_dir = TempDir::new().unwrap();
    let owner = builder(&temp_dir).build().await.unwrap();
    let other = builder(&temp_dir)
        .with_user(Some("farmer-2"))
        .build()
        .await
        .unwrap();

    let id = owner.upsert_plan(&okra()).await.unwrap();
    assert!(other.get_plan(&PlanRef { id: id.clone() }).await.unwrap().is_none());
    assert!(matches!(
        other
            .tasks_on_date(&TasksOnDate {
                plan_id: id,
                date: "2024-02-01".to_string(),
            })
            .await,
        Err(PlannerError::PlanNotFound { .. })
    ));
}

#[tokio::test]
async fn test_sweep_removes_expired_plans_once() {
    let (_temp_dir, planner) = create_test_planner().await;

    planner
        .upsert_plan(&UpsertPlan {
            planting_date: "2023-01-01".to_string(),
            expected_harvest_date: Some("2023-04-01".to_string()),
            ..okra()
        })
        .await
        .unwrap();
    let current = planner.upsert_plan(&okra()).await.unwrap();

    assert_eq!(planner.sweep().await.unwrap(), 1);
    assert_eq!(planner.sweep().await.unwrap(), 0);

    let plans = planner.list_plans(PlanFilter::default()).await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].id, current);
}

#[tokio::test]
async fn test_sweep_keeps_plan_on_its_cleanup_date() {
    let (_temp_dir, planner) = create_test_planner().await;

    // Harvest 2024-02-02, cleanup 2024-02-03, which is today.
    planner
        .upsert_plan(&UpsertPlan {
            expected_harvest_date: Some("2024-02-02".to_string()),
            ..okra()
        })
        .await
        .unwrap();
    assert_eq!(planner.sweep().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upcoming_ranks_plans_by_next_task() {
    let (_temp_dir, planner) = create_test_planner().await;

    let rice = planner
        .upsert_plan(&UpsertPlan {
            crop_type: "cereal".to_string(),
            crop_name: "Rice".to_string(),
            area_acres: 2.5,
            planting_date: "2024-06-01".to_string(),
            expected_harvest_date: None,
        })
        .await
        .unwrap();
    let okra_id = planner.upsert_plan(&okra()).await.unwrap();
    let tomato = planner
        .upsert_plan(&UpsertPlan {
            crop_name: "Tomato".to_string(),
            planting_date: "2024-01-20".to_string(),
            ..okra()
        })
        .await
        .unwrap();
    planner
        .complete_plan(&PlanRef { id: tomato.clone() })
        .await
        .unwrap();

    let agenda = planner.upcoming(&Upcoming::default()).await.unwrap();
    assert_eq!(agenda.from, date(2024, 2, 3));
    assert_eq!(agenda.to, date(2024, 2, 10));

    let ids: Vec<&str> = agenda.plans.iter().map(|p| p.plan_id.as_str()).collect();
    assert_eq!(ids, [okra_id.as_str(), rice.as_str()]);
    assert!(agenda.plans[1].instances.is_empty());

    // Daily seedling watering plus the first scouting walk on day 7.
    let okra_tasks = &agenda.plans[0].instances;
    assert_eq!(okra_tasks.len(), 9);
    assert_eq!(okra_tasks[0].due_date, date(2024, 2, 3));
    assert_eq!(okra_tasks[0].amount_hint.as_deref(), Some("5-8 mm"));
    assert!(okra_tasks
        .iter()
        .any(|t| t.title == "Field scouting walk" && t.due_date == date(2024, 2, 8)));
}

#[tokio::test]
async fn test_upcoming_rejects_oversized_window() {
    let (_temp_dir, planner) = create_test_planner().await;
    let result = planner.upcoming(&Upcoming { window_days: 100_000 }).await;
    assert!(matches!(
        result,
        Err(PlannerError::InvalidInput { ref field, .. }) if field == "window_days"
    ));
}

#[tokio::test]
async fn test_tasks_on_date() {
    let (_temp_dir, planner) = create_test_planner().await;
    let id = planner.upsert_plan(&okra()).await.unwrap();

    let tasks = planner
        .tasks_on_date(&TasksOnDate {
            plan_id: id.clone(),
            date: "2024-02-01".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Water seedlings");
    assert_eq!(tasks[0].amount_hint.as_deref(), Some("5-8 mm"));

    // Outside the season nothing is due.
    let before = planner
        .tasks_on_date(&TasksOnDate {
            plan_id: id,
            date: "2024-01-31".to_string(),
        })
        .await
        .unwrap();
    assert!(before.is_empty());

    let missing = planner
        .tasks_on_date(&TasksOnDate {
            plan_id: "plan_0000000000000000".to_string(),
            date: "2024-02-01".to_string(),
        })
        .await;
    assert!(matches!(missing, Err(PlannerError::PlanNotFound { .. })));
}

#[tokio::test]
async fn test_expand_tasks_with_reversed_range_is_empty() {
    let (_temp_dir, planner) = create_test_planner().await;
    let id = planner.upsert_plan(&okra()).await.unwrap();

    let tasks = planner
        .expand_tasks(&ExpandTasks {
            plan_id: id,
            from: "2024-03-01".to_string(),
            to: "2024-02-01".to_string(),
        })
        .await
        .unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_language_resolves_oracle_titles() {
    let temp_dir = TempDir::new().unwrap();
    let planner = builder(&temp_dir)
        .with_language(Language::Hi)
        .with_oracle(StubOracle::answering(oracle_plan()))
        .build()
        .await
        .unwrap();
    planner.upsert_plan(&okra()).await.unwrap();

    let summaries = planner
        .list_plans_summary(&ListPlans::default())
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].title, "भिंडी ड्रिप योजना");
    assert_eq!(summaries[0].rule_count, 1);
}

#[tokio::test]
async fn test_project_notifications_caps_and_orders() {
    let (_temp_dir, planner) = create_test_planner().await;
    let id = planner.upsert_plan(&okra()).await.unwrap();

    let reminders = planner
        .project_notifications(&ProjectNotifications {
            plan_id: id.clone(),
            window_days: 90,
        })
        .await
        .unwrap();
    assert_eq!(reminders.len(), MAX_SCHEDULED);
    assert_eq!(reminders[0].id, format!("{id}:0"));
    assert_eq!(reminders[59].id, format!("{id}:59"));
    assert_eq!(
        reminders[0].trigger,
        "2024-02-03T07:00:00Z".parse::<Timestamp>().unwrap()
    );
    assert!(reminders.windows(2).all(|w| w[0].trigger <= w[1].trigger));
    assert!(reminders
        .iter()
        .all(|r| r.trigger > planner.now() && r.payload.plan_id == id));
}

#[tokio::test]
async fn test_sync_notifications_cancels_before_scheduling() {
    let (_temp_dir, planner) = create_test_planner().await;
    let id = planner.upsert_plan(&okra()).await.unwrap();
    let sink = RecordingSink::default();

    let scheduled = planner
        .sync_notifications(
            &ProjectNotifications {
                plan_id: id.clone(),
                window_days: 7,
            },
            &sink,
        )
        .await
        .unwrap();
    assert_eq!(scheduled.len(), 9);

    let events = sink.events();
    assert_eq!(events.len(), MAX_SCHEDULED + 9);
    assert!(events[..MAX_SCHEDULED]
        .iter()
        .all(|e| e.starts_with("cancel:")));
    assert_eq!(events[MAX_SCHEDULED], format!("schedule:{id}:0"));
}

#[tokio::test]
async fn test_sync_notifications_reports_sink_errors() {
    let (_temp_dir, planner) = create_test_planner().await;
    let id = planner.upsert_plan(&okra()).await.unwrap();
    let sink = RecordingSink {
        fail_schedule: true,
        ..Default::default()
    };

    let error = planner
        .sync_notifications(
            &ProjectNotifications {
                plan_id: id,
                window_days: 7,
            },
            &sink,
        )
        .await
        .unwrap_err();
    assert!(matches!(error, PlannerError::Notification(_)));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_complete_plan_result() {
    let (_temp_dir, planner) = create_test_planner().await;
    let id = planner.upsert_plan(&okra()).await.unwrap();

    let result = planner
        .complete_plan_result(&PlanRef { id: id.clone() })
        .await
        .unwrap();
    assert_eq!(result.plan.status, PlanStatus::Completed);
    assert!(result.to_string().contains("- Marked as completed"));

    let active = planner
        .list_plans_summary(&ListPlans::default())
        .await
        .unwrap();
    assert!(active.is_empty());
    let completed = planner
        .list_plans_summary(&ListPlans {
            completed: true,
            crop: None,
        })
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
}

#[tokio::test]
async fn test_delete_plan_requires_confirmation() {
    let (_temp_dir, planner) = create_test_planner().await;
    let id = planner.upsert_plan(&okra()).await.unwrap();

    let refused = planner
        .delete_plan(&DeletePlan {
            id: id.clone(),
            confirmed: false,
        })
        .await;
    assert!(matches!(refused, Err(PlannerError::InvalidInput { .. })));
    assert!(planner.get_plan(&PlanRef { id: id.clone() }).await.unwrap().is_some());

    let deleted = planner
        .delete_plan(&DeletePlan {
            id: id.clone(),
            confirmed: true,
        })
        .await
        .unwrap();
    assert_eq!(
        deleted.to_string(),
        format!("Deleted plan 'Okra care plan' (ID: {id})\n")
    );

    let again = planner.delete_plan(&DeletePlan { id, confirmed: true }).await;
    assert!(matches!(again, Err(PlannerError::PlanNotFound { .. })));
}

#[tokio::test]
async fn test_create_plan_result_shows_plan() {
    let (_temp_dir, planner) = create_test_planner().await;
    let result = planner.create_plan_result(&okra()).await.unwrap();
    let output = result.to_string();
    assert!(output.starts_with(&format!("Plan ready with ID: {}", result.plan.id)));
    assert!(output.contains("## Watering"));
    assert!(output.contains("## Milestones"));
}
