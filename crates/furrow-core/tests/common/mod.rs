use furrow_core::{params::UpsertPlan, Planner, PlannerBuilder};
use jiff::tz::TimeZone;
use tempfile::TempDir;

/// Instant every test planner treats as "now".
pub const NOW: &str = "2024-02-03T00:00:00Z";

/// Builder pointed at a fresh database in `temp_dir`, with a fixed clock
/// and UTC as the local time zone.
pub fn test_builder(temp_dir: &TempDir) -> PlannerBuilder {
    PlannerBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_user(Some("farmer-1"))
        .with_time_zone(TimeZone::UTC)
        .with_fixed_now(NOW.parse().expect("valid timestamp"))
}

/// Helper function to create a test planner
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planner = test_builder(&temp_dir)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// Okra planted two days before [`NOW`].
pub fn okra() -> UpsertPlan {
    UpsertPlan {
        crop_type: "vegetable".to_string(),
        crop_name: "Okra".to_string(),
        area_acres: 1.0,
        planting_date: "2024-02-01".to_string(),
        expected_harvest_date: None,
    }
}
