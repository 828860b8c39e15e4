//! Plan storage operations and queries.

use std::str::FromStr;

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, types::Type, OptionalExtension, Row};
use serde::de::DeserializeOwned;

use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Plan, PlanContent, PlanFilter, PlanSource, PlanStatus},
};

const PLAN_COLUMNS: &str = "id, user_id, crop_type, crop_name, area_acres, planting_date, \
     expected_harvest_date, cleanup_after_date, status, source, generation_attempted, \
     generation_error, title, overview, watering_rules, recurring_tasks, one_off_tasks, \
     created_at, updated_at";

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (id, user_id, crop_type, crop_name, area_acres, \
     planting_date, expected_harvest_date, cleanup_after_date, status, created_at, updated_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10) \
     ON CONFLICT (user_id, id) DO NOTHING";
const CLAIM_ATTEMPT_SQL: &str = "UPDATE plans SET generation_attempted = 1, updated_at = ?1 \
     WHERE user_id = ?2 AND id = ?3 AND generation_attempted = 0";
// Heuristic content never replaces oracle content.
const SAVE_CONTENT_SQL: &str = "UPDATE plans SET title = ?1, overview = ?2, \
     expected_harvest_date = ?3, cleanup_after_date = ?4, watering_rules = ?5, \
     recurring_tasks = ?6, one_off_tasks = ?7, source = ?8, \
     generation_error = COALESCE(?9, generation_error), updated_at = ?10 \
     WHERE user_id = ?11 AND id = ?12 \
     AND (?8 = 'oracle' OR source IS NULL OR source <> 'oracle')";
const UPDATE_STATUS_SQL: &str =
    "UPDATE plans SET status = ?1, updated_at = ?2 WHERE user_id = ?3 AND id = ?4 AND status <> ?1";
const CHECK_PLAN_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM plans WHERE user_id = ?1 AND id = ?2)";
const DELETE_PLAN_SQL: &str = "DELETE FROM plans WHERE user_id = ?1 AND id = ?2";
const DELETE_EXPIRED_SQL: &str = "DELETE FROM plans WHERE cleanup_after_date < ?1";

impl super::Database {
    /// Retrieves one of the user's plans by id.
    pub fn get_plan(&self, user_id: &str, id: &str) -> Result<Option<Plan>> {
        let query = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = ?1 AND id = ?2");
        self.connection
            .query_row(&query, params![user_id, id], plan_from_row)
            .optional()
            .db_context("Failed to query plan")
    }

    /// Inserts a plan row unless one already exists for `(user_id, id)`.
    ///
    /// Only the identity, dates and status are written; rule content is
    /// stored separately by [`Self::save_content`]. Returns whether a row was
    /// inserted.
    pub fn insert_plan_if_absent(&self, plan: &Plan) -> Result<bool> {
        let inserted = self
            .connection
            .execute(
                INSERT_PLAN_SQL,
                params![
                    plan.id,
                    plan.user_id,
                    plan.crop_type,
                    plan.crop_name,
                    plan.area_acres,
                    plan.planting_date.to_string(),
                    plan.expected_harvest_date.to_string(),
                    plan.cleanup_after_date.to_string(),
                    plan.status.as_str(),
                    plan.created_at.to_string(),
                ],
            )
            .db_context("Failed to insert plan")?;
        Ok(inserted == 1)
    }

    /// Records an oracle attempt for the plan if none has been recorded yet.
    ///
    /// Returns `true` for exactly one caller per plan: the one whose write
    /// flipped the flag. Everyone else, including callers racing on another
    /// connection, gets `false`.
    pub fn claim_generation_attempt(
        &self,
        user_id: &str,
        id: &str,
        now: Timestamp,
    ) -> Result<bool> {
        let claimed = self
            .connection
            .execute(CLAIM_ATTEMPT_SQL, params![now.to_string(), user_id, id])
            .db_context("Failed to record generation attempt")?;
        Ok(claimed == 1)
    }

    /// Writes generated content onto the plan.
    ///
    /// Heuristic content is ignored when the plan already carries oracle
    /// content. A `generation_error` of `None` keeps any previously recorded
    /// error. Returns whether the plan was updated.
    pub fn save_content(
        &mut self,
        user_id: &str,
        id: &str,
        content: &PlanContent,
        source: PlanSource,
        generation_error: Option<&str>,
        now: Timestamp,
    ) -> Result<bool> {
        let title = serde_json::to_string(&content.title)?;
        let overview = serde_json::to_string(&content.overview)?;
        let watering_rules = serde_json::to_string(&content.watering_rules)?;
        let recurring_tasks = serde_json::to_string(&content.recurring_tasks)?;
        let one_off_tasks = serde_json::to_string(&content.one_off_tasks)?;
        let cleanup_after = crate::calendar::add_days(content.expected_harvest_date, 1);

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let updated = tx
            .execute(
                SAVE_CONTENT_SQL,
                params![
                    title,
                    overview,
                    content.expected_harvest_date.to_string(),
                    cleanup_after.to_string(),
                    watering_rules,
                    recurring_tasks,
                    one_off_tasks,
                    source.as_str(),
                    generation_error,
                    now.to_string(),
                    user_id,
                    id,
                ],
            )
            .db_context("Failed to save plan content")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(updated == 1)
    }

    /// Lists the user's plans, most recently updated first.
    pub fn list_plans(&self, user_id: &str, filter: &PlanFilter) -> Result<Vec<Plan>> {
        let mut query = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = ?");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(status) = filter.status {
            query.push_str(" AND status = ?");
            params_vec.push(Box::new(status.as_str()));
        }

        if let Some(ref crop) = filter.crop_contains {
            query.push_str(" AND crop_name LIKE ? ESCAPE '\\'");
            params_vec.push(Box::new(format!("%{}%", escape_like(crop))));
        }


        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut plans: Vec<Plan> = stmt
            .query_map(&params_refs[..], plan_from_row)
            .db_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plans")?;

        // Stored timestamps drop trailing fractional zeros, so text order is
        // not time order.
        plans.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(plans)
    }

    /// Moves a plan to `status`.
    ///
    /// Returns the plan after the update, or `None` if it doesn't exist.
    /// Setting the status a plan already has is not an error.
    pub fn set_plan_status(
        &mut self,
        user_id: &str,
        id: &str,
        status: PlanStatus,
        now: Timestamp,
    ) -> Result<Option<Plan>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            UPDATE_STATUS_SQL,
            params![status.as_str(), now.to_string(), user_id, id],
        )
        .db_context("Failed to update plan status")?;

        let query = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = ?1 AND id = ?2");
        let plan = tx
            .query_row(&query, params![user_id, id], plan_from_row)
            .optional()
            .db_context("Failed to query updated plan")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }

    /// Permanently deletes one of the user's plans.
    pub fn delete_plan(&mut self, user_id: &str, id: &str) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_PLAN_EXISTS_SQL, params![user_id, id], |row| row.get(0))
            .db_context("Failed to check plan existence")?;

        if !exists {
            return Err(PlannerError::plan_not_found(id));
        }

        tx.execute(DELETE_PLAN_SQL, params![user_id, id])
            .db_context("Failed to delete plan")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Deletes every plan, for all users, whose cleanup date is strictly
    /// before `today`. Returns the number of plans deleted.
    pub fn delete_expired_plans(&self, today: Date) -> Result<usize> {
        self.connection
            .execute(DELETE_EXPIRED_SQL, params![today.to_string()])
            .db_context("Failed to delete expired plans")
    }
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

fn parse_column<T>(row: &Row<'_>, index: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let text: String = row.get(index)?;
    text.parse::<T>()
        .map_err(|e| conversion_error(index, format!("Invalid value '{text}': {e}")))
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, index: usize) -> rusqlite::Result<T> {
    let text: String = row.get(index)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<Plan> {
    let source = row
        .get::<_, Option<String>>(9)?
        .map(|s| s.parse::<PlanSource>())
        .transpose()
        .map_err(|e| conversion_error(9, e))?;

    Ok(Plan {
        id: row.get(0)?,
        user_id: row.get(1)?,
        crop_type: row.get(2)?,
        crop_name: row.get(3)?,
        area_acres: row.get(4)?,
        planting_date: parse_column(row, 5)?,
        expected_harvest_date: parse_column(row, 6)?,
        cleanup_after_date: parse_column(row, 7)?,
        status: parse_column(row, 8)?,
        source,
        generation_attempted: row.get(10)?,
        generation_error: row.get(11)?,
        title: json_column(row, 12)?,
        overview: json_column(row, 13)?,
        watering_rules: json_column(row, 14)?,
        recurring_tasks: json_column(row, 15)?,
        one_off_tasks: json_column(row, 16)?,
        created_at: parse_column::<Timestamp>(row, 17)?,
        updated_at: parse_column::<Timestamp>(row, 18)?,
    })
}
