//! Plan operations for the Planner.

use jiff::civil::Date;
use log::{debug, info, warn};

use super::Planner;
use crate::{
    calendar::{add_days, parse_iso_date},
    error::{PlannerError, Result},
    heuristic::{self, clamp_harvest, CropFamily, HeuristicInput},
    models::{LocalizedText, Plan, PlanContent, PlanFilter, PlanSource, PlanStatus},
    oracle::OracleRequest,
    params::{PlanRef, UpsertPlan},
};

/// Upsert input after validation.
#[derive(Debug, Clone)]
struct PlantingInput {
    crop_type: String,
    crop_name: String,
    area_acres: f64,
    planting_date: Date,
    harvest_override: Option<Date>,
}

impl PlantingInput {
    fn parse(params: &UpsertPlan) -> Result<Self> {
        let crop_name = params.crop_name.trim();
        if crop_name.is_empty() {
            return Err(PlannerError::invalid_input("crop_name").with_reason("must not be empty"));
        }
        if !params.area_acres.is_finite() || params.area_acres <= 0.0 {
            return Err(PlannerError::invalid_input("area_acres").with_reason(format!(
                "must be a positive number of acres, got {}",
                params.area_acres
            )));
        }
        let planting_date = parse_iso_date("planting_date", &params.planting_date)?;
        let harvest_override = params
            .expected_harvest_date
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_iso_date("expected_harvest_date", value))
            .transpose()?
            .map(|harvest| clamp_harvest(planting_date, harvest));

        Ok(Self {
            crop_type: params.crop_type.trim().to_string(),
            crop_name: crop_name.to_string(),
            area_acres: params.area_acres,
            planting_date,
            harvest_override,
        })
    }

    fn heuristic(&self) -> HeuristicInput<'_> {
        HeuristicInput {
            crop_type: &self.crop_type,
            crop_name: &self.crop_name,
            planting_date: self.planting_date,
            harvest_override: self.harvest_override,
        }
    }

    fn default_harvest(&self) -> Date {
        let family = CropFamily::for_crop(&self.crop_name, &self.crop_type);
        heuristic::harvest_date(self.planting_date, self.harvest_override, family)
    }
}

impl Planner {
    /// Creates the plan for a crop, planting date and area, or returns the
    /// existing one.
    ///
    /// The id is derived from the inputs, so repeated calls with the same
    /// crop, date and area return the same id without regenerating content.
    /// When an oracle is configured it is consulted at most once per plan;
    /// if it fails, or was already consulted, the heuristic builder supplies
    /// the content.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Unauthenticated` without a caller id and
    /// `PlannerError::InvalidInput` for malformed input. Nothing is written
    /// in either case.
    pub async fn upsert_plan(&self, params: &UpsertPlan) -> Result<String> {
        let user_id = self.require_user("upsert_plan")?;
        let input = PlantingInput::parse(params)?;
        let id = Plan::derive_id(&input.crop_name, input.planting_date, input.area_acres);

        let existing = {
            let (user_id, id) = (user_id.clone(), id.clone());
            self.with_db(move |db| db.get_plan(&user_id, &id)).await?
        };
        if existing.as_ref().is_some_and(Plan::has_rule_content) {
            debug!("Plan {id} already has content");
            return Ok(id);
        }

        if existing.is_none() {
            let skeleton = self.skeleton_plan(&user_id, &id, &input);
            let inserted = self
                .with_db(move |db| db.insert_plan_if_absent(&skeleton))
                .await?;
            if inserted {
                info!("Created plan {id} for {}", input.crop_name);
            }
        }

        let (content, source, error) = self.generate_content(&user_id, &id, &input).await?;
        let rule_count = content.rule_count();
        let saved = {
            let (user_id, id) = (user_id.clone(), id.clone());
            let now = self.now();
            self.with_db(move |db| {
                db.save_content(&user_id, &id, &content, source, error.as_deref(), now)
            })
            .await?
        };
        if saved {
            info!(
                "Stored {} content for plan {id} ({rule_count} rules)",
                source.as_str()
            );
        }

        Ok(id)
    }

    /// Picks the generator for a plan and runs it.
    ///
    /// Only the caller that wins the attempt claim talks to the oracle.
    async fn generate_content(
        &self,
        user_id: &str,
        id: &str,
        input: &PlantingInput,
    ) -> Result<(PlanContent, PlanSource, Option<String>)> {
        let Some(oracle) = self.oracle.clone() else {
            return Ok((heuristic::build(&input.heuristic()), PlanSource::Heuristic, None));
        };

        let claimed = {
            let (user_id, id) = (user_id.to_string(), id.to_string());
            let now = self.now();
            self.with_db(move |db| db.claim_generation_attempt(&user_id, &id, now))
                .await?
        };
        if !claimed {
            debug!("Oracle already attempted for plan {id}, using heuristic");
            return Ok((heuristic::build(&input.heuristic()), PlanSource::Heuristic, None));
        }

        let request = OracleRequest {
            crop_type: input.crop_type.clone(),
            crop_name: input.crop_name.clone(),
            area_acres: input.area_acres,
            planting_date: input.planting_date,
            expected_harvest_date: input.harvest_override,
            country: self.country.clone(),
        };
        info!("Requesting oracle plan for {id}");
        let outcome = oracle.generate(&request).await.and_then(|response| {
            response.into_content(
                input.planting_date,
                input.harvest_override,
                input.default_harvest(),
            )
        });

        match outcome {
            Ok(content) => Ok((content, PlanSource::Oracle, None)),
            Err(error) => {
                warn!("Oracle failed for plan {id}, falling back to heuristic: {error}");
                Ok((
                    heuristic::build(&input.heuristic()),
                    PlanSource::Heuristic,
                    Some(error.to_string()),
                ))
            }
        }
    }

    fn skeleton_plan(&self, user_id: &str, id: &str, input: &PlantingInput) -> Plan {
        let now = self.now();
        let harvest = input.default_harvest();
        Plan {
            id: id.to_string(),
            user_id: user_id.to_string(),
            crop_type: input.crop_type.clone(),
            crop_name: input.crop_name.clone(),
            area_acres: input.area_acres,
            planting_date: input.planting_date,
            expected_harvest_date: harvest,
            cleanup_after_date: add_days(harvest, 1),
            status: PlanStatus::Active,
            source: None,
            generation_attempted: false,
            generation_error: None,
            title: LocalizedText::default(),
            overview: LocalizedText::default(),
            watering_rules: Vec::new(),
            recurring_tasks: Vec::new(),
            one_off_tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Retrieves one of the caller's plans.
    pub async fn get_plan(&self, params: &PlanRef) -> Result<Option<Plan>> {
        let user_id = self.require_user("get_plan")?;
        let id = params.id.trim().to_string();
        self.with_db(move |db| db.get_plan(&user_id, &id)).await
    }

    /// Retrieves one of the caller's plans, failing if it doesn't exist.
    pub(crate) async fn require_plan(&self, plan_id: &str) -> Result<Plan> {
        self.get_plan(&PlanRef {
            id: plan_id.to_string(),
        })
        .await?
        .ok_or_else(|| PlannerError::plan_not_found(plan_id.trim()))
    }

    /// Lists the caller's plans matching `filter`.
    pub async fn list_plans(&self, filter: PlanFilter) -> Result<Vec<Plan>> {
        let user_id = self.require_user("list_plans")?;
        self.with_db(move |db| db.list_plans(&user_id, &filter)).await
    }

    /// Marks a plan completed; completed plans drop out of upcoming views
    /// but stay until swept.
    pub async fn complete_plan(&self, params: &PlanRef) -> Result<Plan> {
        let user_id = self.require_user("complete_plan")?;
        let id = params.id.trim().to_string();
        let now = self.now();
        let lookup_id = id.clone();
        self.with_db(move |db| {
            db.set_plan_status(&user_id, &lookup_id, PlanStatus::Completed, now)
        })
        .await?
        .ok_or_else(|| PlannerError::plan_not_found(id))
    }

    /// Permanently deletes one of the caller's plans.
    pub async fn delete_plan_by_id(&self, params: &PlanRef) -> Result<()> {
        let user_id = self.require_user("delete_plan")?;
        let id = params.id.trim().to_string();
        self.with_db(move |db| db.delete_plan(&user_id, &id)).await
    }

    /// Deletes every plan, for all users, whose cleanup date has passed.
    ///
    /// Returns the number of plans removed. Running it again the same day
    /// removes nothing.
    pub async fn sweep(&self) -> Result<usize> {
        let today = self.today();
        let removed = self
            .with_db(move |db| db.delete_expired_plans(today))
            .await?;
        info!("Sweep removed {removed} plan(s) with cleanup date before {today}");
        Ok(removed)
    }
}
