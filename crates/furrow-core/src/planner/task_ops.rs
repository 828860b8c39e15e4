//! Task expansion and agenda operations for the Planner.

use jiff::civil::Date;
use log::debug;

use super::Planner;
use crate::{
    calendar::{add_days, parse_iso_date, MAX_DAY_OFFSET},
    error::{PlannerError, Result},
    expand::expand,
    models::{PlanFilter, TaskInstance},
    params::{ExpandTasks, TasksOnDate, Upcoming},
    query::{attach_amount_hints, rank_upcoming, Agenda, UpcomingPlan},
};

impl Planner {
    /// Expands one plan over an explicit date range.
    ///
    /// Watering instances carry an amount hint when their notes contain one.
    pub async fn expand_tasks(&self, params: &ExpandTasks) -> Result<Vec<TaskInstance>> {
        let from = parse_iso_date("from", &params.from)?;
        let to = parse_iso_date("to", &params.to)?;
        let plan = self.require_plan(&params.plan_id).await?;

        let mut instances = expand(&plan, from, to, self.language);
        attach_amount_hints(&mut instances);
        Ok(instances)
    }

    /// The tasks of one plan due on `date`.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::PlanNotFound` if the caller has no such plan.
    pub async fn tasks_on_date(&self, params: &TasksOnDate) -> Result<Vec<TaskInstance>> {
        let date = parse_iso_date("date", &params.date)?;
        let plan = self.require_plan(&params.plan_id).await?;

        let mut instances = expand(&plan, date, date, self.language);
        attach_amount_hints(&mut instances);
        Ok(instances)
    }

    /// Tasks due from today through `window_days` days ahead across every
    /// active plan of the caller.
    ///
    /// Plans are ranked by their nearest task; plans with nothing due in the
    /// window are listed last.
    pub async fn upcoming(&self, params: &Upcoming) -> Result<Agenda> {
        let (from, to) = self.window(params.window_days)?;
        let plans = self.list_plans(PlanFilter::active()).await?;
        debug!("Expanding {} active plan(s) over {from}..={to}", plans.len());

        let mut agendas: Vec<UpcomingPlan> = plans
            .iter()
            .map(|plan| {
                let mut instances = expand(plan, from, to, self.language);
                attach_amount_hints(&mut instances);
                UpcomingPlan {
                    plan_id: plan.id.clone(),
                    title: plan.display_title(self.language),
                    crop_name: plan.crop_name.clone(),
                    expected_harvest_date: plan.expected_harvest_date,
                    updated_at: plan.updated_at,
                    instances,
                }
            })
            .collect();
        rank_upcoming(&mut agendas);

        Ok(Agenda {
            from,
            to,
            plans: agendas,
        })
    }

    /// `[today, today + window_days]`, rejecting windows past the supported
    /// horizon.
    pub(crate) fn window(&self, window_days: u32) -> Result<(Date, Date)> {
        if window_days > MAX_DAY_OFFSET {
            return Err(PlannerError::invalid_input("window_days")
                .with_reason(format!("must be at most {MAX_DAY_OFFSET}, got {window_days}")));
        }
        let today = self.today();
        Ok((today, add_days(today, i64::from(window_days))))
    }
}
