//! Command definitions and handlers for the Furrow CLI.
//!
//! Each command has a clap argument struct that converts into the matching
//! core parameter type with `From`, keeping clap derives out of
//! `furrow-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use furrow_core::{
    display::{Notifications, OperationStatus, PlanDetails, TaskList},
    params::{
        DeletePlan, ExpandTasks, ListPlans, PlanRef, ProjectNotifications, TasksOnDate, Upcoming,
        UpsertPlan, DEFAULT_WINDOW_DAYS,
    },
    Planner,
};
use log::debug;

use crate::renderer::TerminalRenderer;

/// Create a plan for a crop, or show the existing one
///
/// The same crop, planting date and area always map to the same plan, so
/// running this twice shows the plan created the first time.
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Crop name, e.g. "Basmati rice"
    pub crop_name: String,
    /// Cultivated area in acres
    #[arg(short, long)]
    pub area: f64,
    /// Planting date (YYYY-MM-DD)
    #[arg(short, long)]
    pub planted: String,
    /// Crop category, e.g. "cereal"
    #[arg(short = 't', long = "type", default_value = "")]
    pub crop_type: String,
    /// Expected harvest date (YYYY-MM-DD), overriding the crop's usual
    /// season length
    #[arg(long)]
    pub harvest: Option<String>,
}

impl From<CreatePlanArgs> for UpsertPlan {
    fn from(val: CreatePlanArgs) -> Self {
        UpsertPlan {
            crop_type: val.crop_type,
            crop_name: val.crop_name,
            area_acres: val.area,
            planting_date: val.planted,
            expected_harvest_date: val.harvest,
        }
    }
}

/// List plans
///
/// Shows plans still in season by default; `--completed` shows completed
/// plans instead.
#[derive(Args)]
pub struct ListPlansArgs {
    /// Show completed plans instead of active ones
    #[arg(long)]
    pub completed: bool,
    /// Only plans whose crop name contains this text
    #[arg(long)]
    pub crop: Option<String>,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans {
            completed: val.completed,
            crop: val.crop,
        }
    }
}

/// Arguments naming a single plan
#[derive(Args)]
pub struct PlanIdArgs {
    /// Plan ID, e.g. plan_1f2e3d4c5b6a7988
    pub id: String,
}

impl From<PlanIdArgs> for PlanRef {
    fn from(val: PlanIdArgs) -> Self {
        PlanRef { id: val.id }
    }
}

/// Delete a plan permanently
#[derive(Args)]
pub struct DeletePlanArgs {
    /// ID of the plan to delete
    pub id: String,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeletePlanArgs> for DeletePlan {
    fn from(val: DeletePlanArgs) -> Self {
        DeletePlan {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a plan (or show the existing one for the same planting)
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show details of a plan
    #[command(alias = "s")]
    Show(PlanIdArgs),
    /// Mark a plan completed
    Complete(PlanIdArgs),
    /// Delete a plan permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePlanArgs),
}

/// Tasks due across all active plans
#[derive(Args)]
pub struct UpcomingArgs {
    /// Days after today to include
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_DAYS)]
    pub days: u32,
}

impl From<UpcomingArgs> for Upcoming {
    fn from(val: UpcomingArgs) -> Self {
        Upcoming {
            window_days: val.days,
        }
    }
}

/// Tasks of one plan on one day
#[derive(Args)]
pub struct TasksOnArgs {
    /// Plan ID
    pub plan_id: String,
    /// Date (YYYY-MM-DD)
    pub date: String,
}

impl From<TasksOnArgs> for TasksOnDate {
    fn from(val: TasksOnArgs) -> Self {
        TasksOnDate {
            plan_id: val.plan_id,
            date: val.date,
        }
    }
}

/// Tasks of one plan between two dates
#[derive(Args)]
pub struct TasksRangeArgs {
    /// Plan ID
    pub plan_id: String,
    /// First date (YYYY-MM-DD), inclusive
    pub from: String,
    /// Last date (YYYY-MM-DD), inclusive
    pub to: String,
}

impl From<TasksRangeArgs> for ExpandTasks {
    fn from(val: TasksRangeArgs) -> Self {
        ExpandTasks {
            plan_id: val.plan_id,
            from: val.from,
            to: val.to,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Tasks due soon across all active plans
    #[command(alias = "u")]
    Upcoming(UpcomingArgs),
    /// Tasks of one plan on one day
    On(TasksOnArgs),
    /// Tasks of one plan between two dates
    #[command(alias = "r")]
    Range(TasksRangeArgs),
}

/// Reminders a device would schedule for a plan
#[derive(Args)]
pub struct NotifyArgs {
    /// Plan ID
    pub plan_id: String,
    /// Days after today to include
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_DAYS)]
    pub days: u32,
    /// Print the reminders as JSON for an external scheduler
    #[arg(long)]
    pub json: bool,
}

impl From<&NotifyArgs> for ProjectNotifications {
    fn from(val: &NotifyArgs) -> Self {
        ProjectNotifications {
            plan_id: val.plan_id.clone(),
            window_days: val.days,
        }
    }
}

/// Runs commands against a planner and renders the results.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => self.create_plan(args.into()).await,
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => self.show_plan(&args.into()).await,
            PlanCommands::Complete(args) => self.complete_plan(&args.into()).await,
            PlanCommands::Delete(args) => self.delete_plan(&args.into()).await,
        }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Upcoming(args) => self.upcoming(&args.into()).await,
            TaskCommands::On(args) => self.tasks_on(&args.into()).await,
            TaskCommands::Range(args) => self.tasks_range(&args.into()).await,
        }
    }

    async fn create_plan(&self, params: UpsertPlan) -> Result<()> {
        let result = self
            .planner
            .create_plan_result(&params)
            .await
            .context("Failed to create plan")?;
        self.renderer.render(&result.to_string())
    }

    async fn list_plans(&self, params: &ListPlans) -> Result<()> {
        let summaries = self
            .planner
            .list_plans_summary(params)
            .await
            .context("Failed to list plans")?;
        let heading = if params.completed {
            "Completed Plans"
        } else {
            "Active Plans"
        };
        self.renderer.render(&format!("# {heading}\n\n{summaries}"))
    }

    async fn show_plan(&self, params: &PlanRef) -> Result<()> {
        let plan = self
            .planner
            .get_plan(params)
            .await
            .context("Failed to get plan")?;
        let output = match plan {
            Some(plan) => PlanDetails::new(&plan, self.planner.language()).to_string(),
            None => OperationStatus::failure(format!("Plan with ID {} not found", params.id))
                .to_string(),
        };
        self.renderer.render(&output)
    }

    async fn complete_plan(&self, params: &PlanRef) -> Result<()> {
        let result = self
            .planner
            .complete_plan_result(params)
            .await
            .context("Failed to complete plan")?;
        self.renderer.render(&result.to_string())
    }

    async fn delete_plan(&self, params: &DeletePlan) -> Result<()> {
        let result = self
            .planner
            .delete_plan(params)
            .await
            .context("Failed to delete plan")?;
        self.renderer.render(&result.to_string())
    }

    pub async fn upcoming(&self, params: &Upcoming) -> Result<()> {
        let agenda = self
            .planner
            .upcoming(params)
            .await
            .context("Failed to load upcoming tasks")?;
        debug!("Agenda covers {} plan(s)", agenda.plans.len());
        self.renderer.render(&format!(
            "# Upcoming tasks ({} to {})\n\n{agenda}",
            agenda.from, agenda.to
        ))
    }

    async fn tasks_on(&self, params: &TasksOnDate) -> Result<()> {
        let tasks = self
            .planner
            .tasks_on_date(params)
            .await
            .context("Failed to load tasks")?;
        self.renderer
            .render(&format!("# Tasks on {}\n\n{}", params.date, TaskList(tasks)))
    }

    async fn tasks_range(&self, params: &ExpandTasks) -> Result<()> {
        let tasks = self
            .planner
            .expand_tasks(params)
            .await
            .context("Failed to expand tasks")?;
        self.renderer.render(&format!(
            "# Tasks from {} to {}\n\n{}",
            params.from,
            params.to,
            TaskList(tasks)
        ))
    }

    pub async fn notify(&self, args: &NotifyArgs) -> Result<()> {
        let items = self
            .planner
            .project_notifications(&args.into())
            .await
            .context("Failed to project reminders")?;

        if args.json {
            let json = serde_json::to_string_pretty(&items).context("Failed to encode reminders")?;
            println!("{json}");
            return Ok(());
        }

        let notifications = Notifications {
            items,
            time_zone: self.planner.time_zone().clone(),
        };
        self.renderer.render(&format!(
            "# Reminders for {}\n\n{notifications}",
            args.plan_id
        ))
    }

    pub async fn sweep(&self) -> Result<()> {
        let removed = self
            .planner
            .sweep()
            .await
            .context("Failed to sweep expired plans")?;
        self.renderer
            .render(&OperationStatus::swept(removed).to_string())
    }
}
