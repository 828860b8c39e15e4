//! Display implementations for domain models.
//!
//! All output is markdown, rendered by the CLI's terminal renderer. Text that
//! has translations is resolved in [`Language::En`] by the plain `Display`
//! impls; use [`PlanDetails`] to render a plan in another language.

use std::fmt;

use jiff::civil::Time;

use super::datetime::LocalDateTime;
use crate::models::{
    CadenceRule, ClockTime, Language, OneOffTask, Plan, PlanSource, PlanStatus, PlanSummary,
    TaskInstance, TaskKind, TimeOfDay,
};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TaskKind {
    /// Single-glyph marker used in task lists.
    pub fn icon(&self) -> &'static str {
        match self {
            TaskKind::Watering => "💧",
            TaskKind::Fertilizer => "🌱",
            TaskKind::Pest => "🐛",
            TaskKind::Disease => "🍂",
            TaskKind::Field => "🚜",
            TaskKind::Harvest => "🌾",
            TaskKind::Other => "•",
        }
    }
}

/// `HH:MM` for an explicit time, else the bucket's default time.
fn clock(time: Option<ClockTime>, time_of_day: TimeOfDay) -> Time {
    time.map_or_else(|| time_of_day.default_time(), |t| t.time())
}

/// A plan rendered with its text resolved in a chosen language.
pub struct PlanDetails<'a> {
    pub plan: &'a Plan,
    pub language: Language,
}

impl<'a> PlanDetails<'a> {
    pub fn new(plan: &'a Plan, language: Language) -> Self {
        Self { plan, language }
    }

    fn fmt_rule(&self, f: &mut fmt::Formatter<'_>, rule: &CadenceRule) -> fmt::Result {
        let title = rule.title_i18n.resolve_or(self.language, &rule.title);
        writeln!(
            f,
            "- {} **{title}**: days {}-{}, {} ({})",
            rule.kind.icon(),
            rule.start_day,
            rule.end_day,
            rule.every_days,
            clock(rule.time, rule.time_of_day).strftime("%H:%M"),
        )
    }

    fn fmt_one_off(&self, f: &mut fmt::Formatter<'_>, task: &OneOffTask) -> fmt::Result {
        let title = task.title_i18n.resolve_or(self.language, &task.title);
        writeln!(
            f,
            "- {} {} **{title}** ({})",
            task.kind.icon(),
            task.due_date,
            clock(task.time, task.time_of_day).strftime("%H:%M"),
        )
    }
}

impl fmt::Display for PlanDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;
        writeln!(f, "# {}", plan.display_title(self.language))?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", plan.id)?;
        if plan.crop_type.is_empty() {
            writeln!(f, "- Crop: {}, {:.2} acres", plan.crop_name, plan.area_acres)?;
        } else {
            writeln!(
                f,
                "- Crop: {} ({}), {:.2} acres",
                plan.crop_name, plan.crop_type, plan.area_acres
            )?;
        }
        writeln!(f, "- Planted: {}", plan.planting_date)?;
        writeln!(f, "- Expected harvest: {}", plan.expected_harvest_date)?;
        writeln!(f, "- Status: {}", plan.status)?;
        match plan.source {
            Some(source) => writeln!(f, "- Source: {source}")?,
            None => writeln!(f, "- Source: pending")?,
        }
        if let Some(error) = &plan.generation_error {
            writeln!(f, "- Oracle error: {error}")?;
        }
        writeln!(f, "- Updated: {}", LocalDateTime::system(&plan.updated_at))?;

        if let Some(overview) = plan.overview.resolve(self.language) {
            writeln!(f)?;
            writeln!(f, "{overview}")?;
        }

        if !plan.watering_rules.is_empty() {
            writeln!(f, "\n## Watering")?;
            writeln!(f)?;
            for rule in &plan.watering_rules {
                self.fmt_rule(f, rule)?;
            }
        }

        if !plan.recurring_tasks.is_empty() {
            writeln!(f, "\n## Recurring tasks")?;
            writeln!(f)?;
            for rule in &plan.recurring_tasks {
                self.fmt_rule(f, rule)?;
            }
        }

        if !plan.one_off_tasks.is_empty() {
            writeln!(f, "\n## Milestones")?;
            writeln!(f)?;
            for task in &plan.one_off_tasks {
                self.fmt_one_off(f, task)?;
            }
        }

        if !plan.has_rule_content() {
            writeln!(f, "\nNo tasks in this plan yet.")?;
        }

        Ok(())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PlanDetails::new(self, Language::En))
    }
}

impl fmt::Display for TaskInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} {} **{}**",
            clock(self.time, self.time_of_day).strftime("%H:%M"),
            self.kind.icon(),
            self.title
        )?;
        if let Some(hint) = &self.amount_hint {
            write!(f, " ({hint})")?;
        }
        writeln!(f, " · {}", self.plan_title)?;
        if let Some(notes) = &self.notes {
            writeln!(f, "  {notes}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.title, self.id)?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Crop**: {}, {:.2} acres",
            self.crop_name, self.area_acres
        )?;
        writeln!(
            f,
            "- **Season**: {} to {}",
            self.planting_date, self.expected_harvest_date
        )?;
        let source = self.source.map_or("pending", |s| s.as_str());
        writeln!(
            f,
            "- **Status**: {} ({} rules from {source})",
            self.status, self.rule_count
        )?;
        writeln!(f)?;

        Ok(())
    }
}
