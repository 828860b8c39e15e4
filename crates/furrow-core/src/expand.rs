//! Expansion of plan rules into dated task instances.
//!
//! [`expand`] is a pure function: it never touches storage and never mutates
//! the plan, so the same arguments always produce the same list in the same
//! order.

use std::collections::BTreeMap;

use jiff::civil::Date;

use crate::{
    calendar::{add_days, days_between},
    models::{CadenceRule, Language, OneOffTask, Plan, TaskInstance},
};

/// Expands `plan` into the task instances due between `range_start` and
/// `range_end` (both inclusive).
///
/// The window is clamped to `[planting_date, expected_harvest_date]`. Rules
/// whose cadence is the stop sentinel produce nothing. Instances sharing a
/// `(plan, due date, resolved title)` key collapse into the first one
/// emitted, visiting one-off tasks, then watering rules, then recurring
/// rules. The result is sorted by due date, then by title using byte-wise
/// string comparison.
///
/// ```rust
/// use furrow_core::{expand::expand, heuristic, models::Language};
/// # use furrow_core::models::{Plan, PlanSource, PlanStatus, LocalizedText};
/// # use jiff::{civil::date, Timestamp};
/// # let mut plan = Plan {
/// #     id: "plan_x".into(), user_id: "u".into(), crop_type: "cereal".into(),
/// #     crop_name: "rice".into(), area_acres: 1.0, planting_date: date(2024, 6, 1),
/// #     expected_harvest_date: date(2024, 6, 2), cleanup_after_date: date(2024, 6, 3),
/// #     status: PlanStatus::Active, source: None, generation_attempted: false,
/// #     generation_error: None, title: LocalizedText::default(),
/// #     overview: LocalizedText::default(), watering_rules: vec![],
/// #     recurring_tasks: vec![], one_off_tasks: vec![],
/// #     created_at: Timestamp::UNIX_EPOCH, updated_at: Timestamp::UNIX_EPOCH,
/// # };
/// let content = heuristic::build(&heuristic::HeuristicInput {
///     crop_type: "cereal",
///     crop_name: "rice",
///     planting_date: date(2024, 6, 1),
///     harvest_override: None,
/// });
/// plan.apply_content(content, PlanSource::Heuristic);
///
/// let day_zero = expand(&plan, date(2024, 6, 1), date(2024, 6, 1), Language::En);
/// assert_eq!(day_zero.len(), 1);
/// assert_eq!(day_zero[0].title, "Basal fertilizer application");
/// ```
pub fn expand(
    plan: &Plan,
    range_start: Date,
    range_end: Date,
    language: Language,
) -> Vec<TaskInstance> {
    let start = range_start.max(plan.planting_date);
    let end = range_end.min(plan.expected_harvest_date);
    if start > end {
        return Vec::new();
    }

    let plan_title = plan.display_title(language);
    let mut emitted: BTreeMap<(Date, String), TaskInstance> = BTreeMap::new();
    let mut emit = |instance: TaskInstance| {
        emitted
            .entry((instance.due_date, instance.title.clone()))
            .or_insert(instance);
    };

    for task in &plan.one_off_tasks {
        if (start..=end).contains(&task.due_date) {
            emit(one_off_instance(plan, &plan_title, task, language));
        }
    }

    for rule in plan.watering_rules.iter().chain(&plan.recurring_tasks) {
        for due_date in occurrences(rule, plan.planting_date, start, end) {
            emit(cadence_instance(plan, &plan_title, rule, due_date, language));
        }
    }

    emitted.into_values().collect()
}

/// Dates on which `rule` fires inside `[start, end]`.
///
/// The first occurrence is `planting_date + start_day`; later ones follow in
/// steps of `every_days` up to `planting_date + end_day`. The cursor jumps
/// forward to the first occurrence on or after `start` without walking the
/// days before it.
pub fn occurrences(rule: &CadenceRule, planting_date: Date, start: Date, end: Date) -> Vec<Date> {
    let Some(step) = rule.every_days.step() else {
        return Vec::new();
    };
    let step = i64::from(step.max(1));

    let window_start = days_between(planting_date, start);
    let last = i64::from(rule.end_day).min(days_between(planting_date, end));

    let mut offset = i64::from(rule.start_day);
    if offset < window_start {
        let steps = (window_start - offset + step - 1) / step;
        offset += steps * step;
    }

    let mut dates = Vec::new();
    while offset <= last {
        dates.push(add_days(planting_date, offset));
        offset += step;
    }
    dates
}

fn one_off_instance(
    plan: &Plan,
    plan_title: &str,
    task: &OneOffTask,
    language: Language,
) -> TaskInstance {
    TaskInstance {
        plan_id: plan.id.clone(),
        crop_name: plan.crop_name.clone(),
        plan_title: plan_title.to_string(),
        kind: task.kind,
        title: task.title_i18n.resolve_or(language, &task.title),
        due_date: task.due_date,
        time_of_day: task.time_of_day,
        time: task.time,
        notes: task
            .notes_i18n
            .resolve(language)
            .or(task.notes.as_deref())
            .map(String::from),
        amount_hint: None,
    }
}

fn cadence_instance(
    plan: &Plan,
    plan_title: &str,
    rule: &CadenceRule,
    due_date: Date,
    language: Language,
) -> TaskInstance {
    TaskInstance {
        plan_id: plan.id.clone(),
        crop_name: plan.crop_name.clone(),
        plan_title: plan_title.to_string(),
        kind: rule.kind,
        title: rule.title_i18n.resolve_or(language, &rule.title),
        due_date,
        time_of_day: rule.time_of_day,
        time: rule.time,
        notes: rule
            .notes_i18n
            .resolve(language)
            .or(rule.notes.as_deref())
            .map(String::from),
        amount_hint: None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::{
        heuristic::{self, HeuristicInput},
        models::{
            EveryDays, LocalizedText, OneOffTask, PlanSource, PlanStatus, TaskKind, TimeOfDay,
        },
    };

    fn empty_plan(planting: Date, harvest: Date) -> Plan {
        Plan {
            id: "plan_test".to_string(),
            user_id: "farmer-1".to_string(),
            crop_type: "vegetable".to_string(),
            crop_name: "Okra".to_string(),
            area_acres: 1.0,
            planting_date: planting,
            expected_harvest_date: harvest,
            cleanup_after_date: add_days(harvest, 1),
            status: PlanStatus::Active,
            source: Some(PlanSource::Heuristic),
            generation_attempted: false,
            generation_error: None,
            title: LocalizedText::default(),
            overview: LocalizedText::default(),
            watering_rules: vec![],
            recurring_tasks: vec![],
            one_off_tasks: vec![],
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn rule(id: &str, title: &str, start: u32, end: u32, every: EveryDays) -> CadenceRule {
        CadenceRule {
            id: id.to_string(),
            kind: TaskKind::Watering,
            title: title.to_string(),
            start_day: start,
            end_day: end,
            every_days: every,
            time_of_day: TimeOfDay::Morning,
            time: None,
            title_i18n: LocalizedText::default(),
            notes: None,
            notes_i18n: LocalizedText::default(),
        }
    }

    fn one_off(title: &str, due: Date) -> OneOffTask {
        OneOffTask {
            id: title.to_lowercase(),
            kind: TaskKind::Fertilizer,
            title: title.to_string(),
            due_date: due,
            time_of_day: TimeOfDay::Morning,
            time: None,
            title_i18n: LocalizedText::default(),
            notes: None,
            notes_i18n: LocalizedText::default(),
        }
    }

    fn rice_plan() -> Plan {
        let planting = date(2024, 6, 1);
        let mut plan = empty_plan(planting, planting);
        plan.crop_name = "rice".to_string();
        plan.apply_content(
            heuristic::build(&HeuristicInput {
                crop_type: "cereal",
                crop_name: "rice",
                planting_date: planting,
                harvest_override: None,
            }),
            PlanSource::Heuristic,
        );
        plan
    }

    #[test]
    fn test_rice_scouting_lands_on_weekly_days() {
        let plan = rice_plan();
        assert_eq!(plan.expected_harvest_date, date(2024, 9, 29));

        let scouting_days: Vec<Date> =
            expand(&plan, date(2024, 6, 1), date(2024, 6, 20), Language::En)
                .into_iter()
                .filter(|i| i.title == "Field scouting walk")
                .map(|i| i.due_date)
                .collect();
        assert_eq!(scouting_days, vec![date(2024, 6, 8), date(2024, 6, 15)]);

        let on_tenth = expand(&plan, date(2024, 6, 10), date(2024, 6, 10), Language::En);
        assert!(on_tenth.iter().all(|i| i.title != "Field scouting walk"));
    }

    #[test]
    fn test_rice_day_zero_is_basal_fertilizer_only() {
        let plan = rice_plan();
        let instances = expand(&plan, date(2024, 6, 1), date(2024, 6, 1), Language::En);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].kind, TaskKind::Fertilizer);
        assert_eq!(instances[0].title, "Basal fertilizer application");
        assert_eq!(instances[0].due_date, date(2024, 6, 1));
    }

    #[test]
    fn test_single_day_window_on_daily_rule() {
        let planting = date(2024, 3, 1);
        let mut plan = empty_plan(planting, date(2024, 6, 1));
        plan.watering_rules.push(rule("w", "Water", 0, 30, EveryDays::Days(1)));

        let day5 = add_days(planting, 5);
        let instances = expand(&plan, day5, day5, Language::En);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].due_date, day5);
    }

    #[test]
    fn test_stop_sentinel_never_emits() {
        let planting = date(2024, 3, 1);
        let mut plan = empty_plan(planting, date(2024, 6, 1));
        plan.watering_rules.push(rule("stop", "Stop irrigation", 0, 90, EveryDays::Stop));

        for offset in 0..=92 {
            let day = add_days(planting, offset);
            assert!(expand(&plan, day, day, Language::En).is_empty());
        }
        assert!(expand(&plan, planting, date(2024, 6, 1), Language::En).is_empty());
    }

    #[test]
    fn test_consecutive_occurrences_differ_by_cadence() {
        let planting = date(2024, 1, 10);
        let mut plan = empty_plan(planting, date(2024, 12, 31));
        plan.recurring_tasks.push(rule("r", "Check", 3, 200, EveryDays::Days(9)));

        let dates: Vec<Date> = expand(&plan, date(2024, 2, 1), date(2024, 7, 1), Language::En)
            .into_iter()
            .map(|i| i.due_date)
            .collect();
        assert!(dates.len() > 5);
        for pair in dates.windows(2) {
            assert_eq!(days_between(pair[0], pair[1]), 9);
        }
        // Occurrences stay aligned to the rule's own start, not the window.
        assert_eq!(days_between(planting, dates[0]) % 9, 3);
    }

    #[test]
    fn test_window_is_clamped_to_season() {
        let planting = date(2024, 3, 1);
        let harvest = date(2024, 3, 20);
        let mut plan = empty_plan(planting, harvest);
        plan.watering_rules.push(rule("w", "Water", 0, 400, EveryDays::Days(1)));
        plan.one_off_tasks.push(one_off("Late task", date(2024, 4, 1)));

        let instances = expand(&plan, date(2024, 1, 1), date(2024, 12, 31), Language::En);
        assert_eq!(instances.len(), 20);
        assert!(instances
            .iter()
            .all(|i| i.due_date >= planting && i.due_date <= harvest));

        assert!(expand(&plan, date(2024, 4, 1), date(2024, 4, 30), Language::En).is_empty());
        assert!(expand(&plan, date(2024, 3, 10), date(2024, 3, 5), Language::En).is_empty());
    }

    #[test]
    fn test_partition_union_equals_full_range() {
        let plan = rice_plan();
        let full: BTreeSet<(Date, String)> = expand(
            &plan,
            plan.planting_date,
            plan.expected_harvest_date,
            Language::En,
        )
        .into_iter()
        .map(|i| (i.due_date, i.title))
        .collect();

        for split in [0, 1, 6, 7, 8, 45, 119, 120] {
            let mid = add_days(plan.planting_date, split);
            let mut union: BTreeSet<(Date, String)> = BTreeSet::new();
            for i in expand(&plan, plan.planting_date, mid, Language::En) {
                union.insert((i.due_date, i.title));
            }
            for i in expand(&plan, add_days(mid, 1), plan.expected_harvest_date, Language::En) {
                union.insert((i.due_date, i.title));
            }
            assert_eq!(union, full, "split after day {split}");
        }
    }

    #[test]
    fn test_expand_is_idempotent() {
        let plan = rice_plan();
        let first = expand(&plan, date(2024, 6, 1), date(2024, 8, 1), Language::Hi);
        let second = expand(&plan, date(2024, 6, 1), date(2024, 8, 1), Language::Hi);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_duplicates_collapse_and_order_is_ordinal() {
        let planting = date(2024, 3, 1);
        let mut plan = empty_plan(planting, date(2024, 6, 1));
        plan.one_off_tasks.push(one_off("water", planting));
        plan.one_off_tasks.push(one_off("Water", planting));
        plan.watering_rules.push(rule("w", "Water", 0, 0, EveryDays::Days(1)));
        plan.recurring_tasks.push(rule("b", "Bund repair", 0, 0, EveryDays::Days(1)));

        let instances = expand(&plan, planting, planting, Language::En);
        let titles: Vec<&str> = instances.iter().map(|i| i.title.as_str()).collect();
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(titles, ["Bund repair", "Water", "water"]);
        // The one-off is visited first, so it wins the shared key.
        let water = instances.iter().find(|i| i.title == "Water").unwrap();
        assert_eq!(water.kind, TaskKind::Fertilizer);
    }

    #[test]
    fn test_text_resolves_by_language() {
        let planting = date(2024, 3, 1);
        let mut plan = empty_plan(planting, date(2024, 6, 1));
        let mut localized = rule("w", "Water", 0, 0, EveryDays::Days(1));
        localized.title_i18n = LocalizedText {
            en: Some("Water the field".to_string()),
            hi: Some("खेत में पानी दें".to_string()),
            pa: None,
        };
        localized.notes = Some("raw note".to_string());
        plan.watering_rules.push(localized);

        let hi = expand(&plan, planting, planting, Language::Hi);
        assert_eq!(hi[0].title, "खेत में पानी दें");
        assert_eq!(hi[0].notes.as_deref(), Some("raw note"));

        let pa = expand(&plan, planting, planting, Language::Pa);
        assert_eq!(pa[0].title, "Water the field");
        assert_eq!(pa[0].plan_title, "Okra care plan");
    }

    #[test]
    fn test_occurrences_jump_to_window() {
        let planting = date(2024, 1, 1);
        let r = rule("r", "Check", 2, 1000, EveryDays::Days(5));
        let dates = occurrences(&r, planting, date(2024, 2, 1), date(2024, 2, 12));
        // Offsets 2, 7, 12, ...; Feb 1 is offset 31, so the first hit is 32.
        assert_eq!(dates, vec![date(2024, 2, 2), date(2024, 2, 7), date(2024, 2, 12)]);
    }
}
