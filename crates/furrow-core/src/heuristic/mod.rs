//! Deterministic, table-driven plan content.
//!
//! Used whenever the generation oracle is not configured, has already been
//! attempted for a plan, or fails. The same input always yields the same
//! content.

use jiff::civil::Date;
use log::debug;

use crate::{
    calendar::{add_days, days_between},
    models::{
        dedup_one_off_tasks, default_title, CadenceRule, EveryDays, LocalizedText, OneOffTask,
        PlanContent, TaskKind, TimeOfDay,
    },
};

pub mod crops;

pub use crops::CropFamily;

/// First and last month (inclusive) of the monsoon window.
pub const MONSOON_MONTHS: std::ops::RangeInclusive<i8> = 6..=9;

/// Inputs to the heuristic builder.
#[derive(Debug, Clone)]
pub struct HeuristicInput<'a> {
    pub crop_type: &'a str,
    pub crop_name: &'a str,
    pub planting_date: Date,
    /// Explicit harvest date; moved to the day after planting when not
    /// strictly later
    pub harvest_override: Option<Date>,
}

/// A milestone task: fires once, `day` days after planting.
struct Milestone {
    day: u32,
    kind: TaskKind,
    title: &'static str,
    notes: &'static str,
    time_of_day: TimeOfDay,
}

const RICE_MILESTONES: &[Milestone] = &[
    Milestone {
        day: 0,
        kind: TaskKind::Fertilizer,
        title: "Basal fertilizer application",
        notes: "Broadcast the basal NPK dose before the final puddling.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 21,
        kind: TaskKind::Fertilizer,
        title: "First nitrogen top-dress",
        notes: "Apply one third of the nitrogen at active tillering. Drain the field first.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 30,
        kind: TaskKind::Pest,
        title: "Install pheromone traps for stem borer",
        notes: "Place 5 traps per acre just above the canopy.",
        time_of_day: TimeOfDay::Evening,
    },
    Milestone {
        day: 45,
        kind: TaskKind::Fertilizer,
        title: "Second nitrogen top-dress",
        notes: "Apply the remaining nitrogen at panicle initiation.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 55,
        kind: TaskKind::Disease,
        title: "Check for blast and sheath blight",
        notes: "Look for spindle-shaped leaf lesions and sheath spots after humid spells.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 75,
        kind: TaskKind::Pest,
        title: "Check for brown planthopper",
        notes: "Tap hills over water and count hoppers at the plant base.",
        time_of_day: TimeOfDay::Afternoon,
    },
    Milestone {
        day: 90,
        kind: TaskKind::Disease,
        title: "Check for false smut at flowering",
        notes: "Inspect panicles for orange spore balls.",
        time_of_day: TimeOfDay::Morning,
    },
];

const WHEAT_MILESTONES: &[Milestone] = &[
    Milestone {
        day: 0,
        kind: TaskKind::Fertilizer,
        title: "Basal fertilizer application",
        notes: "Drill the basal NPK dose with the seed.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 21,
        kind: TaskKind::Watering,
        title: "Crown root initiation irrigation",
        notes: "Apply 50-60 mm of water; this is the most critical irrigation.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 25,
        kind: TaskKind::Fertilizer,
        title: "Nitrogen top-dress",
        notes: "Top-dress half of the nitrogen after the first irrigation.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 35,
        kind: TaskKind::Pest,
        title: "Monitor for aphids",
        notes: "Check 10 tillers at random; act above 5 aphids per tiller.",
        time_of_day: TimeOfDay::Afternoon,
    },
    Milestone {
        day: 42,
        kind: TaskKind::Watering,
        title: "Tillering irrigation",
        notes: "Apply 50 mm of water.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 50,
        kind: TaskKind::Disease,
        title: "Check for yellow rust",
        notes: "Look for yellow stripes of pustules on upper leaves.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 65,
        kind: TaskKind::Watering,
        title: "Jointing irrigation",
        notes: "Apply 50 mm of water.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 85,
        kind: TaskKind::Watering,
        title: "Flowering irrigation",
        notes: "Apply 40-50 mm of water; avoid irrigating in strong wind.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 100,
        kind: TaskKind::Watering,
        title: "Milk stage irrigation",
        notes: "Apply 40 mm of water.",
        time_of_day: TimeOfDay::Morning,
    },
];

const GENERIC_MILESTONES: &[Milestone] = &[
    Milestone {
        day: 20,
        kind: TaskKind::Fertilizer,
        title: "Apply top-dress fertilizer",
        notes: "Side-dress nitrogen along the rows and water it in.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 30,
        kind: TaskKind::Pest,
        title: "Inspect leaves for pests",
        notes: "Check leaf undersides for eggs, aphids and caterpillars.",
        time_of_day: TimeOfDay::Afternoon,
    },
    Milestone {
        day: 45,
        kind: TaskKind::Disease,
        title: "Check for leaf spot and wilt",
        notes: "Remove and destroy plants showing wilt.",
        time_of_day: TimeOfDay::Morning,
    },
    Milestone {
        day: 60,
        kind: TaskKind::Fertilizer,
        title: "Apply second top-dress fertilizer",
        notes: "Use half of the first top-dress rate.",
        time_of_day: TimeOfDay::Morning,
    },
];

/// Builds plan content from the crop-family tables.
pub fn build(input: &HeuristicInput<'_>) -> PlanContent {
    let family = CropFamily::for_crop(input.crop_name, input.crop_type);
    let harvest = harvest_date(input.planting_date, input.harvest_override, family);
    let season = u32::try_from(days_between(input.planting_date, harvest)).unwrap_or(1);
    let monsoon = is_monsoon_planting(input.planting_date);
    debug!(
        "Heuristic plan for '{}': family={family}, season={season}d, monsoon={monsoon}",
        input.crop_name
    );

    let mut recurring_tasks = vec![scouting_rule(season)];
    if monsoon {
        recurring_tasks.push(drainage_rule(season));
    }
    // Seasons shorter than a rule's first occurrence leave nothing to schedule.
    recurring_tasks.retain(|rule| rule.start_day <= rule.end_day);

    let milestones = match family {
        CropFamily::Rice => RICE_MILESTONES,
        CropFamily::Wheat => WHEAT_MILESTONES,
        _ => GENERIC_MILESTONES,
    };
    let watering_rules = if family.uses_milestones() {
        Vec::new()
    } else {
        generic_watering(season, monsoon)
    };

    let mut one_off_tasks: Vec<OneOffTask> = milestones
        .iter()
        .filter(|m| m.day < season)
        .map(|m| milestone_task(input.planting_date, m))
        .collect();
    one_off_tasks.push(harvest_task(harvest));
    dedup_one_off_tasks(&mut one_off_tasks);

    let crop = input.crop_name.trim();
    PlanContent {
        title: LocalizedText::english(default_title(crop)),
        overview: LocalizedText::english(format!(
            "{season}-day schedule for {crop}, planted {} and expected to be harvested {harvest}.",
            input.planting_date
        )),
        expected_harvest_date: harvest,
        watering_rules,
        recurring_tasks,
        one_off_tasks,
    }
}

/// Harvest date for a planting: the override when given (forced after
/// planting), otherwise planting plus the family's maturity length.
pub fn harvest_date(
    planting_date: Date,
    harvest_override: Option<Date>,
    family: CropFamily,
) -> Date {
    match harvest_override {
        Some(date) => clamp_harvest(planting_date, date),
        None => add_days(planting_date, i64::from(family.maturity_days())),
    }
}

/// Moves a harvest date that is not strictly after planting to the next day.
pub fn clamp_harvest(planting_date: Date, harvest: Date) -> Date {
    if harvest > planting_date {
        harvest
    } else {
        add_days(planting_date, 1)
    }
}

/// Whether the planting month falls in the monsoon window.
pub fn is_monsoon_planting(planting_date: Date) -> bool {
    MONSOON_MONTHS.contains(&planting_date.month())
}

fn scouting_rule(season: u32) -> CadenceRule {
    cadence(
        "field-scouting",
        TaskKind::Field,
        "Field scouting walk",
        (7, season),
        EveryDays::Days(7),
        TimeOfDay::Morning,
        "Walk the field in a W pattern and note pests, disease and water stress.",
    )
}

fn drainage_rule(season: u32) -> CadenceRule {
    cadence(
        "drainage-check",
        TaskKind::Field,
        "Check field drainage",
        (5, season),
        EveryDays::Days(5),
        TimeOfDay::Evening,
        "Clear blocked channels so standing water drains within 24 hours.",
    )
}

/// Three-phase watering: establishment, mid-season, pre-harvest taper, then
/// a stop rule covering the final week.
fn generic_watering(season: u32, monsoon: bool) -> Vec<CadenceRule> {
    let mid_notes = if monsoon {
        "Apply 20-25 mm every 2 days. Skip watering if more than 10 mm of rain fell since the last irrigation."
    } else {
        "Apply 20-25 mm every 2 days."
    };

    let phases = [
        cadence(
            "watering-establishment",
            TaskKind::Watering,
            "Water seedlings",
            (0, season.min(14)),
            EveryDays::Days(1),
            TimeOfDay::Morning,
            "Apply 5-8 mm daily to keep the root zone moist.",
        ),
        cadence(
            "watering-mid-season",
            TaskKind::Watering,
            "Mid-season irrigation",
            (15, season.saturating_sub(15)),
            EveryDays::Days(2),
            TimeOfDay::Morning,
            mid_notes,
        ),
        cadence(
            "watering-taper",
            TaskKind::Watering,
            "Pre-harvest light irrigation",
            (season.saturating_sub(14).max(15), season.saturating_sub(7)),
            EveryDays::Days(3),
            TimeOfDay::Morning,
            "Apply 15-20 mm every 3 days to harden the crop before harvest.",
        ),
        cadence(
            "watering-stop",
            TaskKind::Watering,
            "Stop irrigation before harvest",
            (season.saturating_sub(6), season),
            EveryDays::Stop,
            TimeOfDay::Morning,
            "No irrigation during the final week so the field dries for harvest.",
        ),
    ];

    phases
        .into_iter()
        .filter(|rule| rule.start_day <= rule.end_day)
        .collect()
}

fn cadence(
    id: &str,
    kind: TaskKind,
    title: &str,
    (start_day, end_day): (u32, u32),
    every_days: EveryDays,
    time_of_day: TimeOfDay,
    notes: &str,
) -> CadenceRule {
    CadenceRule {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        start_day,
        end_day,
        every_days,
        time_of_day,
        time: None,
        title_i18n: LocalizedText::english(title),
        notes: Some(notes.to_string()),
        notes_i18n: LocalizedText::english(notes),
    }
}

fn milestone_task(planting_date: Date, milestone: &Milestone) -> OneOffTask {
    OneOffTask {
        id: format!("{}-d{}", milestone.kind.as_str(), milestone.day),
        kind: milestone.kind,
        title: milestone.title.to_string(),
        due_date: add_days(planting_date, i64::from(milestone.day)),
        time_of_day: milestone.time_of_day,
        time: None,
        title_i18n: LocalizedText::english(milestone.title),
        notes: Some(milestone.notes.to_string()),
        notes_i18n: LocalizedText::english(milestone.notes),
    }
}

fn harvest_task(harvest: Date) -> OneOffTask {
    let notes = "Harvest at physiological maturity in dry weather and move produce to shade.";
    OneOffTask {
        id: "harvest".to_string(),
        kind: TaskKind::Harvest,
        title: "Harvest".to_string(),
        due_date: harvest,
        time_of_day: TimeOfDay::Morning,
        time: None,
        title_i18n: LocalizedText::english("Harvest"),
        notes: Some(notes.to_string()),
        notes_i18n: LocalizedText::english(notes),
    }
}
