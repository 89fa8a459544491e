use std::collections::BTreeMap;

use super::evaluate::ScoreBreakdown;
use super::model::RosterModel;

/// Key for violations not tied to any date, i.e. an infeasible solve.
pub const GENERAL_KEY: &str = "general";

/// Message emitted when no feasible roster was found. Part of the external
/// contract; keep stable.
pub const INFEASIBLE_MESSAGE: &str =
    "no solution found within time limit; constraints may be too tight";

/// Walk the soft-slack breakdown of an accepted solution and emit the
/// per-date warning list. Slot, weekday, incompatibility and
/// consecutive-work findings key to the violation's date; month-global
/// findings (holiday count, salary band) key to the first day of the range
/// with the member named in the text. The work-day deviation slack is a
/// balancing term and is not reported.
pub fn extract(model: &RosterModel, breakdown: &ScoreBreakdown) -> BTreeMap<String, Vec<String>> {
    let mut days: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut push = |date: String, message: String| days.entry(date).or_default().push(message);

    for shortfall in &breakdown.slot_shortfalls {
        push(
            model.days[shortfall.slot.day_idx].to_string(),
            format!(
                "time slot {:02}:{:02}: staffing short by {} (required {})",
                shortfall.slot.minute / 60,
                shortfall.slot.minute % 60,
                shortfall.shortfall,
                shortfall.required
            ),
        );
    }

    for &(member, day) in &breakdown.unavailable_days {
        push(
            model.days[day].to_string(),
            format!(
                "{} is assigned on a disallowed weekday",
                model.members[member].name
            ),
        );
    }

    for overlap in &breakdown.incompatible_overlaps {
        push(
            model.days[overlap.slot.day_idx].to_string(),
            format!(
                "members of '{}' overlap during the {:02}:{:02} time slot",
                model.incompatible_groups[overlap.group_idx].0,
                overlap.slot.minute / 60,
                overlap.slot.minute % 60
            ),
        );
    }

    for &(member, window_start) in &breakdown.consecutive_violations {
        let limit = model.members[member]
            .max_consecutive_work_days
            .unwrap_or_default();
        push(
            model.days[window_start].to_string(),
            format!(
                "{} works more than {} consecutive days",
                model.members[member].name, limit
            ),
        );
    }

    let range_start = model.days[0].to_string();
    for &(member, surplus) in &breakdown.workday_surpluses {
        push(
            range_start.clone(),
            format!(
                "{} is scheduled {} working day(s) over the monthly limit",
                model.members[member].name, surplus
            ),
        );
    }
    for &(member, amount) in &breakdown.salary_shortfalls {
        push(
            range_start.clone(),
            format!(
                "{} earnings fall {} below the minimum target",
                model.members[member].name, amount
            ),
        );
    }
    for &(member, amount) in &breakdown.salary_surpluses {
        push(
            range_start.clone(),
            format!(
                "{} earnings exceed the maximum target by {}",
                model.members[member].name, amount
            ),
        );
    }

    days
}
