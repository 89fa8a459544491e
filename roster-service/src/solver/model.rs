use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::domain::entities::{
    minute_of_day, EmployeeKind, SolverSettings, MINUTES_PER_DAY,
};

use super::coverage::{SlotCoverage, SlotId, SLOT_MINUTES};
use super::normalizer::NormalizedInputs;

/// Minimum rest between two shifts of one member; an algorithm constant.
pub const MIN_REST_MINUTES: u32 = 8 * 60;

/// Pattern data the evaluator touches, indexed densely.
#[derive(Debug, Clone)]
pub struct PatternCtx {
    pub id: i64,
    pub name: String,
    pub start_minute: u32,
    pub span_minutes: u32,
    pub work_minutes: i32,
    pub max_headcount: Option<i32>,
}

/// Member data the evaluator touches, indexed densely.
#[derive(Debug, Clone)]
pub struct MemberCtx {
    pub id: i64,
    pub name: String,
    pub kind: EmployeeKind,
    pub min_monthly_days_off: i32,
    pub max_consecutive_work_days: Option<usize>,
    pub enforce_exact_holidays: bool,
    /// Weekday allowlist mask, bit 0 = Monday; `None` means unrestricted.
    pub allowed_weekdays: Option<u8>,
    /// Base reward for every shift this member takes.
    pub priority_reward: i64,
    /// Preference reward per pattern index.
    pub preference_bonus: Vec<i64>,
}

/// Decision domain of one (member, day) cell. A cell holds at most one
/// pattern, which is the at-most-one-shift-per-day rule by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Fixed assignment: the member takes exactly this pattern.
    Pinned(usize),
    /// Approved leave, designated holiday, paid leave or other assignment.
    Blocked,
    /// Free decision over the admissible pattern indices.
    Open(Vec<usize>),
}

/// Headcount bounds applying to one 30-minute slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotRule {
    pub min_headcount: i32,
    pub max_headcount: Option<i32>,
}

/// Penalty and bonus weights lifted out of the settings record.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub headcount: i64,
    pub unavailable_day: i64,
    pub incompatible: i64,
    pub holiday_violation: i64,
    pub consecutive_work: i64,
    pub salary_too_low: i64,
    pub salary_too_high: i64,
    pub work_day_deviation: i64,
    pub pairing: i64,
}

impl Weights {
    fn from_settings(settings: &SolverSettings) -> Self {
        Self {
            headcount: settings.headcount_penalty_cost,
            unavailable_day: settings.unavailable_day_penalty,
            incompatible: settings.incompatible_penalty,
            holiday_violation: settings.holiday_violation_penalty,
            consecutive_work: settings.consecutive_work_violation_penalty,
            salary_too_low: settings.salary_too_low_penalty,
            salary_too_high: settings.salary_too_high_penalty,
            work_day_deviation: settings.work_day_deviation_penalty,
            pairing: settings.pairing_bonus,
        }
    }
}

/// The complete decision model for one solve: cell domains, hard constraint
/// tables, soft-constraint weights and reward terms, all over dense indices.
#[derive(Debug, Clone)]
pub struct RosterModel {
    pub department_id: i64,
    pub days: Vec<NaiveDate>,
    pub members: Vec<MemberCtx>,
    pub patterns: Vec<PatternCtx>,
    cells: Vec<Cell>,
    pub coverage: SlotCoverage,
    /// Resolved headcount rule per grid slot (00:00-based 30-minute grid).
    pub slot_rules: BTreeMap<SlotId, SlotRule>,
    /// Flattened [p1][p2] table: p2 on the next civil day starts less than
    /// MIN_REST after p1 ends.
    rest_conflict: Vec<bool>,
    /// (day index, pattern index) -> (min, max) headcount for that date.
    pub specific_pattern_bounds: BTreeMap<(usize, usize), (i32, Option<i32>)>,
    /// (group name, member indices) per incompatible group.
    pub incompatible_groups: Vec<(String, Vec<usize>)>,
    pub pairing_groups: Vec<Vec<usize>>,
    /// Difficulty bonus per day index.
    pub day_reward: Vec<i64>,
    /// Weekday bit per day index, bit 0 = Monday.
    pub weekday_bits: Vec<u8>,
    pub weights: Weights,
    /// Mutually unsatisfiable hard constraints found while building, e.g. a
    /// fixed assignment on an approved leave day. Non-empty means no
    /// feasible solution exists.
    pub contradictions: Vec<String>,
}

impl RosterModel {
    pub fn build(inputs: &NormalizedInputs) -> RosterModel {
        let n_days = inputs.days.len();
        let n_patterns = inputs.patterns.len();

        let patterns: Vec<PatternCtx> = inputs
            .patterns
            .iter()
            .map(|p| PatternCtx {
                id: p.id,
                name: p.pattern_name.clone(),
                start_minute: p.start_minute(),
                span_minutes: p.span_minutes(),
                work_minutes: inputs.work_minutes[&p.id],
                max_headcount: p.max_headcount,
            })
            .collect();

        let pattern_index: HashMap<i64, usize> = inputs
            .patterns
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();
        let member_index: HashMap<i64, usize> = inputs
            .members
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.id, idx))
            .collect();

        let weekday_bits: Vec<u8> = inputs
            .days
            .iter()
            .map(|d| 1u8 << d.weekday().num_days_from_monday())
            .collect();

        let mut contradictions = Vec::new();

        // Fixed assignments keyed by (member, day); two different patterns
        // pinned to the same cell can never both hold.
        let mut pinned: HashMap<(i64, NaiveDate), usize> = HashMap::new();
        for fixed in &inputs.fixed_assignments {
            let pattern_idx = pattern_index[&fixed.shift_pattern_id];
            match pinned.insert((fixed.member_id, fixed.shift_date), pattern_idx) {
                Some(previous) if previous != pattern_idx => {
                    contradictions.push(format!(
                        "member {} has two fixed assignments on {}",
                        fixed.member_id, fixed.shift_date
                    ));
                }
                _ => {}
            }
        }

        let members: Vec<MemberCtx> = inputs
            .members
            .iter()
            .map(|m| {
                let allowed_weekdays = inputs.allowed_weekdays[&m.id];
                let allowed_days = inputs
                    .days
                    .iter()
                    .enumerate()
                    .filter(|&(day_idx, &date)| {
                        !inputs.is_absent(m.id, date)
                            && allowed_weekdays
                                .map_or(true, |mask| mask & weekday_bits[day_idx] != 0)
                    })
                    .count() as i64;
                let allowed_patterns = inputs
                    .preferred_patterns
                    .get(&m.id)
                    .map_or(n_patterns, |set| set.len())
                    as i64;
                let possible_shifts = allowed_days * allowed_patterns;
                let priority_reward =
                    (10_000 / (possible_shifts + 1)) * (100 - m.priority_score as i64);

                let preference_bonus = inputs
                    .patterns
                    .iter()
                    .map(|p| {
                        let priority = inputs
                            .priority_map
                            .get(&(m.id, p.id))
                            .copied()
                            .unwrap_or(100);
                        (100 - priority as i64) * inputs.settings.shift_preference_bonus
                    })
                    .collect();

                MemberCtx {
                    id: m.id,
                    name: m.name.clone(),
                    kind: m.kind(),
                    min_monthly_days_off: m.min_monthly_days_off,
                    max_consecutive_work_days: m
                        .max_consecutive_work_days
                        .map(|k| k.max(0) as usize),
                    enforce_exact_holidays: m.enforce_exact_holidays,
                    allowed_weekdays,
                    priority_reward,
                    preference_bonus,
                }
            })
            .collect();

        let mut cells = Vec::with_capacity(inputs.members.len() * n_days);
        for m in &inputs.members {
            let daily_cap_minutes = m.max_hours_per_day * 60;
            let preferred = inputs.preferred_patterns.get(&m.id);
            for &date in &inputs.days {
                let blocked = inputs.is_absent(m.id, date)
                    || inputs
                        .other_assignment_dates
                        .get(&m.id)
                        .is_some_and(|dates| dates.contains(&date));
                let cell = if let Some(&pattern_idx) = pinned.get(&(m.id, date)) {
                    if blocked {
                        contradictions.push(format!(
                            "member {} has a fixed assignment on blocked day {}",
                            m.id, date
                        ));
                    }
                    if patterns[pattern_idx].work_minutes > daily_cap_minutes {
                        contradictions.push(format!(
                            "fixed assignment for member {} on {} exceeds the daily hour cap",
                            m.id, date
                        ));
                    }
                    // A pin beats the preference allowlist.
                    Cell::Pinned(pattern_idx)
                } else if blocked {
                    Cell::Blocked
                } else {
                    let admissible: Vec<usize> = (0..n_patterns)
                        .filter(|&p_idx| {
                            preferred.map_or(true, |set| set.contains(&patterns[p_idx].id))
                                && patterns[p_idx].work_minutes <= daily_cap_minutes
                        })
                        .collect();
                    Cell::Open(admissible)
                };
                cells.push(cell);
            }
        }

        let slot_rules = resolve_slot_rules(inputs);

        let mut rest_conflict = vec![false; patterns.len() * patterns.len()];
        for (i1, p1) in patterns.iter().enumerate() {
            let end1 = p1.start_minute + p1.span_minutes;
            for (i2, p2) in patterns.iter().enumerate() {
                let next_day_start = MINUTES_PER_DAY + p2.start_minute;
                if next_day_start < end1 + MIN_REST_MINUTES {
                    rest_conflict[i1 * patterns.len() + i2] = true;
                }
            }
        }

        let mut specific_pattern_bounds: BTreeMap<(usize, usize), (i32, Option<i32>)> =
            BTreeMap::new();
        let day_index: HashMap<NaiveDate, usize> = inputs
            .days
            .iter()
            .enumerate()
            .map(|(idx, &d)| (d, idx))
            .collect();
        for req in &inputs.specific_date_requirements {
            let key = (day_index[&req.date], pattern_index[&req.shift_pattern_id]);
            let entry = specific_pattern_bounds
                .entry(key)
                .or_insert((0, None));
            entry.0 = entry.0.max(req.min_headcount);
            entry.1 = match (entry.1, req.max_headcount) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
        }

        let incompatible_groups = inputs
            .incompatible_groups
            .iter()
            .map(|(name, ids)| {
                (
                    name.clone(),
                    ids.iter().map(|id| member_index[id]).collect(),
                )
            })
            .collect();
        let pairing_groups = inputs
            .pairing_groups
            .iter()
            .map(|ids| ids.iter().map(|id| member_index[id]).collect())
            .collect();

        let day_reward = inputs
            .days
            .iter()
            .map(|d| {
                inputs.day_difficulty.get(d).copied().unwrap_or(0)
                    * inputs.settings.difficulty_bonus_weight
            })
            .collect();

        RosterModel {
            department_id: inputs.department_id,
            days: inputs.days.clone(),
            members,
            patterns,
            cells,
            coverage: SlotCoverage::build(inputs),
            slot_rules,
            rest_conflict,
            specific_pattern_bounds,
            incompatible_groups,
            pairing_groups,
            day_reward,
            weekday_bits,
            weights: Weights::from_settings(&inputs.settings),
            contradictions,
        }
    }

    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    pub fn n_days(&self) -> usize {
        self.days.len()
    }

    pub fn n_patterns(&self) -> usize {
        self.patterns.len()
    }

    pub fn cell(&self, member_idx: usize, day_idx: usize) -> &Cell {
        &self.cells[member_idx * self.n_days() + day_idx]
    }

    /// True when p2 on the civil day after p1 would break the rest minimum.
    pub fn rest_conflict(&self, p1: usize, p2: usize) -> bool {
        self.rest_conflict[p1 * self.patterns.len() + p2]
    }

    /// True when working this day violates the member's weekday allowlist.
    pub fn weekday_disallowed(&self, member_idx: usize, day_idx: usize) -> bool {
        self.members[member_idx]
            .allowed_weekdays
            .is_some_and(|mask| mask & self.weekday_bits[day_idx] == 0)
    }
}

/// Resolve the headcount rule for every 30-minute grid slot. Dates carrying
/// specific time-slot requirements use only those; all other dates fall back
/// to the weekday-based rules. The first matching rule wins.
fn resolve_slot_rules(inputs: &NormalizedInputs) -> BTreeMap<SlotId, SlotRule> {
    let mut rules = BTreeMap::new();
    for (day_idx, &date) in inputs.days.iter().enumerate() {
        let weekday_bit = 1u8 << date.weekday().num_days_from_monday();

        let intervals: Vec<(u32, u32, i32, Option<i32>)> =
            if inputs.dates_with_specific_requirements.contains(&date) {
                inputs
                    .specific_timeslot_requirements
                    .iter()
                    .filter(|req| req.date == date)
                    .map(|req| {
                        (
                            minute_of_day(req.start_time),
                            minute_of_day(req.end_time),
                            req.min_headcount,
                            req.max_headcount,
                        )
                    })
                    .collect()
            } else {
                inputs
                    .timeslot_requirements
                    .iter()
                    .filter(|req| {
                        inputs
                            .day_group_masks
                            .get(&req.day_group_id)
                            .is_some_and(|mask| mask & weekday_bit != 0)
                    })
                    .map(|req| {
                        (
                            minute_of_day(req.start_time),
                            minute_of_day(req.end_time),
                            req.min_headcount,
                            req.max_headcount,
                        )
                    })
                    .collect()
            };

        if intervals.is_empty() {
            continue;
        }
        for minute in (0..MINUTES_PER_DAY).step_by(SLOT_MINUTES as usize) {
            if let Some(&(_, _, min_hc, max_hc)) = intervals
                .iter()
                .find(|&&(start, end, _, _)| start <= minute && minute < end)
            {
                rules.insert(
                    SlotId { day_idx, minute },
                    SlotRule {
                        min_headcount: min_hc,
                        max_headcount: max_hc,
                    },
                );
            }
        }
    }
    rules
}
