use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::coverage::SlotId;
use super::evaluate::{Roster, ScoreBreakdown};
use super::model::{Cell, RosterModel};

const INITIAL_TEMPERATURE: f64 = 10_000.0;
const COOLING_FACTOR: f64 = 0.999_95;
const MIN_TEMPERATURE: f64 = 1.0;
const SWAP_MOVE_PROBABILITY: f64 = 0.3;

/// Engine tuning. The wall-clock limit is the primary termination signal;
/// the step cap exists for reproducible runs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub time_limit: Duration,
    pub max_steps: Option<u64>,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs_f64(15.0),
            max_steps: None,
            seed: 2_718_281,
        }
    }
}

/// Cooperative cancellation flag shared with the caller. When signalled the
/// engine stops after the current step and returns its best solution so far.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// No hard constraint is violated.
    Feasible,
    /// The search ended without reaching a hard-violation-free roster.
    Infeasible,
}

#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub roster: Roster,
    pub breakdown: ScoreBreakdown,
    pub status: SolveStatus,
    pub steps: u64,
}

/// Two-phase search: a deterministic greedy construction seeds the roster,
/// simulated annealing over change and swap moves improves it until the
/// time limit, step cap or cancel handle fires.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, model: &RosterModel, cancel: &CancelHandle) -> EngineOutcome {
        let deadline = Instant::now() + self.config.time_limit;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut roster = construct(model);
        let mut current = model.evaluate(&roster);
        let mut best_roster = roster.clone();
        let mut best = current.clone();

        let open_cells: Vec<(usize, usize)> = (0..model.n_members())
            .flat_map(|m| (0..model.n_days()).map(move |d| (m, d)))
            .filter(|&(m, d)| matches!(model.cell(m, d), Cell::Open(domain) if !domain.is_empty()))
            .collect();

        let mut open_by_day: Vec<Vec<usize>> = vec![Vec::new(); model.n_days()];
        for &(m, d) in &open_cells {
            open_by_day[d].push(m);
        }

        let mut steps = 0u64;
        let mut temperature = INITIAL_TEMPERATURE;

        if !open_cells.is_empty() {
            loop {
                if cancel.is_cancelled() || Instant::now() >= deadline {
                    break;
                }
                if self.config.max_steps.is_some_and(|limit| steps >= limit) {
                    break;
                }
                steps += 1;

                let applied = if rng.gen_bool(SWAP_MOVE_PROBABILITY) {
                    propose_swap(model, &mut roster, &open_by_day, &mut rng)
                } else {
                    propose_change(model, &mut roster, &open_cells, &mut rng)
                };
                let Some(undo) = applied else { continue };

                let candidate = model.evaluate(&roster);
                let delta = candidate.score.combined() - current.score.combined();
                let accept = delta >= 0.0 || rng.gen::<f64>() < (delta / temperature).exp();
                if accept {
                    current = candidate;
                    if current.score > best.score {
                        best = current.clone();
                        best_roster = roster.clone();
                    }
                } else {
                    undo.revert(&mut roster);
                }

                temperature = (temperature * COOLING_FACTOR).max(MIN_TEMPERATURE);
            }
        }

        let status = if best.score.is_feasible() {
            SolveStatus::Feasible
        } else {
            SolveStatus::Infeasible
        };
        tracing::debug!(steps, score = %best.score, ?status, "roster search finished");

        EngineOutcome {
            roster: best_roster,
            breakdown: best,
            status,
            steps,
        }
    }
}

/// Inverse of one applied move.
enum Undo {
    Change {
        member: usize,
        day: usize,
        previous: Option<usize>,
    },
    Swap {
        day: usize,
        first: usize,
        second: usize,
        first_previous: Option<usize>,
        second_previous: Option<usize>,
    },
}

impl Undo {
    fn revert(&self, roster: &mut Roster) {
        match *self {
            Undo::Change {
                member,
                day,
                previous,
            } => roster.set(member, day, previous),
            Undo::Swap {
                day,
                first,
                second,
                first_previous,
                second_previous,
            } => {
                roster.set(first, day, first_previous);
                roster.set(second, day, second_previous);
            }
        }
    }
}

fn domain_of<'a>(model: &'a RosterModel, member: usize, day: usize) -> &'a [usize] {
    match model.cell(member, day) {
        Cell::Open(domain) => domain,
        _ => &[],
    }
}

/// Re-decide one open cell: clear it or move it to another admissible
/// pattern.
fn propose_change(
    model: &RosterModel,
    roster: &mut Roster,
    open_cells: &[(usize, usize)],
    rng: &mut StdRng,
) -> Option<Undo> {
    let (member, day) = open_cells[rng.gen_range(0..open_cells.len())];
    let domain = domain_of(model, member, day);
    let previous = roster.get(member, day);

    // Index 0 clears the cell; the rest pick a domain pattern.
    let choice = rng.gen_range(0..=domain.len());
    let next = if choice == 0 { None } else { Some(domain[choice - 1]) };
    if next == previous {
        return None;
    }
    roster.set(member, day, next);
    Some(Undo::Change {
        member,
        day,
        previous,
    })
}

/// Exchange the values of two open cells on the same day when each value is
/// admissible for the other member.
fn propose_swap(
    model: &RosterModel,
    roster: &mut Roster,
    open_by_day: &[Vec<usize>],
    rng: &mut StdRng,
) -> Option<Undo> {
    let day = rng.gen_range(0..open_by_day.len());
    let members = &open_by_day[day];
    if members.len() < 2 {
        return None;
    }
    let first = members[rng.gen_range(0..members.len())];
    let second = members[rng.gen_range(0..members.len())];
    if first == second {
        return None;
    }

    let first_previous = roster.get(first, day);
    let second_previous = roster.get(second, day);
    if first_previous == second_previous {
        return None;
    }
    let admissible = |member: usize, value: Option<usize>| {
        value.map_or(true, |p| domain_of(model, member, day).contains(&p))
    };
    if !admissible(first, second_previous) || !admissible(second, first_previous) {
        return None;
    }

    roster.set(first, day, second_previous);
    roster.set(second, day, first_previous);
    Some(Undo::Swap {
        day,
        first,
        second,
        first_previous,
        second_previous,
    })
}

/// Greedy construction: meet specific-date pattern minimums first, then fill
/// slot minimums in time order, always picking the highest-reward candidate
/// that keeps the roster free of hard violations.
fn construct(model: &RosterModel) -> Roster {
    let n_days = model.n_days();
    let n_patterns = model.n_patterns();

    let mut roster = Roster::initial(model);
    let mut slot_counts: HashMap<SlotId, i32> = model.coverage.fixed_cov.clone();
    let mut pattern_day_counts = vec![0i32; n_days * n_patterns];
    for m in 0..model.n_members() {
        for d in 0..n_days {
            if let Some(p) = roster.get(m, d) {
                pattern_day_counts[d * n_patterns + p] += 1;
            }
        }
    }

    let bounds: Vec<((usize, usize), i32)> = model
        .specific_pattern_bounds
        .iter()
        .map(|(&key, &(min, _))| (key, min))
        .collect();
    for ((day, pattern), min) in bounds {
        while pattern_day_counts[day * n_patterns + pattern] < min {
            let candidate = (0..model.n_members())
                .filter(|&m| {
                    roster.get(m, day).is_none()
                        && domain_of(model, m, day).contains(&pattern)
                        && placement_ok(
                            model,
                            &roster,
                            &slot_counts,
                            &pattern_day_counts,
                            m,
                            day,
                            pattern,
                        )
                })
                .max_by_key(|&m| candidate_reward(model, m, day, pattern));
            let Some(member) = candidate else { break };
            place(
                model,
                &mut roster,
                &mut slot_counts,
                &mut pattern_day_counts,
                member,
                day,
                pattern,
            );
        }
    }

    let rule_slots: Vec<(SlotId, i32)> = model
        .slot_rules
        .iter()
        .map(|(&slot, rule)| (slot, rule.min_headcount))
        .collect();
    for (slot, min_headcount) in rule_slots {
        while slot_counts.get(&slot).copied().unwrap_or(0) < min_headcount {
            let candidate = model
                .coverage
                .variable_cov
                .get(&slot)
                .into_iter()
                .flatten()
                .filter(|c| {
                    roster.get(c.member_idx, c.day_idx).is_none()
                        && domain_of(model, c.member_idx, c.day_idx).contains(&c.pattern_idx)
                        && placement_ok(
                            model,
                            &roster,
                            &slot_counts,
                            &pattern_day_counts,
                            c.member_idx,
                            c.day_idx,
                            c.pattern_idx,
                        )
                })
                .max_by_key(|c| candidate_reward(model, c.member_idx, c.day_idx, c.pattern_idx))
                .copied();
            let Some(c) = candidate else { break };
            place(
                model,
                &mut roster,
                &mut slot_counts,
                &mut pattern_day_counts,
                c.member_idx,
                c.day_idx,
                c.pattern_idx,
            );
        }
    }

    roster
}

fn candidate_reward(model: &RosterModel, member: usize, day: usize, pattern: usize) -> i64 {
    let mut reward = model.members[member].priority_reward
        + model.day_reward[day]
        + model.members[member].preference_bonus[pattern];
    if model.weekday_disallowed(member, day) {
        reward -= model.weights.unavailable_day;
    }
    reward
}

/// Would assigning the pattern keep every hard constraint intact?
fn placement_ok(
    model: &RosterModel,
    roster: &Roster,
    slot_counts: &HashMap<SlotId, i32>,
    pattern_day_counts: &[i32],
    member: usize,
    day: usize,
    pattern: usize,
) -> bool {
    let count = pattern_day_counts[day * model.n_patterns() + pattern];
    if let Some(max) = model.patterns[pattern].max_headcount {
        if count >= max {
            return false;
        }
    }
    if let Some(&(_, Some(max))) = model.specific_pattern_bounds.get(&(day, pattern)) {
        if count >= max {
            return false;
        }
    }
    for slot in model.coverage.slots_for(day, pattern) {
        if let Some(rule) = model.slot_rules.get(&slot) {
            if let Some(max) = rule.max_headcount {
                if slot_counts.get(&slot).copied().unwrap_or(0) >= max {
                    return false;
                }
            }
        }
    }
    if day > 0 {
        if let Some(previous) = roster.get(member, day - 1) {
            if model.rest_conflict(previous, pattern) {
                return false;
            }
        }
    }
    if day + 1 < model.n_days() {
        if let Some(next) = roster.get(member, day + 1) {
            if model.rest_conflict(pattern, next) {
                return false;
            }
        }
    }
    true
}

fn place(
    model: &RosterModel,
    roster: &mut Roster,
    slot_counts: &mut HashMap<SlotId, i32>,
    pattern_day_counts: &mut [i32],
    member: usize,
    day: usize,
    pattern: usize,
) {
    roster.set(member, day, Some(pattern));
    pattern_day_counts[day * model.n_patterns() + pattern] += 1;
    for slot in model.coverage.slots_for(day, pattern) {
        *slot_counts.entry(slot).or_insert(0) += 1;
    }
}
