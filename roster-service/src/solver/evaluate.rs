use std::collections::{BTreeMap, HashMap};

use crate::domain::entities::{Assignment, EmployeeKind};

use super::coverage::SlotId;
use super::model::{Cell, RosterModel};
use super::score::HardSoftScore;

/// Candidate solution: at most one pattern index per (member, day) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    cells: Vec<Option<usize>>,
    n_days: usize,
}

impl Roster {
    /// Roster with every pinned cell filled and everything else empty.
    pub fn initial(model: &RosterModel) -> Self {
        let n_days = model.n_days();
        let mut cells = vec![None; model.n_members() * n_days];
        for m in 0..model.n_members() {
            for d in 0..n_days {
                if let Cell::Pinned(p) = model.cell(m, d) {
                    cells[m * n_days + d] = Some(*p);
                }
            }
        }
        Self { cells, n_days }
    }

    pub fn get(&self, member_idx: usize, day_idx: usize) -> Option<usize> {
        self.cells[member_idx * self.n_days + day_idx]
    }

    pub fn set(&mut self, member_idx: usize, day_idx: usize, value: Option<usize>) {
        self.cells[member_idx * self.n_days + day_idx] = value;
    }

    /// Materialize the assignment rows, ordered by date then member.
    pub fn to_assignments(&self, model: &RosterModel) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        for m in 0..model.n_members() {
            for d in 0..model.n_days() {
                if let Some(p) = self.get(m, d) {
                    assignments.push(Assignment {
                        member_id: model.members[m].id,
                        shift_pattern_id: model.patterns[p].id,
                        shift_date: model.days[d],
                    });
                }
            }
        }
        assignments.sort_by_key(|a| (a.shift_date, a.member_id));
        assignments
    }
}

/// Coverage shortfall against a slot rule's minimum headcount.
#[derive(Debug, Clone, Copy)]
pub struct SlotShortfall {
    pub slot: SlotId,
    pub shortfall: i32,
    pub required: i32,
}

/// Members of one incompatible group sharing a slot.
#[derive(Debug, Clone, Copy)]
pub struct IncompatibleOverlap {
    pub group_idx: usize,
    pub slot: SlotId,
    pub excess: i32,
}

/// Full evaluation of a candidate roster: the two-level score plus the
/// slack values behind every soft penalty, in the shape the diagnostic
/// extractor consumes.
#[derive(Debug, Clone, Default)]
pub struct ScoreBreakdown {
    pub score: HardSoftScore,
    pub rewards: i64,
    pub penalties: i64,
    pub slot_shortfalls: Vec<SlotShortfall>,
    /// (member index, day index) of working days on disallowed weekdays.
    pub unavailable_days: Vec<(usize, usize)>,
    pub incompatible_overlaps: Vec<IncompatibleOverlap>,
    /// (member index, working days beyond the monthly cap).
    pub workday_surpluses: Vec<(usize, i32)>,
    /// (member index, first day index of the violating window).
    pub consecutive_violations: Vec<(usize, usize)>,
    /// (member index, earnings below the minimum target).
    pub salary_shortfalls: Vec<(usize, i64)>,
    /// (member index, earnings above the maximum target).
    pub salary_surpluses: Vec<(usize, i64)>,
    /// Summed absolute work-day deviation; objective-only, not reported.
    pub workday_deviation_total: i64,
}

impl RosterModel {
    /// Score a complete roster. Hard violation amounts land negated on the
    /// hard level; the soft level is rewards minus weighted slack.
    pub fn evaluate(&self, roster: &Roster) -> ScoreBreakdown {
        let n_days = self.n_days();
        let n_members = self.n_members();
        let n_patterns = self.n_patterns();

        let mut breakdown = ScoreBreakdown::default();
        let mut rewards = 0i64;
        let mut penalties = 0i64;
        let mut hard = 0i64;

        // Variable slot coverage; pre-placed shifts arrive through the
        // fixed baseline instead.
        let mut slot_counts: HashMap<SlotId, i32> = HashMap::new();
        let mut pattern_day_counts = vec![0i32; n_days * n_patterns];
        let mut work_days = vec![0i64; n_members];

        for m in 0..n_members {
            for d in 0..n_days {
                let Some(p) = roster.get(m, d) else { continue };
                work_days[m] += 1;
                rewards += self.members[m].priority_reward
                    + self.day_reward[d]
                    + self.members[m].preference_bonus[p];
                pattern_day_counts[d * n_patterns + p] += 1;
                if !matches!(self.cell(m, d), Cell::Pinned(_)) {
                    for slot in self.coverage.slots_for(d, p) {
                        *slot_counts.entry(slot).or_insert(0) += 1;
                    }
                }
                if self.weekday_disallowed(m, d) {
                    penalties += self.weights.unavailable_day;
                    breakdown.unavailable_days.push((m, d));
                }
            }
        }

        // Per-pattern per-day maximum headcount.
        for d in 0..n_days {
            for p in 0..n_patterns {
                if let Some(max) = self.patterns[p].max_headcount {
                    let count = pattern_day_counts[d * n_patterns + p];
                    if count > max {
                        hard += (count - max) as i64;
                    }
                }
            }
        }

        // Specific-date pattern bounds.
        for (&(d, p), &(min, max)) in &self.specific_pattern_bounds {
            let count = pattern_day_counts[d * n_patterns + p];
            if count < min {
                hard += (min - count) as i64;
            }
            if let Some(max) = max {
                if count > max {
                    hard += (count - max) as i64;
                }
            }
        }

        // Inter-shift rest across consecutive days.
        for m in 0..n_members {
            for d in 0..n_days.saturating_sub(1) {
                if let (Some(p1), Some(p2)) = (roster.get(m, d), roster.get(m, d + 1)) {
                    if self.rest_conflict(p1, p2) {
                        hard += 1;
                    }
                }
            }
        }

        // Slot coverage against the resolved rules.
        for (&slot, rule) in &self.slot_rules {
            let total = slot_counts.get(&slot).copied().unwrap_or(0)
                + self.coverage.fixed_cov.get(&slot).copied().unwrap_or(0);
            if total < rule.min_headcount {
                let shortfall = rule.min_headcount - total;
                penalties += shortfall as i64 * self.weights.headcount;
                breakdown.slot_shortfalls.push(SlotShortfall {
                    slot,
                    shortfall,
                    required: rule.min_headcount,
                });
            }
            if let Some(max) = rule.max_headcount {
                if total > max {
                    hard += (total - max) as i64;
                }
            }
        }

        // Incompatible groups may not share a slot.
        for (group_idx, (_, group)) in self.incompatible_groups.iter().enumerate() {
            let mut counts: BTreeMap<SlotId, i32> = BTreeMap::new();
            for &m in group {
                for d in 0..n_days {
                    if let Some(p) = roster.get(m, d) {
                        for slot in self.coverage.slots_for(d, p) {
                            *counts.entry(slot).or_insert(0) += 1;
                        }
                    }
                }
            }
            for (&slot, &count) in &counts {
                if count > 1 {
                    let excess = count - 1;
                    penalties += excess as i64 * self.weights.incompatible;
                    breakdown.incompatible_overlaps.push(IncompatibleOverlap {
                        group_idx,
                        slot,
                        excess,
                    });
                }
            }
        }

        // Monthly working-day cap; one-sided, scaled when the holiday count
        // is marked exact.
        for m in 0..n_members {
            let cap = n_days as i64 - self.members[m].min_monthly_days_off as i64;
            if cap < 0 {
                continue;
            }
            let surplus = work_days[m] - cap;
            if surplus > 0 {
                let scale = if self.members[m].enforce_exact_holidays {
                    1000
                } else {
                    1
                };
                penalties += surplus * self.weights.holiday_violation * scale;
                breakdown.workday_surpluses.push((m, surplus as i32));
            }
        }

        // Consecutive-work windows.
        for m in 0..n_members {
            if let Some(k) = self.members[m].max_consecutive_work_days {
                if n_days > k {
                    for start in 0..(n_days - k) {
                        if (start..=start + k).all(|d| roster.get(m, d).is_some()) {
                            penalties += self.weights.consecutive_work;
                            breakdown.consecutive_violations.push((m, start));
                        }
                    }
                }
            }
        }

        // Monthly salary band for hourly members.
        for m in 0..n_members {
            let EmployeeKind::Hourly {
                wage,
                min_monthly,
                max_monthly,
            } = &self.members[m].kind
            else {
                continue;
            };
            let mut earnings = 0i64;
            for d in 0..n_days {
                if let Some(p) = roster.get(m, d) {
                    earnings += self.patterns[p].work_minutes as i64 * *wage as i64 / 60;
                }
            }
            if let Some(min) = min_monthly {
                if earnings < *min as i64 {
                    let shortfall = *min as i64 - earnings;
                    penalties += shortfall * self.weights.salary_too_low;
                    breakdown.salary_shortfalls.push((m, shortfall));
                }
            }
            if let Some(max) = max_monthly {
                if earnings > *max as i64 {
                    let surplus = earnings - *max as i64;
                    penalties += surplus * self.weights.salary_too_high;
                    breakdown.salary_surpluses.push((m, surplus));
                }
            }
        }

        // Work-day balance across the roster.
        let total_work_days: i64 = work_days.iter().sum();
        for m in 0..n_members {
            let deviation = (n_members as i64 * work_days[m] - total_work_days).abs();
            if deviation != 0 {
                penalties += deviation * self.weights.work_day_deviation;
                breakdown.workday_deviation_total += deviation;
            }
        }

        // Pairing groups earn a bonus per pair on the same (day, pattern).
        for group in &self.pairing_groups {
            for d in 0..n_days {
                let mut per_pattern = vec![0i64; n_patterns];
                for &m in group {
                    if let Some(p) = roster.get(m, d) {
                        per_pattern[p] += 1;
                    }
                }
                for &count in &per_pattern {
                    if count > 1 {
                        rewards += count * (count - 1) / 2 * self.weights.pairing;
                    }
                }
            }
        }

        breakdown.rewards = rewards;
        breakdown.penalties = penalties;
        breakdown.score = HardSoftScore::new(-hard, rewards - penalties);
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::testutil::{
        day_group_all, fixture, member, pattern, specific_date_req, timeslot_req, Fixture,
    };
    use chrono::NaiveDate;
    use shared::RelationshipRule;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn two_member_fixture() -> Fixture {
        let mut fx = fixture(date(1), date(3));
        fx.inputs.members.push(member(1));
        fx.inputs.members.push(member(2));
        fx.inputs.patterns.push(pattern(1, (9, 0), (17, 0), 60));
        fx
    }

    #[test]
    fn test_slot_shortfall_penalized() {
        let mut fx = two_member_fixture();
        fx.end = date(1);
        fx.inputs.day_groups.push(day_group_all(1));
        fx.inputs
            .timeslot_requirements
            .push(timeslot_req(1, 1, (9, 0), (10, 0), 2, None));
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 0, Some(0));
        let breakdown = model.evaluate(&roster);

        // Two grid slots (09:00, 09:30) each one short.
        assert_eq!(breakdown.slot_shortfalls.len(), 2);
        assert!(breakdown.slot_shortfalls.iter().all(|s| s.shortfall == 1));
        assert!(breakdown.score.is_feasible());

        roster.set(1, 0, Some(0));
        let covered = model.evaluate(&roster);
        assert!(covered.slot_shortfalls.is_empty());
        assert!(covered.score.soft > breakdown.score.soft);
    }

    #[test]
    fn test_pinned_cell_counts_through_fixed_baseline() {
        let mut fx = two_member_fixture();
        fx.end = date(1);
        fx.inputs.day_groups.push(day_group_all(1));
        fx.inputs
            .timeslot_requirements
            .push(timeslot_req(1, 1, (9, 0), (10, 0), 1, None));
        fx.fix(1, 1, date(1));
        let model = fx.model();

        let roster = Roster::initial(&model);
        let breakdown = model.evaluate(&roster);
        assert!(breakdown.slot_shortfalls.is_empty());
    }

    #[test]
    fn test_pattern_max_headcount_is_hard() {
        let mut fx = two_member_fixture();
        fx.inputs.patterns[0].max_headcount = Some(1);
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 0, Some(0));
        roster.set(1, 0, Some(0));
        let breakdown = model.evaluate(&roster);
        assert_eq!(breakdown.score.hard, -1);
    }

    #[test]
    fn test_specific_date_minimum_is_hard() {
        let mut fx = two_member_fixture();
        fx.inputs
            .specific_date_requirements
            .push(specific_date_req(1, date(2), 1, 2, None));
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 1, Some(0));
        let short = model.evaluate(&roster);
        assert_eq!(short.score.hard, -1);

        roster.set(1, 1, Some(0));
        let met = model.evaluate(&roster);
        assert_eq!(met.score.hard, 0);
    }

    #[test]
    fn test_rest_violation_is_hard() {
        let mut fx = fixture(date(1), date(2));
        fx.inputs.members.push(member(1));
        fx.inputs.patterns.push(pattern(1, (22, 0), (6, 0), 60));
        fx.inputs.patterns.push(pattern(2, (8, 0), (16, 0), 60));
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 0, Some(0));
        roster.set(0, 1, Some(1));
        let breakdown = model.evaluate(&roster);
        assert_eq!(breakdown.score.hard, -1);
    }

    #[test]
    fn test_consecutive_windows_counted() {
        let mut fx = fixture(date(1), date(4));
        fx.inputs.members.push(member(1));
        fx.inputs.members[0].max_consecutive_work_days = Some(2);
        fx.inputs.patterns.push(pattern(1, (9, 0), (17, 0), 60));
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        for d in 0..4 {
            roster.set(0, d, Some(0));
        }
        let breakdown = model.evaluate(&roster);
        // Windows (0..=2) and (1..=3) both exceed two consecutive days.
        assert_eq!(breakdown.consecutive_violations.len(), 2);
    }

    #[test]
    fn test_salary_band_floor_arithmetic() {
        let mut fx = fixture(date(1), date(3));
        let mut f = member(1);
        f.hourly_wage = Some(1010);
        f.min_monthly_salary = Some(20_000);
        f.max_monthly_salary = Some(20_000);
        fx.inputs.members.push(f);
        fx.inputs.patterns.push(pattern(1, (9, 0), (17, 0), 60));
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 0, Some(0));
        let breakdown = model.evaluate(&roster);
        // One 420-minute shift at 1010/h floors to 7070.
        assert_eq!(breakdown.salary_shortfalls, vec![(0, 20_000 - 7070)]);
        assert!(breakdown.salary_surpluses.is_empty());

        for d in 1..3 {
            roster.set(0, d, Some(0));
        }
        let over = model.evaluate(&roster);
        assert_eq!(over.salary_surpluses, vec![(0, 3 * 7070 - 20_000)]);
    }

    #[test]
    fn test_salaried_member_skips_salary_band() {
        let mut fx = fixture(date(1), date(3));
        fx.inputs
            .members
            .push(crate::solver::testutil::salaried_member(1));
        fx.inputs.patterns.push(pattern(1, (9, 0), (17, 0), 60));
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 0, Some(0));
        let breakdown = model.evaluate(&roster);
        assert!(breakdown.salary_shortfalls.is_empty());
        assert!(breakdown.salary_surpluses.is_empty());
    }

    #[test]
    fn test_incompatible_overlap_counted_per_slot() {
        let mut fx = two_member_fixture();
        fx.relate(1, RelationshipRule::Incompatible, &[1, 2]);
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 0, Some(0));
        roster.set(1, 0, Some(0));
        let breakdown = model.evaluate(&roster);
        // The full 16-slot shift overlaps.
        assert_eq!(breakdown.incompatible_overlaps.len(), 16);
        assert!(breakdown
            .incompatible_overlaps
            .iter()
            .all(|o| o.excess == 1));
    }

    #[test]
    fn test_pairing_bonus_rewards_same_shift() {
        let mut fx = two_member_fixture();
        fx.relate(1, RelationshipRule::Pairing, &[1, 2]);
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 0, Some(0));
        let alone = model.evaluate(&roster);
        roster.set(1, 0, Some(0));
        let paired = model.evaluate(&roster);

        let single_reward =
            model.members[1].priority_reward + model.members[1].preference_bonus[0];
        assert_eq!(
            paired.rewards - alone.rewards,
            single_reward + model.weights.pairing
        );
    }

    #[test]
    fn test_workday_surplus_scaled_when_exact() {
        let mut fx = fixture(date(1), date(4));
        let mut m = member(1);
        m.min_monthly_days_off = 2;
        m.enforce_exact_holidays = true;
        fx.inputs.members.push(m);
        fx.inputs.patterns.push(pattern(1, (9, 0), (17, 0), 60));
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        for d in 0..3 {
            roster.set(0, d, Some(0));
        }
        let breakdown = model.evaluate(&roster);
        assert_eq!(breakdown.workday_surpluses, vec![(0, 1)]);
        let expected = model.weights.holiday_violation * 1000;
        assert!(breakdown.penalties >= expected);
    }

    #[test]
    fn test_weekday_allowlist_violation_is_soft() {
        let mut fx = fixture(date(6), date(7)); // Sat + Sun
        fx.inputs.members.push(member(1));
        fx.inputs.patterns.push(pattern(1, (9, 0), (17, 0), 60));
        fx.inputs
            .day_groups
            .push(crate::solver::testutil::day_group_weekdays(1));
        fx.inputs
            .member_day_groups
            .push(crate::domain::entities::MemberDayGroup {
                member_id: 1,
                day_group_id: 1,
            });
        let model = fx.model();

        let mut roster = Roster::initial(&model);
        roster.set(0, 0, Some(0));
        let breakdown = model.evaluate(&roster);
        assert!(breakdown.score.is_feasible());
        assert_eq!(breakdown.unavailable_days, vec![(0, 0)]);
    }
}
