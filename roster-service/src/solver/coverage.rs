use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::entities::MINUTES_PER_DAY;

use super::normalizer::NormalizedInputs;

/// Slot granularity of the coverage model; an algorithm constant, not
/// configuration.
pub const SLOT_MINUTES: u32 = 30;

/// Wall-clock identity of one coverage slot: a day index into the solve
/// horizon plus a minute of that civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId {
    pub day_idx: usize,
    pub minute: u32,
}

/// One (member, day, pattern) decision able to cover a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCandidate {
    pub member_idx: usize,
    pub day_idx: usize,
    pub pattern_idx: usize,
}

/// Inverted slot index: which candidate decisions could cover each
/// 30-minute slot, and how many pre-placed fixed shifts already do.
#[derive(Debug, Clone)]
pub struct SlotCoverage {
    /// Relative slots per pattern as (day offset, minute of day); shifts
    /// crossing midnight spill onto day offset 1.
    pattern_offsets: Vec<Vec<(usize, u32)>>,
    pub variable_cov: HashMap<SlotId, Vec<SlotCandidate>>,
    pub fixed_cov: HashMap<SlotId, i32>,
    n_days: usize,
}

impl SlotCoverage {
    pub fn build(inputs: &NormalizedInputs) -> Self {
        let n_days = inputs.days.len();

        let pattern_offsets: Vec<Vec<(usize, u32)>> = inputs
            .patterns
            .iter()
            .map(|pattern| {
                let start = pattern.start_minute();
                let span = pattern.span_minutes();
                let slot_count = span.div_ceil(SLOT_MINUTES);
                (0..slot_count)
                    .map(|i| {
                        let absolute = start + i * SLOT_MINUTES;
                        (
                            (absolute / MINUTES_PER_DAY) as usize,
                            absolute % MINUTES_PER_DAY,
                        )
                    })
                    .collect()
            })
            .collect();

        let day_index: HashMap<NaiveDate, usize> = inputs
            .days
            .iter()
            .enumerate()
            .map(|(idx, &date)| (date, idx))
            .collect();
        let pattern_index: HashMap<i64, usize> = inputs
            .patterns
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();

        let mut fixed_cov: HashMap<SlotId, i32> = HashMap::new();
        for fixed in &inputs.fixed_assignments {
            let (Some(&day_idx), Some(&pattern_idx)) = (
                day_index.get(&fixed.shift_date),
                pattern_index.get(&fixed.shift_pattern_id),
            ) else {
                continue;
            };
            for &(offset, minute) in &pattern_offsets[pattern_idx] {
                let slot_day = day_idx + offset;
                if slot_day < n_days {
                    *fixed_cov
                        .entry(SlotId {
                            day_idx: slot_day,
                            minute,
                        })
                        .or_insert(0) += 1;
                }
            }
        }

        let mut variable_cov: HashMap<SlotId, Vec<SlotCandidate>> = HashMap::new();
        for (member_idx, member) in inputs.members.iter().enumerate() {
            for (day_idx, &date) in inputs.days.iter().enumerate() {
                if inputs.pre_assigned_days.contains(&(member.id, date)) {
                    continue;
                }
                for pattern_idx in 0..inputs.patterns.len() {
                    for &(offset, minute) in &pattern_offsets[pattern_idx] {
                        let slot_day = day_idx + offset;
                        if slot_day < n_days {
                            variable_cov
                                .entry(SlotId {
                                    day_idx: slot_day,
                                    minute,
                                })
                                .or_default()
                                .push(SlotCandidate {
                                    member_idx,
                                    day_idx,
                                    pattern_idx,
                                });
                        }
                    }
                }
            }
        }

        Self {
            pattern_offsets,
            variable_cov,
            fixed_cov,
            n_days,
        }
    }

    /// Horizon-clipped slots covered by assigning the pattern on the day.
    pub fn slots_for(
        &self,
        day_idx: usize,
        pattern_idx: usize,
    ) -> impl Iterator<Item = SlotId> + '_ {
        let n_days = self.n_days;
        self.pattern_offsets[pattern_idx]
            .iter()
            .filter_map(move |&(offset, minute)| {
                let slot_day = day_idx + offset;
                (slot_day < n_days).then_some(SlotId {
                    day_idx: slot_day,
                    minute,
                })
            })
    }
}
