use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use shared::{DomainError, DomainResult, EmployeeType, LeaveStatus, RelationshipRule};

use crate::domain::entities::{
    FixedAssignment, Member, ShiftPattern, SolverSettings, SpecificDateRequirement,
    SpecificTimeSlotRequirement, TimeSlotRequirement,
};
use crate::domain::repositories::DepartmentInputs;

/// Validated input bundle with every derived table the model builder needs.
/// Members, patterns and days are sorted; positions double as dense indices
/// downstream.
#[derive(Debug, Clone)]
pub struct NormalizedInputs {
    pub department_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<NaiveDate>,
    pub members: Vec<Member>,
    pub patterns: Vec<ShiftPattern>,
    /// Net working minutes per pattern id.
    pub work_minutes: HashMap<i64, i32>,
    /// (member id, pattern id) -> preference priority; absent means 100.
    pub priority_map: HashMap<(i64, i64), i32>,
    /// Pattern allowlist per member; only members with a non-empty
    /// preference set appear.
    pub preferred_patterns: HashMap<i64, HashSet<i64>>,
    pub leave_dates: HashMap<i64, BTreeSet<NaiveDate>>,
    pub designated_holiday_dates: HashMap<i64, BTreeSet<NaiveDate>>,
    pub paid_leave_dates: HashMap<i64, BTreeSet<NaiveDate>>,
    pub fixed_assignments: Vec<FixedAssignment>,
    pub other_assignment_dates: HashMap<i64, BTreeSet<NaiveDate>>,
    /// (member id, date) pairs carrying a fixed or other assignment.
    pub pre_assigned_days: HashSet<(i64, NaiveDate)>,
    pub specific_date_requirements: Vec<SpecificDateRequirement>,
    pub specific_timeslot_requirements: Vec<SpecificTimeSlotRequirement>,
    /// Dates where specific time-slot rules replace the weekday-based ones.
    pub dates_with_specific_requirements: BTreeSet<NaiveDate>,
    pub timeslot_requirements: Vec<TimeSlotRequirement>,
    /// Weekday mask per day group id, bit 0 = Monday.
    pub day_group_masks: HashMap<i64, u8>,
    /// Weekday allowlist mask per member id; `None` means unrestricted.
    pub allowed_weekdays: HashMap<i64, Option<u8>>,
    /// Approved leave requests per date; rewards scale with this.
    pub day_difficulty: HashMap<NaiveDate, i64>,
    /// (group name, member ids) per incompatible group.
    pub incompatible_groups: Vec<(String, Vec<i64>)>,
    pub pairing_groups: Vec<Vec<i64>>,
    pub settings: SolverSettings,
}

impl NormalizedInputs {
    /// True when the member is blocked from working that day by approved
    /// leave, a designated holiday or paid leave.
    pub fn is_absent(&self, member_id: i64, date: NaiveDate) -> bool {
        let contains = |map: &HashMap<i64, BTreeSet<NaiveDate>>| {
            map.get(&member_id).is_some_and(|dates| dates.contains(&date))
        };
        contains(&self.leave_dates)
            || contains(&self.designated_holiday_dates)
            || contains(&self.paid_leave_dates)
    }
}

/// Validate raw department records and materialize the derived tables for
/// an inclusive date range.
pub fn normalize(
    inputs: DepartmentInputs,
    settings: SolverSettings,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> DomainResult<NormalizedInputs> {
    if start_date > end_date {
        return Err(DomainError::InvalidInput(
            "date range is empty or reversed".to_string(),
        ));
    }

    let department = inputs.department.ok_or_else(|| {
        DomainError::InvalidInput(format!(
            "department {} does not exist",
            settings.department_id
        ))
    })?;

    let mut days = Vec::new();
    let mut current = start_date;
    while current <= end_date {
        days.push(current);
        current = current
            .succ_opt()
            .ok_or_else(|| DomainError::InvalidInput("date range exceeds calendar".to_string()))?;
    }

    let mut members = inputs.members;
    members.sort_by_key(|m| m.id);
    let mut patterns = inputs.patterns;
    patterns.sort_by_key(|p| p.id);

    let member_ids: HashSet<i64> = members.iter().map(|m| m.id).collect();
    let pattern_ids: HashSet<i64> = patterns.iter().map(|p| p.id).collect();

    for member in &members {
        if member.employee_type == EmployeeType::Hourly && member.hourly_wage.is_none() {
            return Err(DomainError::InvalidInput(format!(
                "hourly member {} has no hourly wage",
                member.id
            )));
        }
    }

    let mut work_minutes = HashMap::new();
    for pattern in &patterns {
        let minutes = pattern.work_minutes();
        if minutes < 0 {
            return Err(DomainError::InvalidInput(format!(
                "break exceeds the shift span for pattern {}",
                pattern.id
            )));
        }
        work_minutes.insert(pattern.id, minutes);
    }

    let day_group_masks: HashMap<i64, u8> = inputs
        .day_groups
        .iter()
        .map(|g| (g.id, g.weekday_mask()))
        .collect();

    let mut allowed_weekdays: HashMap<i64, Option<u8>> =
        members.iter().map(|m| (m.id, None)).collect();
    for link in &inputs.member_day_groups {
        if !member_ids.contains(&link.member_id) {
            continue;
        }
        let mask = day_group_masks.get(&link.day_group_id).ok_or_else(|| {
            DomainError::InvalidInput(format!(
                "member {} references unknown day group {}",
                link.member_id, link.day_group_id
            ))
        })?;
        let entry = allowed_weekdays.entry(link.member_id).or_insert(None);
        *entry = Some(entry.unwrap_or(0) | mask);
    }

    let mut priority_map = HashMap::new();
    let mut preferred_patterns: HashMap<i64, HashSet<i64>> = HashMap::new();
    for pref in &inputs.preferences {
        if !member_ids.contains(&pref.member_id) {
            continue;
        }
        priority_map.insert((pref.member_id, pref.shift_pattern_id), pref.priority);
        preferred_patterns
            .entry(pref.member_id)
            .or_default()
            .insert(pref.shift_pattern_id);
    }

    let in_range = |date: NaiveDate| date >= start_date && date <= end_date;

    let mut leave_dates: HashMap<i64, BTreeSet<NaiveDate>> = HashMap::new();
    let mut day_difficulty: HashMap<NaiveDate, i64> = HashMap::new();
    for leave in &inputs.leave_requests {
        if leave.status != LeaveStatus::Approved
            || !in_range(leave.leave_date)
            || !member_ids.contains(&leave.member_id)
        {
            continue;
        }
        leave_dates
            .entry(leave.member_id)
            .or_default()
            .insert(leave.leave_date);
        *day_difficulty.entry(leave.leave_date).or_insert(0) += 1;
    }

    let mut designated_holiday_dates: HashMap<i64, BTreeSet<NaiveDate>> = HashMap::new();
    for holiday in &inputs.designated_holidays {
        if in_range(holiday.date) && member_ids.contains(&holiday.member_id) {
            designated_holiday_dates
                .entry(holiday.member_id)
                .or_default()
                .insert(holiday.date);
        }
    }

    let mut paid_leave_dates: HashMap<i64, BTreeSet<NaiveDate>> = HashMap::new();
    for paid in &inputs.paid_leaves {
        if in_range(paid.date) && member_ids.contains(&paid.member_id) {
            paid_leave_dates
                .entry(paid.member_id)
                .or_default()
                .insert(paid.date);
        }
    }

    let mut fixed_assignments = Vec::new();
    let mut pre_assigned_days = HashSet::new();
    for fixed in &inputs.fixed_assignments {
        if !in_range(fixed.shift_date) {
            continue;
        }
        if !member_ids.contains(&fixed.member_id) {
            return Err(DomainError::InvalidInput(format!(
                "fixed assignment references unknown member {}",
                fixed.member_id
            )));
        }
        if !pattern_ids.contains(&fixed.shift_pattern_id) {
            return Err(DomainError::InvalidInput(format!(
                "fixed assignment pattern {} does not belong to department {}",
                fixed.shift_pattern_id, department.id
            )));
        }
        pre_assigned_days.insert((fixed.member_id, fixed.shift_date));
        fixed_assignments.push(fixed.clone());
    }

    let mut other_assignment_dates: HashMap<i64, BTreeSet<NaiveDate>> = HashMap::new();
    for other in &inputs.other_assignments {
        if !in_range(other.shift_date) || !member_ids.contains(&other.member_id) {
            continue;
        }
        other_assignment_dates
            .entry(other.member_id)
            .or_default()
            .insert(other.shift_date);
        pre_assigned_days.insert((other.member_id, other.shift_date));
    }

    let mut specific_date_requirements = Vec::new();
    for req in &inputs.specific_date_requirements {
        if !in_range(req.date) {
            continue;
        }
        if !pattern_ids.contains(&req.shift_pattern_id) {
            return Err(DomainError::InvalidInput(format!(
                "date requirement pattern {} does not belong to department {}",
                req.shift_pattern_id, department.id
            )));
        }
        specific_date_requirements.push(req.clone());
    }

    let mut specific_timeslot_requirements = Vec::new();
    let mut dates_with_specific_requirements = BTreeSet::new();
    for req in &inputs.specific_timeslot_requirements {
        if in_range(req.date) {
            dates_with_specific_requirements.insert(req.date);
            specific_timeslot_requirements.push(req.clone());
        }
    }

    let mut incompatible_groups = Vec::new();
    let mut pairing_groups = Vec::new();
    for group in &inputs.relationship_groups {
        let group_members: Vec<i64> = inputs
            .relationship_group_members
            .iter()
            .filter(|gm| gm.group_id == group.id && member_ids.contains(&gm.member_id))
            .map(|gm| gm.member_id)
            .collect();
        if group_members.len() < 2 {
            continue;
        }
        match group.rule_type {
            RelationshipRule::Incompatible => {
                incompatible_groups.push((group.group_name.clone(), group_members));
            }
            RelationshipRule::Pairing => pairing_groups.push(group_members),
        }
    }

    Ok(NormalizedInputs {
        department_id: department.id,
        start_date,
        end_date,
        days,
        members,
        patterns,
        work_minutes,
        priority_map,
        preferred_patterns,
        leave_dates,
        designated_holiday_dates,
        paid_leave_dates,
        fixed_assignments,
        other_assignment_dates,
        pre_assigned_days,
        specific_date_requirements,
        specific_timeslot_requirements,
        dates_with_specific_requirements,
        timeslot_requirements: inputs.timeslot_requirements,
        day_group_masks,
        allowed_weekdays,
        day_difficulty,
        incompatible_groups,
        pairing_groups,
        settings,
    })
}
