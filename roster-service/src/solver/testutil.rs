//! Shared fixtures for solver unit tests.

use chrono::{NaiveDate, NaiveTime};
use shared::{EmployeeType, LeaveStatus, RelationshipRule};

use crate::domain::entities::{
    DayGroup, Department, FixedAssignment, LeaveRequest, Member, RelationshipGroup,
    RelationshipGroupMember, ShiftPattern, ShiftPreference, SolverSettings,
    SpecificDateRequirement, SpecificTimeSlotRequirement, TimeSlotRequirement,
};
use crate::domain::repositories::DepartmentInputs;

use super::model::RosterModel;
use super::normalizer::{normalize, NormalizedInputs};

pub struct Fixture {
    pub inputs: DepartmentInputs,
    pub settings: SolverSettings,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub fn fixture(start: NaiveDate, end: NaiveDate) -> Fixture {
    Fixture {
        inputs: DepartmentInputs {
            department: Some(Department {
                id: 1,
                name: "floor".to_string(),
            }),
            ..Default::default()
        },
        settings: SolverSettings::default_for(1),
        start,
        end,
    }
}

impl Fixture {
    pub fn prefer(&mut self, member_id: i64, pattern_id: i64) {
        self.prefer_with(member_id, pattern_id, 50);
    }

    pub fn prefer_with(&mut self, member_id: i64, pattern_id: i64, priority: i32) {
        self.inputs.preferences.push(ShiftPreference {
            member_id,
            shift_pattern_id: pattern_id,
            priority,
        });
    }

    pub fn fix(&mut self, member_id: i64, pattern_id: i64, date: NaiveDate) {
        self.inputs.fixed_assignments.push(FixedAssignment {
            id: self.inputs.fixed_assignments.len() as i64 + 1,
            member_id,
            shift_pattern_id: pattern_id,
            shift_date: date,
        });
    }

    pub fn relate(&mut self, group_id: i64, rule: RelationshipRule, member_ids: &[i64]) {
        self.inputs.relationship_groups.push(RelationshipGroup {
            id: group_id,
            group_name: format!("group-{group_id}"),
            rule_type: rule,
        });
        for &member_id in member_ids {
            self.inputs
                .relationship_group_members
                .push(RelationshipGroupMember {
                    group_id,
                    member_id,
                });
        }
    }

    pub fn normalized(&self) -> NormalizedInputs {
        normalize(
            self.inputs.clone(),
            self.settings.clone(),
            self.start,
            self.end,
        )
        .unwrap()
    }

    pub fn model(&self) -> RosterModel {
        RosterModel::build(&self.normalized())
    }
}

pub fn member(id: i64) -> Member {
    Member {
        id,
        department_id: 1,
        name: format!("member-{id}"),
        employee_type: EmployeeType::Hourly,
        hourly_wage: Some(1000),
        monthly_salary: None,
        min_monthly_salary: None,
        max_monthly_salary: None,
        max_annual_salary: None,
        current_annual_salary: 0,
        salary_year_start_month: 12,
        max_hours_per_day: 8,
        min_days_off_per_week: 2,
        min_monthly_days_off: 0,
        max_consecutive_work_days: None,
        enforce_exact_holidays: false,
        priority_score: 10,
    }
}

pub fn salaried_member(id: i64) -> Member {
    Member {
        employee_type: EmployeeType::Salaried,
        hourly_wage: None,
        monthly_salary: Some(250_000),
        ..member(id)
    }
}

pub fn pattern(id: i64, start: (u32, u32), end: (u32, u32), break_minutes: i32) -> ShiftPattern {
    ShiftPattern {
        id,
        department_id: 1,
        pattern_name: format!("pattern-{id}"),
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        break_minutes,
        is_night_shift: false,
        min_headcount: 0,
        max_headcount: None,
    }
}

pub fn leave(id: i64, member_id: i64, date: NaiveDate) -> LeaveRequest {
    LeaveRequest {
        id,
        member_id,
        leave_date: date,
        status: LeaveStatus::Approved,
    }
}

pub fn day_group_weekdays(id: i64) -> DayGroup {
    DayGroup {
        id,
        group_name: "weekdays".to_string(),
        is_monday: true,
        is_tuesday: true,
        is_wednesday: true,
        is_thursday: true,
        is_friday: true,
        is_saturday: false,
        is_sunday: false,
    }
}

pub fn day_group_all(id: i64) -> DayGroup {
    DayGroup {
        id,
        group_name: "all-days".to_string(),
        is_monday: true,
        is_tuesday: true,
        is_wednesday: true,
        is_thursday: true,
        is_friday: true,
        is_saturday: true,
        is_sunday: true,
    }
}

pub fn timeslot_req(
    id: i64,
    day_group_id: i64,
    start: (u32, u32),
    end: (u32, u32),
    min_headcount: i32,
    max_headcount: Option<i32>,
) -> TimeSlotRequirement {
    TimeSlotRequirement {
        id,
        department_id: 1,
        day_group_id,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        min_headcount,
        max_headcount,
    }
}

pub fn specific_slot_req(
    id: i64,
    date: NaiveDate,
    start: (u32, u32),
    end: (u32, u32),
    min_headcount: i32,
    max_headcount: Option<i32>,
) -> SpecificTimeSlotRequirement {
    SpecificTimeSlotRequirement {
        id,
        department_id: 1,
        date,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        min_headcount,
        max_headcount,
    }
}

pub fn specific_date_req(
    id: i64,
    date: NaiveDate,
    pattern_id: i64,
    min_headcount: i32,
    max_headcount: Option<i32>,
) -> SpecificDateRequirement {
    SpecificDateRequirement {
        id,
        department_id: 1,
        date,
        shift_pattern_id: pattern_id,
        min_headcount,
        max_headcount,
    }
}
