use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use roster_service::domain::entities::{
    Assignment, DayGroup, Department, FixedAssignment, LeaveRequest, Member, RelationshipGroup,
    RelationshipGroupMember, ShiftPattern, ShiftPreference, SolverSettings,
    SpecificTimeSlotRequirement, TimeSlotRequirement,
};
use roster_service::domain::repositories::{
    AssignmentRepository, DepartmentInputRepository, DepartmentInputs, SolverSettingsRepository,
};
use roster_service::solver::{SolverConfig, SolverDriver};
use shared::{DomainResult, EmployeeType, LeaveStatus, RelationshipRule};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory stand-in for the Postgres input repository: returns one fixed
/// snapshot.
pub struct InMemoryInputRepository {
    inputs: DepartmentInputs,
}

impl InMemoryInputRepository {
    pub fn new(inputs: DepartmentInputs) -> Self {
        Self { inputs }
    }
}

#[async_trait]
impl DepartmentInputRepository for InMemoryInputRepository {
    async fn load_department_inputs(
        &self,
        _department_id: i64,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> DomainResult<DepartmentInputs> {
        Ok(self.inputs.clone())
    }
}

/// In-memory assignment store with delete-then-insert semantics.
#[derive(Default)]
pub struct InMemoryAssignmentRepository {
    rows: RwLock<Vec<Assignment>>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> Vec<Assignment> {
        self.rows.read().unwrap().clone()
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn replace_assignments(
        &self,
        _department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        assignments: Vec<Assignment>,
    ) -> DomainResult<()> {
        let mut rows = self.rows.write().unwrap();
        rows.retain(|a| a.shift_date < start_date || a.shift_date > end_date);
        rows.extend(assignments);
        Ok(())
    }

    async fn find_in_range(
        &self,
        _department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<Vec<Assignment>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.shift_date >= start_date && a.shift_date <= end_date)
            .cloned()
            .collect())
    }
}

/// In-memory settings store with id assignment.
pub struct InMemorySettingsRepository {
    rows: RwLock<Vec<SolverSettings>>,
    next_id: AtomicI64,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn with_rows(rows: Vec<SolverSettings>) -> Self {
        let next = rows.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            rows: RwLock::new(rows),
            next_id: AtomicI64::new(next),
        }
    }

    pub fn rows(&self) -> Vec<SolverSettings> {
        self.rows.read().unwrap().clone()
    }
}

#[async_trait]
impl SolverSettingsRepository for InMemorySettingsRepository {
    async fn list_for_department(&self, department_id: i64) -> DomainResult<Vec<SolverSettings>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.department_id == department_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, settings: SolverSettings) -> DomainResult<SolverSettings> {
        let mut stored = settings;
        stored.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.write().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn set_default(&self, id: i64, is_default: bool) -> DomainResult<()> {
        let mut rows = self.rows.write().unwrap();
        if let Some(row) = rows.iter_mut().find(|s| s.id == id) {
            row.is_default = is_default;
        }
        Ok(())
    }
}

pub struct TestHarness {
    pub driver: SolverDriver,
    pub assignment_repo: Arc<InMemoryAssignmentRepository>,
    pub settings_repo: Arc<InMemorySettingsRepository>,
}

/// Driver over in-memory repositories with a deterministic step cap.
pub fn harness(inputs: DepartmentInputs) -> TestHarness {
    harness_with_settings(inputs, InMemorySettingsRepository::new())
}

pub fn harness_with_settings(
    inputs: DepartmentInputs,
    settings: InMemorySettingsRepository,
) -> TestHarness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let assignment_repo = Arc::new(InMemoryAssignmentRepository::new());
    let settings_repo = Arc::new(settings);
    let driver = SolverDriver::new(
        Arc::new(InMemoryInputRepository::new(inputs)),
        assignment_repo.clone(),
        settings_repo.clone(),
        SolverConfig {
            max_wall_seconds: 10.0,
            max_steps: Some(10_000),
            seed: 20_240_401,
        },
    );
    TestHarness {
        driver,
        assignment_repo,
        settings_repo,
    }
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn base_inputs() -> DepartmentInputs {
    DepartmentInputs {
        department: Some(Department {
            id: 1,
            name: "main floor".to_string(),
        }),
        ..Default::default()
    }
}

pub fn sample_member(id: i64, name: &str) -> Member {
    Member {
        id,
        department_id: 1,
        name: name.to_string(),
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

pub fn sample_pattern(id: i64, start: NaiveTime, end: NaiveTime, break_minutes: i32) -> ShiftPattern {
    ShiftPattern {
        id,
        department_id: 1,
        pattern_name: format!("pattern-{id}"),
        start_time: start,
        end_time: end,
        break_minutes,
        is_night_shift: false,
        min_headcount: 0,
        max_headcount: None,
    }
}

pub fn weekday_group(id: i64) -> DayGroup {
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

pub fn every_day_group(id: i64) -> DayGroup {
    DayGroup {
        id,
        group_name: "all days".to_string(),
        is_monday: true,
        is_tuesday: true,
        is_wednesday: true,
        is_thursday: true,
        is_friday: true,
        is_saturday: true,
        is_sunday: true,
    }
}

pub fn slot_requirement(
    id: i64,
    day_group_id: i64,
    start: NaiveTime,
    end: NaiveTime,
    min_headcount: i32,
    max_headcount: Option<i32>,
) -> TimeSlotRequirement {
    TimeSlotRequirement {
        id,
        department_id: 1,
        day_group_id,
        start_time: start,
        end_time: end,
        min_headcount,
        max_headcount,
    }
}

pub fn specific_slot_requirement(
    id: i64,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    min_headcount: i32,
    max_headcount: Option<i32>,
) -> SpecificTimeSlotRequirement {
    SpecificTimeSlotRequirement {
        id,
        department_id: 1,
        date,
        start_time: start,
        end_time: end,
        min_headcount,
        max_headcount,
    }
}

pub fn approved_leave(id: i64, member_id: i64, date: NaiveDate) -> LeaveRequest {
    LeaveRequest {
        id,
        member_id,
        leave_date: date,
        status: LeaveStatus::Approved,
    }
}

pub fn preference(member_id: i64, pattern_id: i64) -> ShiftPreference {
    ShiftPreference {
        member_id,
        shift_pattern_id: pattern_id,
        priority: 50,
    }
}

pub fn fixed(id: i64, member_id: i64, pattern_id: i64, date: NaiveDate) -> FixedAssignment {
    FixedAssignment {
        id,
        member_id,
        shift_pattern_id: pattern_id,
        shift_date: date,
    }
}

pub fn relationship(
    inputs: &mut DepartmentInputs,
    group_id: i64,
    rule: RelationshipRule,
    member_ids: &[i64],
) {
    inputs.relationship_groups.push(RelationshipGroup {
        id: group_id,
        group_name: format!("group-{group_id}"),
        rule_type: rule,
    });
    for &member_id in member_ids {
        inputs
            .relationship_group_members
            .push(RelationshipGroupMember {
                group_id,
                member_id,
            });
    }
}
