use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use shared::EmployeeType;
use sqlx::FromRow;

/// Member entity with contractual constraints.
///
/// `max_annual_salary`, `current_annual_salary`, `salary_year_start_month`
/// and `min_days_off_per_week` are carried as inputs but bound to no solver
/// constraint; only the monthly day count and the monthly salary band are
/// enforced.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: i64,
    pub department_id: i64,
    pub name: String,
    pub employee_type: EmployeeType,
    pub hourly_wage: Option<i32>,
    pub monthly_salary: Option<i32>,
    pub min_monthly_salary: Option<i32>,
    pub max_monthly_salary: Option<i32>,
    pub max_annual_salary: Option<i32>,
    pub current_annual_salary: i32,
    pub salary_year_start_month: i32,
    pub max_hours_per_day: i32,
    pub min_days_off_per_week: i32,
    pub min_monthly_days_off: i32,
    pub max_consecutive_work_days: Option<i32>,
    pub enforce_exact_holidays: bool,
    pub priority_score: i32,
}

/// Compensation scheme of a member. Salary constraints destructure this and
/// skip `Salaried` members entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeKind {
    Hourly {
        wage: i32,
        min_monthly: Option<i32>,
        max_monthly: Option<i32>,
    },
    Salaried {
        monthly_salary: i32,
    },
}

impl Member {
    /// Tagged view of the salary-relevant columns. The normalizer rejects
    /// hourly members without a wage before any constraint reads this.
    pub fn kind(&self) -> EmployeeKind {
        match self.employee_type {
            EmployeeType::Hourly => EmployeeKind::Hourly {
                wage: self.hourly_wage.unwrap_or(0),
                min_monthly: self.min_monthly_salary,
                max_monthly: self.max_monthly_salary,
            },
            EmployeeType::Salaried => EmployeeKind::Salaried {
                monthly_salary: self.monthly_salary.unwrap_or(0),
            },
        }
    }
}

/// Shift-pattern preference of a member. An empty preference set for a
/// member means every pattern is allowed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShiftPreference {
    pub member_id: i64,
    pub shift_pattern_id: i64,
    pub priority: i32,
}

/// Membership of a member in a weekday group allowlist.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberDayGroup {
    pub member_id: i64,
    pub day_group_id: i64,
}

/// Per-weekday allowed time window. Loaded with the department inputs but
/// not consumed by the solver; only the whole-day `allowed_day_groups`
/// allowlist is enforced.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberAvailability {
    pub id: i64,
    pub member_id: i64,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}
