use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-department optimization weights. Exactly one row per department is
/// expected to carry `is_default`; the driver provisions a default-valued
/// record when none exists and demotes extras when several do.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SolverSettings {
    pub id: i64,
    pub department_id: i64,
    pub is_default: bool,
    pub headcount_penalty_cost: i64,
    pub unavailable_day_penalty: i64,
    pub incompatible_penalty: i64,
    pub holiday_violation_penalty: i64,
    pub consecutive_work_violation_penalty: i64,
    pub salary_too_low_penalty: i64,
    pub salary_too_high_penalty: i64,
    pub work_day_deviation_penalty: i64,
    pub difficulty_bonus_weight: i64,
    pub shift_preference_bonus: i64,
    pub pairing_bonus: i64,
}

impl SolverSettings {
    /// Default weights for a department with no stored settings. The id is
    /// assigned by the repository on insert.
    pub fn default_for(department_id: i64) -> Self {
        Self {
            id: 0,
            department_id,
            is_default: true,
            headcount_penalty_cost: 100_000,
            unavailable_day_penalty: 30_000,
            incompatible_penalty: 50_000,
            holiday_violation_penalty: 20_000,
            consecutive_work_violation_penalty: 15_000,
            salary_too_low_penalty: 2,
            salary_too_high_penalty: 2,
            work_day_deviation_penalty: 100,
            difficulty_bonus_weight: 10_000,
            shift_preference_bonus: 500,
            pairing_bonus: 3_000,
        }
    }
}
