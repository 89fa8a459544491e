use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Solver output row: one shift for one member on one date. At most one
/// exists per (member, date).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub member_id: i64,
    pub shift_pattern_id: i64,
    pub shift_date: NaiveDate,
}
