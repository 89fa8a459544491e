use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::LeaveStatus;
use sqlx::FromRow;

/// Leave request; only `approved` requests block assignment and count
/// toward day difficulty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaveRequest {
    pub id: i64,
    pub member_id: i64,
    pub leave_date: NaiveDate,
    pub status: LeaveStatus,
}

/// Admin-designated holiday: no shift that day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DesignatedHoliday {
    pub id: i64,
    pub member_id: i64,
    pub date: NaiveDate,
}

/// Paid leave day: no shift that day. The hour count feeds earnings
/// reporting outside the solver.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaidLeave {
    pub id: i64,
    pub member_id: i64,
    pub date: NaiveDate,
    pub hours: i32,
}

/// Pre-placed shift: the member takes exactly this pattern on this date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FixedAssignment {
    pub id: i64,
    pub member_id: i64,
    pub shift_pattern_id: i64,
    pub shift_date: NaiveDate,
}

/// Non-shift activity occupying a member for a whole day; excludes every
/// solver-produced shift on that date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtherAssignment {
    pub id: i64,
    pub member_id: i64,
    pub shift_date: NaiveDate,
    pub activity_name: String,
}
