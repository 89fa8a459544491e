use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Weekday-based staffing demand for a wall-clock interval.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlotRequirement {
    pub id: i64,
    pub department_id: i64,
    pub day_group_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_headcount: i32,
    pub max_headcount: Option<i32>,
}

/// Per-date headcount bounds for one shift pattern; overrides nothing, it
/// binds in addition to the slot rules on that date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpecificDateRequirement {
    pub id: i64,
    pub department_id: i64,
    pub date: NaiveDate,
    pub shift_pattern_id: i64,
    pub min_headcount: i32,
    pub max_headcount: Option<i32>,
}

/// Per-date staffing demand for a wall-clock interval. When any of these
/// exist for a date, the weekday-based slot rules are ignored for that date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpecificTimeSlotRequirement {
    pub id: i64,
    pub department_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_headcount: i32,
    pub max_headcount: Option<i32>,
}
