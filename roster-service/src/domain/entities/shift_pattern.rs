use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Shift pattern template: a named (start, end, break) triple. A pattern
/// whose end is at or before its start crosses midnight into the next
/// civil day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShiftPattern {
    pub id: i64,
    pub department_id: i64,
    pub pattern_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: i32,
    pub is_night_shift: bool,
    pub min_headcount: i32,
    pub max_headcount: Option<i32>,
}

impl ShiftPattern {
    /// Start of the shift as minutes after midnight.
    pub fn start_minute(&self) -> u32 {
        minute_of_day(self.start_time)
    }

    /// Gross wall-clock span of the shift in minutes, break included.
    pub fn span_minutes(&self) -> u32 {
        let start = minute_of_day(self.start_time);
        let end = minute_of_day(self.end_time);
        if end <= start {
            end + MINUTES_PER_DAY - start
        } else {
            end - start
        }
    }

    /// Net working minutes: (end - start mod 24h) - break.
    pub fn work_minutes(&self) -> i32 {
        self.span_minutes() as i32 - self.break_minutes
    }
}

pub fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Named set of weekdays used by time-slot requirements and member
/// weekday allowlists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DayGroup {
    pub id: i64,
    pub group_name: String,
    pub is_monday: bool,
    pub is_tuesday: bool,
    pub is_wednesday: bool,
    pub is_thursday: bool,
    pub is_friday: bool,
    pub is_saturday: bool,
    pub is_sunday: bool,
}

impl DayGroup {
    /// 7-bit weekday mask, bit 0 = Monday.
    pub fn weekday_mask(&self) -> u8 {
        let flags = [
            self.is_monday,
            self.is_tuesday,
            self.is_wednesday,
            self.is_thursday,
            self.is_friday,
            self.is_saturday,
            self.is_sunday,
        ];
        flags
            .iter()
            .enumerate()
            .filter(|(_, &set)| set)
            .fold(0u8, |mask, (bit, _)| mask | (1 << bit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(start: (u32, u32), end: (u32, u32), break_minutes: i32) -> ShiftPattern {
        ShiftPattern {
            id: 1,
            department_id: 1,
            pattern_name: "day".to_string(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            break_minutes,
            is_night_shift: false,
            min_headcount: 0,
            max_headcount: None,
        }
    }

    #[test]
    fn test_work_minutes_same_day() {
        let p = pattern((9, 0), (17, 0), 60);
        assert_eq!(p.span_minutes(), 480);
        assert_eq!(p.work_minutes(), 420);
    }

    #[test]
    fn test_work_minutes_crossing_midnight() {
        let p = pattern((22, 0), (6, 0), 60);
        assert_eq!(p.span_minutes(), 480);
        assert_eq!(p.work_minutes(), 420);
    }

    #[test]
    fn test_equal_start_and_end_is_full_day() {
        let p = pattern((8, 0), (8, 0), 0);
        assert_eq!(p.span_minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_weekday_mask() {
        let group = DayGroup {
            id: 1,
            group_name: "weekdays".to_string(),
            is_monday: true,
            is_tuesday: true,
            is_wednesday: true,
            is_thursday: true,
            is_friday: true,
            is_saturday: false,
            is_sunday: false,
        };
        assert_eq!(group.weekday_mask(), 0b0001_1111);
    }
}
