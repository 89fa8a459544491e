use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{DomainError, DomainResult};
use sqlx::PgPool;

use crate::domain::entities::{
    DayGroup, Department, DesignatedHoliday, FixedAssignment, LeaveRequest, Member,
    MemberAvailability, MemberDayGroup, OtherAssignment, PaidLeave, RelationshipGroup,
    RelationshipGroupMember, ShiftPattern, ShiftPreference, SpecificDateRequirement,
    SpecificTimeSlotRequirement, TimeSlotRequirement,
};
use crate::domain::repositories::{DepartmentInputRepository, DepartmentInputs};

pub struct PostgresInputRepository {
    pool: PgPool,
}

impl PostgresInputRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentInputRepository for PostgresInputRepository {
    async fn load_department_inputs(
        &self,
        department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<DepartmentInputs> {
        let db_err = |e: sqlx::Error| DomainError::DatabaseError(e.to_string());

        let department = sqlx::query_as::<_, Department>(
            r#"
            SELECT id, name
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, department_id, name, employee_type, hourly_wage, monthly_salary,
                   min_monthly_salary, max_monthly_salary, max_annual_salary,
                   current_annual_salary, salary_year_start_month, max_hours_per_day,
                   min_days_off_per_week, min_monthly_days_off, max_consecutive_work_days,
                   enforce_exact_holidays, priority_score
            FROM members
            WHERE department_id = $1
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let day_groups = sqlx::query_as::<_, DayGroup>(
            r#"
            SELECT id, group_name, is_monday, is_tuesday, is_wednesday, is_thursday,
                   is_friday, is_saturday, is_sunday
            FROM day_groups
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let member_day_groups = sqlx::query_as::<_, MemberDayGroup>(
            r#"
            SELECT mdg.member_id, mdg.day_group_id
            FROM member_day_groups mdg
            JOIN members m ON m.id = mdg.member_id
            WHERE m.department_id = $1
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let availabilities = sqlx::query_as::<_, MemberAvailability>(
            r#"
            SELECT a.id, a.member_id, a.day_of_week, a.start_time, a.end_time
            FROM member_availabilities a
            JOIN members m ON m.id = a.member_id
            WHERE m.department_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let patterns = sqlx::query_as::<_, ShiftPattern>(
            r#"
            SELECT id, department_id, pattern_name, start_time, end_time, break_minutes,
                   is_night_shift, min_headcount, max_headcount
            FROM shift_patterns
            WHERE department_id = $1
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let preferences = sqlx::query_as::<_, ShiftPreference>(
            r#"
            SELECT p.member_id, p.shift_pattern_id, p.priority
            FROM shift_preferences p
            JOIN members m ON m.id = p.member_id
            WHERE m.department_id = $1
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let timeslot_requirements = sqlx::query_as::<_, TimeSlotRequirement>(
            r#"
            SELECT id, department_id, day_group_id, start_time, end_time,
                   min_headcount, max_headcount
            FROM time_slot_requirements
            WHERE department_id = $1
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let specific_date_requirements = sqlx::query_as::<_, SpecificDateRequirement>(
            r#"
            SELECT id, department_id, date, shift_pattern_id, min_headcount, max_headcount
            FROM specific_date_requirements
            WHERE department_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let specific_timeslot_requirements = sqlx::query_as::<_, SpecificTimeSlotRequirement>(
            r#"
            SELECT id, department_id, date, start_time, end_time, min_headcount, max_headcount
            FROM specific_time_slot_requirements
            WHERE department_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let leave_requests = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT l.id, l.member_id, l.leave_date, l.status
            FROM leave_requests l
            JOIN members m ON m.id = l.member_id
            WHERE m.department_id = $1 AND l.leave_date BETWEEN $2 AND $3
            ORDER BY l.id
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let designated_holidays = sqlx::query_as::<_, DesignatedHoliday>(
            r#"
            SELECT h.id, h.member_id, h.date
            FROM designated_holidays h
            JOIN members m ON m.id = h.member_id
            WHERE m.department_id = $1 AND h.date BETWEEN $2 AND $3
            ORDER BY h.id
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let paid_leaves = sqlx::query_as::<_, PaidLeave>(
            r#"
            SELECT p.id, p.member_id, p.date, p.hours
            FROM paid_leaves p
            JOIN members m ON m.id = p.member_id
            WHERE m.department_id = $1 AND p.date BETWEEN $2 AND $3
            ORDER BY p.id
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let fixed_assignments = sqlx::query_as::<_, FixedAssignment>(
            r#"
            SELECT f.id, f.member_id, f.shift_pattern_id, f.shift_date
            FROM fixed_assignments f
            JOIN members m ON m.id = f.member_id
            WHERE m.department_id = $1 AND f.shift_date BETWEEN $2 AND $3
            ORDER BY f.id
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let other_assignments = sqlx::query_as::<_, OtherAssignment>(
            r#"
            SELECT o.id, o.member_id, o.shift_date, o.activity_name
            FROM other_assignments o
            JOIN members m ON m.id = o.member_id
            WHERE m.department_id = $1 AND o.shift_date BETWEEN $2 AND $3
            ORDER BY o.id
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let relationship_groups = sqlx::query_as::<_, RelationshipGroup>(
            r#"
            SELECT DISTINCT g.id, g.group_name, g.rule_type
            FROM relationship_groups g
            JOIN relationship_group_members gm ON gm.group_id = g.id
            JOIN members m ON m.id = gm.member_id
            WHERE m.department_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let relationship_group_members = sqlx::query_as::<_, RelationshipGroupMember>(
            r#"
            SELECT gm.group_id, gm.member_id
            FROM relationship_group_members gm
            JOIN members m ON m.id = gm.member_id
            WHERE m.department_id = $1
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(DepartmentInputs {
            department,
            members,
            day_groups,
            member_day_groups,
            availabilities,
            patterns,
            preferences,
            timeslot_requirements,
            specific_date_requirements,
            specific_timeslot_requirements,
            leave_requests,
            designated_holidays,
            paid_leaves,
            fixed_assignments,
            other_assignments,
            relationship_groups,
            relationship_group_members,
        })
    }
}
