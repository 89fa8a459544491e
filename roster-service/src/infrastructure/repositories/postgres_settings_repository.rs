use async_trait::async_trait;
use shared::{DomainError, DomainResult};
use sqlx::PgPool;

use crate::domain::entities::SolverSettings;
use crate::domain::repositories::SolverSettingsRepository;

pub struct PostgresSolverSettingsRepository {
    pool: PgPool,
}

impl PostgresSolverSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SolverSettingsRepository for PostgresSolverSettingsRepository {
    async fn list_for_department(&self, department_id: i64) -> DomainResult<Vec<SolverSettings>> {
        let rows = sqlx::query_as::<_, SolverSettings>(
            r#"
            SELECT id, department_id, is_default, headcount_penalty_cost,
                   unavailable_day_penalty, incompatible_penalty, holiday_violation_penalty,
                   consecutive_work_violation_penalty, salary_too_low_penalty,
                   salary_too_high_penalty, work_day_deviation_penalty,
                   difficulty_bonus_weight, shift_preference_bonus, pairing_bonus
            FROM solver_settings
            WHERE department_id = $1
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(rows)
    }

    async fn insert(&self, settings: SolverSettings) -> DomainResult<SolverSettings> {
        let inserted = sqlx::query_as::<_, SolverSettings>(
            r#"
            INSERT INTO solver_settings (
                department_id, is_default, headcount_penalty_cost, unavailable_day_penalty,
                incompatible_penalty, holiday_violation_penalty,
                consecutive_work_violation_penalty, salary_too_low_penalty,
                salary_too_high_penalty, work_day_deviation_penalty,
                difficulty_bonus_weight, shift_preference_bonus, pairing_bonus
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, department_id, is_default, headcount_penalty_cost,
                      unavailable_day_penalty, incompatible_penalty,
                      holiday_violation_penalty, consecutive_work_violation_penalty,
                      salary_too_low_penalty, salary_too_high_penalty,
                      work_day_deviation_penalty, difficulty_bonus_weight,
                      shift_preference_bonus, pairing_bonus
            "#,
        )
        .bind(settings.department_id)
        .bind(settings.is_default)
        .bind(settings.headcount_penalty_cost)
        .bind(settings.unavailable_day_penalty)
        .bind(settings.incompatible_penalty)
        .bind(settings.holiday_violation_penalty)
        .bind(settings.consecutive_work_violation_penalty)
        .bind(settings.salary_too_low_penalty)
        .bind(settings.salary_too_high_penalty)
        .bind(settings.work_day_deviation_penalty)
        .bind(settings.difficulty_bonus_weight)
        .bind(settings.shift_preference_bonus)
        .bind(settings.pairing_bonus)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(inserted)
    }

    async fn set_default(&self, id: i64, is_default: bool) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE solver_settings
            SET is_default = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(is_default)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
