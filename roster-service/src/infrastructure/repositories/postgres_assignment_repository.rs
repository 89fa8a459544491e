use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{DomainError, DomainResult};
use sqlx::PgPool;

use crate::domain::entities::Assignment;
use crate::domain::repositories::AssignmentRepository;

pub struct PostgresAssignmentRepository {
    pool: PgPool,
}

impl PostgresAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn replace_assignments(
        &self,
        department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        assignments: Vec<Assignment>,
    ) -> DomainResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            DELETE FROM assignments a
            USING members m
            WHERE a.member_id = m.id
              AND m.department_id = $1
              AND a.shift_date BETWEEN $2 AND $3
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .execute(&mut *transaction)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        for assignment in assignments {
            sqlx::query(
                r#"
                INSERT INTO assignments (member_id, shift_pattern_id, shift_date)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(assignment.member_id)
            .bind(assignment.shift_pattern_id)
            .bind(assignment.shift_date)
            .execute(&mut *transaction)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_in_range(
        &self,
        department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<Vec<Assignment>> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT a.member_id, a.shift_pattern_id, a.shift_date
            FROM assignments a
            JOIN members m ON m.id = a.member_id
            WHERE m.department_id = $1 AND a.shift_date BETWEEN $2 AND $3
            ORDER BY a.shift_date, a.member_id
            "#,
        )
        .bind(department_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(assignments)
    }
}
