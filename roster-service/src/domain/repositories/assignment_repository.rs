use async_trait::async_trait;
use chrono::NaiveDate;
use shared::DomainResult;

use crate::domain::entities::Assignment;

/// Write-side persistence collaborator of the solver.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Atomically delete the department's assignments inside the range and
    /// insert the replacements.
    async fn replace_assignments(
        &self,
        department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        assignments: Vec<Assignment>,
    ) -> DomainResult<()>;

    /// Find the department's assignments inside the range.
    async fn find_in_range(
        &self,
        department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<Vec<Assignment>>;
}
