use async_trait::async_trait;
use shared::DomainResult;

use crate::domain::entities::SolverSettings;

/// Storage for per-department solver settings rows.
#[async_trait]
pub trait SolverSettingsRepository: Send + Sync {
    /// All settings rows for the department, any order.
    async fn list_for_department(&self, department_id: i64) -> DomainResult<Vec<SolverSettings>>;

    /// Insert a new settings row and return it with its assigned id.
    async fn insert(&self, settings: SolverSettings) -> DomainResult<SolverSettings>;

    /// Flip the default flag on one settings row.
    async fn set_default(&self, id: i64, is_default: bool) -> DomainResult<()>;
}
