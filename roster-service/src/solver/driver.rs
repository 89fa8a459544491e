use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use shared::{DomainError, DomainResult};

use crate::domain::entities::SolverSettings;
use crate::domain::repositories::{
    AssignmentRepository, DepartmentInputRepository, SolverSettingsRepository,
};

use super::diagnostics;
use super::engine::{CancelHandle, Engine, EngineConfig, SolveStatus};
use super::model::RosterModel;
use super::normalizer::normalize;
use super::SolveReport;

/// Process-level solver tuning; per-department weights live in the
/// `SolverSettings` record instead.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub max_wall_seconds: f64,
    pub max_steps: Option<u64>,
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            max_wall_seconds: engine.time_limit.as_secs_f64(),
            max_steps: engine.max_steps,
            seed: engine.seed,
        }
    }
}

/// Orchestrates one solve: settings provisioning, snapshot load,
/// normalization, search on a blocking worker, transactional persistence
/// and diagnostics.
pub struct SolverDriver {
    input_repo: Arc<dyn DepartmentInputRepository>,
    assignment_repo: Arc<dyn AssignmentRepository>,
    settings_repo: Arc<dyn SolverSettingsRepository>,
    config: SolverConfig,
}

impl SolverDriver {
    pub fn new(
        input_repo: Arc<dyn DepartmentInputRepository>,
        assignment_repo: Arc<dyn AssignmentRepository>,
        settings_repo: Arc<dyn SolverSettingsRepository>,
        config: SolverConfig,
    ) -> Self {
        Self {
            input_repo,
            assignment_repo,
            settings_repo,
            config,
        }
    }

    /// Generate and persist the roster for one department and range.
    pub async fn generate(
        &self,
        department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<SolveReport> {
        self.generate_with_cancel(department_id, start_date, end_date, CancelHandle::new())
            .await
    }

    /// As [`generate`](Self::generate), stopping early when the handle is
    /// signalled: the best feasible roster found so far is accepted, or the
    /// run fails when none exists.
    pub async fn generate_with_cancel(
        &self,
        department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        cancel: CancelHandle,
    ) -> DomainResult<SolveReport> {
        tracing::info!(department_id, %start_date, %end_date, "generating roster");

        let settings = self.ensure_settings(department_id).await?;
        let inputs = self
            .input_repo
            .load_department_inputs(department_id, start_date, end_date)
            .await?;
        let normalized = normalize(inputs, settings, start_date, end_date)?;

        let engine_config = EngineConfig {
            time_limit: Duration::from_secs_f64(self.config.max_wall_seconds),
            max_steps: self.config.max_steps,
            seed: self.config.seed,
        };
        let handle = cancel.clone();
        let (model, outcome) = tokio::task::spawn_blocking(move || {
            let model = RosterModel::build(&normalized);
            if !model.contradictions.is_empty() {
                return (model, None);
            }
            let outcome = Engine::new(engine_config).solve(&model, &handle);
            (model, Some(outcome))
        })
        .await
        .map_err(|e| DomainError::InternalError(format!("solver task failed: {e}")))?;

        let Some(outcome) = outcome else {
            tracing::warn!(
                department_id,
                contradictions = ?model.contradictions,
                "model holds mutually unsatisfiable hard constraints"
            );
            return Ok(SolveReport::failure());
        };

        match outcome.status {
            SolveStatus::Infeasible => {
                tracing::warn!(
                    department_id,
                    score = %outcome.breakdown.score,
                    steps = outcome.steps,
                    "no feasible roster found; nothing persisted"
                );
                Ok(SolveReport::failure())
            }
            SolveStatus::Feasible => {
                let assignments = outcome.roster.to_assignments(&model);
                self.assignment_repo
                    .replace_assignments(department_id, start_date, end_date, assignments.clone())
                    .await?;
                let infeasible_days = diagnostics::extract(&model, &outcome.breakdown);
                tracing::info!(
                    department_id,
                    assignments = assignments.len(),
                    warnings = infeasible_days.values().map(Vec::len).sum::<usize>(),
                    steps = outcome.steps,
                    score = %outcome.breakdown.score,
                    "roster stored"
                );
                Ok(SolveReport {
                    success: true,
                    assignments,
                    infeasible_days,
                })
            }
        }
    }

    /// Resolve the department's settings row: create a default-valued one
    /// when absent, promote the first row when none is flagged default, and
    /// demote extras when several are.
    async fn ensure_settings(&self, department_id: i64) -> DomainResult<SolverSettings> {
        let mut rows = self.settings_repo.list_for_department(department_id).await?;
        if rows.is_empty() {
            tracing::info!(department_id, "creating default solver settings");
            return self
                .settings_repo
                .insert(SolverSettings::default_for(department_id))
                .await;
        }
        rows.sort_by_key(|s| s.id);

        let default_ids: Vec<i64> = rows.iter().filter(|s| s.is_default).map(|s| s.id).collect();
        let chosen_id = match default_ids.as_slice() {
            [] => {
                let id = rows[0].id;
                self.settings_repo.set_default(id, true).await?;
                id
            }
            [only] => *only,
            [keep, extras @ ..] => {
                for &extra in extras {
                    self.settings_repo.set_default(extra, false).await?;
                }
                *keep
            }
        };

        let mut chosen = rows
            .into_iter()
            .find(|s| s.id == chosen_id)
            .ok_or_else(|| {
                DomainError::InternalError("settings row vanished during provisioning".to_string())
            })?;
        chosen.is_default = true;
        Ok(chosen)
    }
}
