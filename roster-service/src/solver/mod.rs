pub mod coverage;
pub mod diagnostics;
pub mod driver;
pub mod engine;
pub mod evaluate;
pub mod model;
pub mod normalizer;
pub mod score;

#[cfg(test)]
pub mod testutil;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::entities::Assignment;

pub use driver::{SolverConfig, SolverDriver};
pub use engine::CancelHandle;

/// Outcome of one solve call. `success` is false only when no feasible
/// roster was found; soft-constraint warnings keep it true.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub success: bool,
    pub assignments: Vec<Assignment>,
    pub infeasible_days: BTreeMap<String, Vec<String>>,
}

impl SolveReport {
    pub(crate) fn failure() -> Self {
        let mut infeasible_days = BTreeMap::new();
        infeasible_days.insert(
            diagnostics::GENERAL_KEY.to_string(),
            vec![diagnostics::INFEASIBLE_MESSAGE.to_string()],
        );
        Self {
            success: false,
            assignments: Vec::new(),
            infeasible_days,
        }
    }
}
