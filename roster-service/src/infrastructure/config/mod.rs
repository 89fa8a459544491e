use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub solver: SolverTuning,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

/// Process-level solver tuning. Per-department weights live in the
/// solver_settings table, not here.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SolverTuning {
    pub max_wall_seconds: f64,
    pub seed: u64,
    pub max_steps: Option<u64>,
}

impl Default for SolverTuning {
    fn default() -> Self {
        let defaults = crate::solver::SolverConfig::default();
        Self {
            max_wall_seconds: defaults.max_wall_seconds,
            seed: defaults.seed,
            max_steps: defaults.max_steps,
        }
    }
}

impl From<SolverTuning> for crate::solver::SolverConfig {
    fn from(tuning: SolverTuning) -> Self {
        Self {
            max_wall_seconds: tuning.max_wall_seconds,
            max_steps: tuning.max_steps,
            seed: tuning.seed,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
