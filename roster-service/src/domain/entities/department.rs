use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Department entity; container for every other record the solver reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
}
