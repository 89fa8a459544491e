//! Monthly roster generation for a multi-department business.
//!
//! The crate is organized in three layers: `domain` holds the value records
//! and repository traits, `solver` holds the five-stage scheduling core
//! (normalizer, slot coverage, model builder, search engine with driver,
//! diagnostics), and `infrastructure` provides configuration plus Postgres
//! implementations of the repository traits.

pub mod domain;
pub mod infrastructure;
pub mod solver;
