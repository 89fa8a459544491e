pub mod postgres_assignment_repository;
pub mod postgres_input_repository;
pub mod postgres_settings_repository;

pub use postgres_assignment_repository::PostgresAssignmentRepository;
pub use postgres_input_repository::PostgresInputRepository;
pub use postgres_settings_repository::PostgresSolverSettingsRepository;
