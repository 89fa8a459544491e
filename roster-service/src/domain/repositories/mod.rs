pub mod assignment_repository;
pub mod input_repository;
pub mod settings_repository;

pub use assignment_repository::AssignmentRepository;
pub use input_repository::{DepartmentInputRepository, DepartmentInputs};
pub use settings_repository::SolverSettingsRepository;
