pub mod assignment;
pub mod department;
pub mod exception;
pub mod member;
pub mod relationship;
pub mod requirement;
pub mod shift_pattern;
pub mod solver_settings;

pub use assignment::Assignment;
pub use department::Department;
pub use exception::{
    DesignatedHoliday, FixedAssignment, LeaveRequest, OtherAssignment, PaidLeave,
};
pub use member::{EmployeeKind, Member, MemberAvailability, MemberDayGroup, ShiftPreference};
pub use relationship::{RelationshipGroup, RelationshipGroupMember};
pub use requirement::{
    SpecificDateRequirement, SpecificTimeSlotRequirement, TimeSlotRequirement,
};
pub use shift_pattern::{minute_of_day, DayGroup, ShiftPattern, MINUTES_PER_DAY};
pub use solver_settings::SolverSettings;
