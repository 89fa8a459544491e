use async_trait::async_trait;
use chrono::NaiveDate;
use shared::DomainResult;

use crate::domain::entities::{
    Department, DesignatedHoliday, DayGroup, FixedAssignment, LeaveRequest, Member,
    MemberAvailability, MemberDayGroup, OtherAssignment, PaidLeave, RelationshipGroup,
    RelationshipGroupMember, ShiftPattern, ShiftPreference, SpecificDateRequirement,
    SpecificTimeSlotRequirement, TimeSlotRequirement,
};

/// Snapshot of every record the solver consumes for one department and one
/// inclusive date range. Date-scoped tables are already restricted to the
/// range; the normalizer re-validates before building derived tables.
#[derive(Debug, Clone, Default)]
pub struct DepartmentInputs {
    pub department: Option<Department>,
    pub members: Vec<Member>,
    pub day_groups: Vec<DayGroup>,
    pub member_day_groups: Vec<MemberDayGroup>,
    pub availabilities: Vec<MemberAvailability>,
    pub patterns: Vec<ShiftPattern>,
    pub preferences: Vec<ShiftPreference>,
    pub timeslot_requirements: Vec<TimeSlotRequirement>,
    pub specific_date_requirements: Vec<SpecificDateRequirement>,
    pub specific_timeslot_requirements: Vec<SpecificTimeSlotRequirement>,
    pub leave_requests: Vec<LeaveRequest>,
    pub designated_holidays: Vec<DesignatedHoliday>,
    pub paid_leaves: Vec<PaidLeave>,
    pub fixed_assignments: Vec<FixedAssignment>,
    pub other_assignments: Vec<OtherAssignment>,
    pub relationship_groups: Vec<RelationshipGroup>,
    pub relationship_group_members: Vec<RelationshipGroupMember>,
}

/// Read-side persistence collaborator of the solver.
#[async_trait]
pub trait DepartmentInputRepository: Send + Sync {
    /// Pure snapshot read of all department records for the range.
    async fn load_department_inputs(
        &self,
        department_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<DepartmentInputs>;
}
