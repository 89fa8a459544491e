use serde::{Deserialize, Serialize};
use shared::RelationshipRule;
use sqlx::FromRow;

/// Group of members bound by one rule: `incompatible` members may not share
/// a time slot; `pairing` members are rewarded for working the same shift.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RelationshipGroup {
    pub id: i64,
    pub group_name: String,
    pub rule_type: RelationshipRule,
}

/// Membership row tying a member into a relationship group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RelationshipGroupMember {
    pub group_id: i64,
    pub member_id: i64,
}
