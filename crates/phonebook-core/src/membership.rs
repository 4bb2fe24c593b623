//! The contact ↔ group join relation.

use chrono::NaiveDateTime;

use crate::{ContactId, GroupId};

/// Records that one contact belongs to one group.
///
/// The `(contact_id, group_id)` pair is the key; a member never holds two
/// memberships with the same pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub contact_id: ContactId,
    pub group_id: GroupId,
    pub added_at: NaiveDateTime,
}

impl Membership {
    pub fn new(contact_id: ContactId, group_id: GroupId) -> Self {
        Self {
            contact_id,
            group_id,
            added_at: crate::now(),
        }
    }

    pub fn matches(&self, contact_id: ContactId, group_id: GroupId) -> bool {
        self.contact_id == contact_id && self.group_id == group_id
    }
}
