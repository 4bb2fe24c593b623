//! Named contact groups.

use crate::GroupId;

/// A label a member defines to organize contacts. Names need not be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Replace the name. Empty names are accepted.
    pub fn rename(&mut self, new_name: impl Into<String>) {
        self.name = new_name.into();
    }
}
