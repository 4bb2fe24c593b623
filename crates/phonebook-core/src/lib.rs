//! # Phonebook Core
//!
//! The in-memory domain model for Phonebook: accounts, the address book each
//! member owns, and the operations that keep that graph consistent.
//!
//! This crate performs no filesystem or terminal I/O. Persistence and the
//! interactive driver live in the `phonebook` crate and only reach the
//! collections below through the operations exposed here.
//!
//! ## Model
//!
//! ```text
//! Directory
//!  ├── Admin*                     (credential only)
//!  ├── Member*
//!  │    ├── Contact*   ◀──┐
//!  │    ├── Group*     ◀──┤
//!  │    └── Membership* ──┘       (contact_id, group_id, added_at)
//!  └── ActivityLog                (last N timestamped messages)
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`credential`] | SHA-256 digests, verification, raw vs. pre-hashed secrets |
//! | [`contact`] | Address-book entries and tri-state edits |
//! | [`group`] | Named labels |
//! | [`membership`] | Contact ↔ group join records |
//! | [`account`] | `Member` aggregate and `Admin` account |
//! | [`activity`] | Bounded activity log |
//! | [`directory`] | Roster of all accounts plus the activity log |
//! | [`error`] | Typed errors for account management |

pub mod account;
pub mod activity;
pub mod contact;
pub mod credential;
pub mod directory;
pub mod error;
pub mod group;
pub mod membership;

pub use account::{Admin, Member};
pub use activity::ActivityLog;
pub use contact::{Contact, ContactDraft, ContactEdit, FieldEdit};
pub use credential::{PasswordDigest, Secret};
pub use directory::Directory;
pub use error::{DigestError, DirectoryError};
pub use group::Group;
pub use membership::Membership;

use chrono::{Local, NaiveDateTime};
use std::collections::BTreeSet;

/// Identifier of a contact, unique within its owning member.
pub type ContactId = u32;
/// Identifier of a group, unique within its owning member.
pub type GroupId = u32;
/// Identifier of an admin or member account.
pub type AccountId = u32;

/// Textual timestamp format used in the activity log and the snapshot.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current wall-clock time in the local timezone.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Next identifier for a collection: one past the largest id, or `first`
/// when empty.
///
/// When the largest id is `u32::MAX` the lowest unused id from `first` on is
/// taken instead.
pub(crate) fn next_id<I>(ids: I, first: u32) -> u32
where
    I: Iterator<Item = u32> + Clone,
{
    match ids.clone().max() {
        None => first,
        Some(max) => max
            .checked_add(1)
            .unwrap_or_else(|| lowest_free(ids, first)),
    }
}

fn lowest_free(ids: impl Iterator<Item = u32>, first: u32) -> u32 {
    let taken: BTreeSet<u32> = ids.collect();
    (first..=u32::MAX)
        .find(|id| !taken.contains(id))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(std::iter::empty(), 1), 1);
        assert_eq!(next_id(std::iter::empty(), 101), 101);
    }

    #[test]
    fn next_id_follows_the_largest() {
        assert_eq!(next_id([3, 7, 2].into_iter(), 1), 8);
    }

    #[test]
    fn next_id_at_u32_max_takes_lowest_free() {
        assert_eq!(next_id([u32::MAX].into_iter(), 1), 1);
        assert_eq!(next_id([1, 2, u32::MAX].into_iter(), 1), 3);
        assert_eq!(next_id([101, u32::MAX].into_iter(), 101), 102);
    }
}
