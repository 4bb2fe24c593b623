//! The roster of every account plus the activity log.
//!
//! A [`Directory`] is the whole in-memory state a driver works with: it is
//! what a snapshot decodes into and what gets written back after each
//! mutation. Admin-level member management lives here so that username
//! uniqueness and member id assignment are enforced in one place.

use crate::account::{Admin, Member};
use crate::activity::ActivityLog;
use crate::contact::ContactDraft;
use crate::credential::Secret;
use crate::error::DirectoryError;
use crate::{next_id, AccountId};

/// Id given to the first member when none exist.
pub const FIRST_MEMBER_ID: AccountId = 101;

#[derive(Debug, Clone, Default)]
pub struct Directory {
    admins: Vec<Admin>,
    members: Vec<Member>,
    log: ActivityLog,
}

impl Directory {
    pub fn new(admins: Vec<Admin>, members: Vec<Member>, log: ActivityLog) -> Self {
        Self {
            admins,
            members,
            log,
        }
    }

    /// An empty directory whose log keeps `log_capacity` entries.
    pub fn empty(log_capacity: usize) -> Self {
        Self::new(Vec::new(), Vec::new(), ActivityLog::new(log_capacity))
    }

    /// An empty directory holding the first-run sample data.
    pub fn seeded(log_capacity: usize) -> Self {
        let mut directory = Self::empty(log_capacity);
        directory.seed_sample_data();
        directory
    }

    /// Add the first-run sample data: one admin and one member with a
    /// contact and a group. Existing log lines are kept.
    pub fn seed_sample_data(&mut self) {
        let admin_id = next_id(self.admins.iter().map(Admin::id), 1);
        self.admins.push(Admin::new(admin_id, "admin", Secret::raw("123456")));

        let created = self
            .create_member("student", Secret::raw("123"), "student@example.com")
            .map(Member::id);
        if let Some(member) = created.ok().and_then(|id| self.member_mut(id)) {
            member.add_contact(
                ContactDraft::new("Dad", "090111")
                    .email("dad@example.com")
                    .address("Home")
                    .notes("Family"),
            );
            member.create_group("Family");
        }
        self.record("System initialized with sample data.");
    }

    /// True when there are no accounts at all (the log is not considered).
    pub fn has_no_accounts(&self) -> bool {
        self.admins.is_empty() && self.members.is_empty()
    }

    pub fn admins(&self) -> &[Admin] {
        &self.admins
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Append a timestamped message to the activity log.
    pub fn record(&mut self, message: impl AsRef<str>) {
        self.log.record(message);
    }

    // ─── Lookup ──────────────────────────────────────────────────────

    pub fn find_admin(&self, username: &str) -> Option<&Admin> {
        self.admins.iter().find(|a| a.username() == username)
    }

    pub fn find_member(&self, username: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.username() == username)
    }

    pub fn member(&self, id: AccountId) -> Option<&Member> {
        self.members.iter().find(|m| m.id() == id)
    }

    pub fn member_mut(&mut self, id: AccountId) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.id() == id)
    }

    /// Log a member in by username. Returns the member id on success.
    pub fn authenticate_member(&self, username: &str, secret: &str) -> Option<AccountId> {
        self.find_member(username)
            .filter(|m| m.login(secret))
            .map(Member::id)
    }

    /// Log an admin in by username. Returns the admin id on success.
    pub fn authenticate_admin(&self, username: &str, secret: &str) -> Option<AccountId> {
        self.find_admin(username)
            .filter(|a| a.login(secret))
            .map(Admin::id)
    }

    // ─── Member management ───────────────────────────────────────────

    /// Create a member account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::UsernameTaken`] if another member already
    /// uses `username`.
    pub fn create_member(
        &mut self,
        username: &str,
        secret: Secret,
        email: &str,
    ) -> Result<&Member, DirectoryError> {
        if self.find_member(username).is_some() {
            return Err(DirectoryError::UsernameTaken(username.to_string()));
        }
        let id = next_id(self.members.iter().map(Member::id), FIRST_MEMBER_ID);
        self.members.push(Member::new(id, username, secret, email));
        Ok(&self.members[self.members.len() - 1])
    }

    /// Delete a member together with its whole address book.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::MemberNotFound`] if no member has this id.
    pub fn delete_member(&mut self, id: AccountId) -> Result<Member, DirectoryError> {
        let index = self
            .members
            .iter()
            .position(|m| m.id() == id)
            .ok_or(DirectoryError::MemberNotFound(id))?;
        Ok(self.members.remove(index))
    }

    /// Lock or unlock a member account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::MemberNotFound`] if no member has this id.
    pub fn set_member_active(&mut self, id: AccountId, active: bool) -> Result<(), DirectoryError> {
        let member = self
            .member_mut(id)
            .ok_or(DirectoryError::MemberNotFound(id))?;
        member.set_active(active);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_accounts() {
        let dir = Directory::seeded(100);
        assert!(dir.authenticate_admin("admin", "123456").is_some());
        assert_eq!(dir.authenticate_member("student", "123"), Some(FIRST_MEMBER_ID));

        let member = dir.find_member("student").unwrap();
        assert_eq!(member.contacts().len(), 1);
        assert_eq!(member.groups().len(), 1);
        assert_eq!(dir.log().len(), 1);
    }

    #[test]
    fn test_authenticate_rejects_bad_credentials() {
        let dir = Directory::seeded(100);
        assert!(dir.authenticate_member("student", "wrong").is_none());
        assert!(dir.authenticate_member("nobody", "123").is_none());
        assert!(dir.authenticate_admin("student", "123").is_none());
    }

    #[test]
    fn test_create_member_ids() {
        let mut dir = Directory::empty(100);
        let a = dir.create_member("a", Secret::raw("1"), "").unwrap().id();
        let b = dir.create_member("b", Secret::raw("1"), "").unwrap().id();
        assert_eq!((a, b), (FIRST_MEMBER_ID, FIRST_MEMBER_ID + 1));
    }

    #[test]
    fn test_create_member_rejects_duplicate_username() {
        let mut dir = Directory::seeded(100);
        let err = dir
            .create_member("student", Secret::raw("x"), "x@example.com")
            .unwrap_err();
        assert_eq!(err, DirectoryError::UsernameTaken("student".to_string()));
        assert_eq!(dir.members().len(), 1);
    }

    #[test]
    fn test_delete_member() {
        let mut dir = Directory::seeded(100);
        let removed = dir.delete_member(FIRST_MEMBER_ID).unwrap();
        assert_eq!(removed.username(), "student");
        assert!(dir.members().is_empty());
        assert_eq!(
            dir.delete_member(FIRST_MEMBER_ID).unwrap_err(),
            DirectoryError::MemberNotFound(FIRST_MEMBER_ID)
        );
    }

    #[test]
    fn test_locked_member_cannot_authenticate() {
        let mut dir = Directory::seeded(100);
        dir.set_member_active(FIRST_MEMBER_ID, false).unwrap();
        assert!(dir.authenticate_member("student", "123").is_none());
        assert!(dir.set_member_active(7, true).is_err());
    }

    #[test]
    fn test_member_mut_reaches_aggregate() {
        let mut dir = Directory::seeded(100);
        let member = dir.member_mut(FIRST_MEMBER_ID).unwrap();
        member.add_contact(ContactDraft::new("Mom", "090222"));
        assert_eq!(dir.member(FIRST_MEMBER_ID).unwrap().contacts().len(), 2);
    }

    #[test]
    fn test_member_id_after_largest_possible_id() {
        let last = Member::new(u32::MAX, "last", Secret::raw("1"), "");
        let mut dir = Directory::new(Vec::new(), vec![last], ActivityLog::default());
        let id = dir.create_member("next", Secret::raw("1"), "").unwrap().id();
        assert_eq!(id, FIRST_MEMBER_ID);
    }
}
