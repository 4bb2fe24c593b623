//! Accounts: the [`Member`] aggregate and the [`Admin`] account.
//!
//! A member exclusively owns its contacts, groups, and memberships. The
//! collections are private; every change goes through the operations below,
//! which keep three invariants:
//!
//! - contact and group ids are unique within the member, assigned as
//!   `max(existing) + 1` (or 1 for an empty collection);
//! - no two memberships share a `(contact_id, group_id)` pair;
//! - deleting a contact or group removes every membership that references it
//!   in the same call.
//!
//! Lookups that miss report `false`/`None` and leave state untouched.

use std::collections::HashSet;

use crate::contact::{Contact, ContactDraft, ContactEdit};
use crate::credential::{self, PasswordDigest, Secret};
use crate::group::Group;
use crate::membership::Membership;
use crate::{next_id, AccountId, ContactId, GroupId};

/// A regular user with a personal address book.
#[derive(Debug, Clone)]
pub struct Member {
    id: AccountId,
    username: String,
    password: PasswordDigest,
    email: String,
    is_active: bool,
    contacts: Vec<Contact>,
    groups: Vec<Group>,
    memberships: Vec<Membership>,
}

/// Every stored field of a [`Member`], used to rebuild one from a snapshot.
#[derive(Debug, Clone)]
pub struct MemberParts {
    pub id: AccountId,
    pub username: String,
    pub password: PasswordDigest,
    pub email: String,
    pub is_active: bool,
    pub contacts: Vec<Contact>,
    pub groups: Vec<Group>,
    pub memberships: Vec<Membership>,
}

impl Member {
    /// Create an active member with an empty address book.
    pub fn new(
        id: AccountId,
        username: impl Into<String>,
        secret: Secret,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: secret.into_digest(),
            email: email.into(),
            is_active: true,
            contacts: Vec::new(),
            groups: Vec::new(),
            memberships: Vec::new(),
        }
    }

    /// Rebuild a member from stored parts.
    ///
    /// Contacts and groups that repeat an earlier id are dropped, keeping
    /// the first. Memberships that point at a missing contact or group, or
    /// that repeat an earlier pair, are dropped too.
    pub fn restore(parts: MemberParts) -> Self {
        let mut contact_ids = HashSet::new();
        let mut contacts = parts.contacts;
        contacts.retain(|c| contact_ids.insert(c.id));

        let mut group_ids = HashSet::new();
        let mut groups = parts.groups;
        groups.retain(|g| group_ids.insert(g.id));

        let mut member = Self {
            id: parts.id,
            username: parts.username,
            password: parts.password,
            email: parts.email,
            is_active: parts.is_active,
            contacts,
            groups,
            memberships: Vec::with_capacity(parts.memberships.len()),
        };
        for link in parts.memberships {
            if member.has_contact(link.contact_id)
                && member.has_group(link.group_id)
                && !member.is_in_group(link.contact_id, link.group_id)
            {
                member.memberships.push(link);
            }
        }
        member
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_digest(&self) -> &PasswordDigest {
        &self.password
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Lock or unlock the account. A locked member cannot log in.
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// True iff the secret matches and the account is active.
    pub fn login(&self, secret: &str) -> bool {
        credential::verify(&self.password, secret) && self.is_active
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    // ─── Contacts ────────────────────────────────────────────────────

    /// Add a contact under the next free id and return it.
    pub fn add_contact(&mut self, draft: ContactDraft) -> &Contact {
        let id = next_id(self.contacts.iter().map(|c| c.id), 1);
        self.contacts.push(Contact::new(id, draft));
        &self.contacts[self.contacts.len() - 1]
    }

    /// Look up a contact without recording a view.
    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    fn contact_mut(&mut self, id: ContactId) -> Option<&mut Contact> {
        self.contacts.iter_mut().find(|c| c.id == id)
    }

    fn has_contact(&self, id: ContactId) -> bool {
        self.contacts.iter().any(|c| c.id == id)
    }

    /// Apply an edit to a contact. Returns `false` if the id is unknown.
    pub fn edit_contact(&mut self, id: ContactId, edit: ContactEdit) -> bool {
        match self.contact_mut(id) {
            Some(contact) => {
                contact.update_details(edit);
                true
            }
            None => false,
        }
    }

    /// Delete a contact and every membership that references it.
    ///
    /// Returns `true` if the contact existed.
    pub fn delete_contact(&mut self, id: ContactId) -> bool {
        self.memberships.retain(|m| m.contact_id != id);
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        self.contacts.len() < before
    }

    /// Mark a contact viewed and return it.
    pub fn view_contact(&mut self, id: ContactId) -> Option<&Contact> {
        let contact = self.contact_mut(id)?;
        contact.mark_viewed();
        Some(&*contact)
    }

    /// Viewed contacts, most recently viewed first.
    pub fn recent_contacts(&self) -> Vec<&Contact> {
        let mut viewed: Vec<&Contact> = self
            .contacts
            .iter()
            .filter(|c| c.last_viewed_at.is_some())
            .collect();
        viewed.sort_by(|a, b| b.last_viewed_at.cmp(&a.last_viewed_at));
        viewed
    }

    /// Case-insensitive substring search on contact names.
    ///
    /// The keyword is trimmed first; an empty keyword matches every contact.
    pub fn search_by_name(&self, keyword: &str) -> Vec<&Contact> {
        let needle = keyword.trim().to_lowercase();
        self.contacts
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect()
    }

    // ─── Groups ──────────────────────────────────────────────────────

    /// Create a group under the next free id and return it.
    pub fn create_group(&mut self, name: impl Into<String>) -> &Group {
        let id = next_id(self.groups.iter().map(|g| g.id), 1);
        self.groups.push(Group::new(id, name));
        &self.groups[self.groups.len() - 1]
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    fn has_group(&self, id: GroupId) -> bool {
        self.groups.iter().any(|g| g.id == id)
    }

    /// Delete a group and every membership that references it.
    ///
    /// Returns `true` if the group existed.
    pub fn remove_group(&mut self, id: GroupId) -> bool {
        if !self.has_group(id) {
            return false;
        }
        self.memberships.retain(|m| m.group_id != id);
        self.groups.retain(|g| g.id != id);
        true
    }

    /// Rename a group. Returns `false` if the id is unknown.
    pub fn rename_group(&mut self, id: GroupId, new_name: impl Into<String>) -> bool {
        match self.groups.iter_mut().find(|g| g.id == id) {
            Some(group) => {
                group.rename(new_name);
                true
            }
            None => false,
        }
    }

    // ─── Memberships ─────────────────────────────────────────────────

    fn is_in_group(&self, contact_id: ContactId, group_id: GroupId) -> bool {
        self.memberships
            .iter()
            .any(|m| m.matches(contact_id, group_id))
    }

    /// Put a contact into a group.
    ///
    /// Returns `false` without changing anything if either id is unknown or
    /// the contact is already in the group.
    pub fn add_contact_to_group(&mut self, contact_id: ContactId, group_id: GroupId) -> bool {
        if !self.has_contact(contact_id)
            || !self.has_group(group_id)
            || self.is_in_group(contact_id, group_id)
        {
            return false;
        }
        self.memberships.push(Membership::new(contact_id, group_id));
        true
    }

    /// Take a contact out of a group. Returns `true` if it was a member.
    pub fn remove_contact_from_group(&mut self, contact_id: ContactId, group_id: GroupId) -> bool {
        let before = self.memberships.len();
        self.memberships.retain(|m| !m.matches(contact_id, group_id));
        self.memberships.len() < before
    }

    /// Contacts in a group, in the order they were added to it.
    pub fn contacts_in_group(&self, group_id: GroupId) -> Vec<&Contact> {
        self.memberships
            .iter()
            .filter(|m| m.group_id == group_id)
            .filter_map(|m| self.contact(m.contact_id))
            .collect()
    }
}

/// An administrator. Admins own no address book; they manage members.
#[derive(Debug, Clone)]
pub struct Admin {
    id: AccountId,
    username: String,
    password: PasswordDigest,
}

impl Admin {
    pub fn new(id: AccountId, username: impl Into<String>, secret: Secret) -> Self {
        Self {
            id,
            username: username.into(),
            password: secret.into_digest(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_digest(&self) -> &PasswordDigest {
        &self.password
    }

    pub fn login(&self, secret: &str) -> bool {
        credential::verify(&self.password, secret)
    }
}
