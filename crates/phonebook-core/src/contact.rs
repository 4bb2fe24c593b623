//! Address-book entries.
//!
//! A [`Contact`] is created through [`Member::add_contact`](crate::Member::add_contact)
//! from a [`ContactDraft`] and changed through a [`ContactEdit`], where every
//! field states explicitly whether it is replaced or left alone.

use chrono::NaiveDateTime;

use crate::ContactId;

/// A single address-book entry owned by one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
    /// Set by every call to [`Contact::update_details`], even a no-op one.
    pub updated_at: Option<NaiveDateTime>,
    pub last_viewed_at: Option<NaiveDateTime>,
}

impl Contact {
    pub fn new(id: ContactId, draft: ContactDraft) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            address: draft.address,
            notes: draft.notes,
            created_at: crate::now(),
            updated_at: None,
            last_viewed_at: None,
        }
    }

    /// Apply an edit. Fields marked [`FieldEdit::Unchanged`] keep their value.
    pub fn update_details(&mut self, edit: ContactEdit) {
        edit.name.apply(&mut self.name);
        edit.phone.apply(&mut self.phone);
        edit.email.apply(&mut self.email);
        edit.address.apply(&mut self.address);
        edit.notes.apply(&mut self.notes);
        self.updated_at = Some(crate::now());
    }

    /// Record that the contact was just viewed.
    pub fn mark_viewed(&mut self) {
        self.last_viewed_at = Some(crate::now());
    }
}

/// Field values for a new contact. Only name and phone are required.
///
/// ```rust
/// use phonebook_core::ContactDraft;
///
/// let draft = ContactDraft::new("Alpha", "0901").email("alpha@example.com");
/// assert_eq!(draft.notes, "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// A single field of an edit: keep the current value or replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldEdit {
    #[default]
    Unchanged,
    SetTo(String),
}

impl FieldEdit {
    /// Interpret a line of user input: blank means "keep", anything else
    /// replaces the field with the trimmed text.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self::Unchanged
        } else {
            Self::SetTo(trimmed.to_string())
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    fn apply(self, field: &mut String) {
        if let Self::SetTo(value) = self {
            *field = value;
        }
    }
}

/// Changes to apply to a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEdit {
    pub name: FieldEdit,
    pub phone: FieldEdit,
    pub email: FieldEdit,
    pub address: FieldEdit,
    pub notes: FieldEdit,
}

impl ContactEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = FieldEdit::SetTo(name.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = FieldEdit::SetTo(phone.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = FieldEdit::SetTo(email.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = FieldEdit::SetTo(address.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = FieldEdit::SetTo(notes.into());
        self
    }

    /// True when the edit would not change any field.
    pub fn is_empty(&self) -> bool {
        self.name.is_unchanged()
            && self.phone.is_unchanged()
            && self.email.is_unchanged()
            && self.address.is_unchanged()
            && self.notes.is_unchanged()
    }
}
