//! Interactive text menu.
//!
//! Drives a [`Phonebook`] session from line-oriented input: login, the
//! member and admin dashboards, and the group submenu. Every successful
//! mutation is recorded in the activity log and committed to the snapshot.
//!
//! Input and output are generic so the whole menu can be scripted in tests.
//! End of input behaves like choosing "Exit".

use anyhow::Result;
use std::io::{BufRead, Write};

use phonebook_core::{AccountId, Contact, ContactDraft, ContactEdit, FieldEdit, Secret};

use crate::app::Phonebook;

/// Whether the menu loop should keep reading input.
enum Flow {
    Continue,
    Quit,
}

pub struct Menu<'a, R, W> {
    app: &'a mut Phonebook,
    input: R,
    output: W,
}

/// Phone numbers are digits only.
pub fn is_valid_phone(phone: &str) -> bool {
    !phone.is_empty() && phone.chars().all(|c| c.is_ascii_digit())
}

fn parse_id(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(app: &'a mut Phonebook, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    /// Run the main menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== PHONE BOOK ===")?;
            writeln!(self.output, "1. Member login")?;
            writeln!(self.output, "2. Admin login")?;
            writeln!(self.output, "3. Exit")?;
            let Some(choice) = self.prompt("Choose: ")? else {
                break;
            };
            let flow = match choice.as_str() {
                "1" => self.member_login()?,
                "2" => self.admin_login()?,
                "3" => Flow::Quit,
                _ => Flow::Continue,
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        self.commit(Some("System shutdown."))?;
        writeln!(self.output, "Goodbye.")?;
        Ok(())
    }

    // ─── Input helpers ───────────────────────────────────────────────

    /// Read one line with surrounding whitespace trimmed. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        Ok(self.prompt_raw(label)?.map(|line| line.trim().to_string()))
    }

    /// Read one line keeping everything but the line terminator.
    fn prompt_raw(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Read an id. Prints a notice and yields `Some(None)` for non-numeric input.
    fn prompt_id(&mut self, label: &str) -> Result<Option<Option<u32>>> {
        let Some(text) = self.prompt(label)? else {
            return Ok(None);
        };
        let id = parse_id(&text);
        if id.is_none() {
            writeln!(self.output, "Invalid id.")?;
        }
        Ok(Some(id))
    }

    fn commit(&mut self, message: Option<&str>) -> Result<()> {
        if !self.app.commit(message) {
            writeln!(
                self.output,
                "Warning: changes could not be saved to {}.",
                self.app.config().storage.path.display()
            )?;
        }
        Ok(())
    }

    fn print_contact_row(&mut self, contact: &Contact) -> Result<()> {
        writeln!(
            self.output,
            "{:<5} {:<20} {:<15}",
            contact.id, contact.name, contact.phone
        )?;
        Ok(())
    }

    // ─── Login ───────────────────────────────────────────────────────

    fn member_login(&mut self) -> Result<Flow> {
        writeln!(self.output, "--- MEMBER LOGIN ---")?;
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(secret) = self.prompt_raw("Password: ")? else {
            return Ok(Flow::Quit);
        };

        match self.app.directory().authenticate_member(&username, &secret) {
            Some(id) => {
                writeln!(self.output, "Login successful. Welcome, {}.", username)?;
                self.commit(Some(&format!("Member '{}' logged in.", username)))?;
                self.member_dashboard(id)
            }
            None => {
                writeln!(self.output, "Login failed: wrong username or password.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn admin_login(&mut self) -> Result<Flow> {
        writeln!(self.output, "--- ADMIN LOGIN ---")?;
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(secret) = self.prompt_raw("Password: ")? else {
            return Ok(Flow::Quit);
        };

        match self.app.directory().authenticate_admin(&username, &secret) {
            Some(_) => {
                writeln!(self.output, "Login successful. Welcome, admin {}.", username)?;
                self.commit(Some(&format!("Admin '{}' logged in.", username)))?;
                self.admin_dashboard()
            }
            None => {
                writeln!(self.output, "Login failed: wrong admin username or password.")?;
                Ok(Flow::Continue)
            }
        }
    }

    // ─── Member dashboard ────────────────────────────────────────────

    fn member_dashboard(&mut self, id: AccountId) -> Result<Flow> {
        loop {
            let Some(username) = self
                .app
                .directory()
                .member(id)
                .map(|m| m.username().to_string())
            else {
                return Ok(Flow::Continue);
            };

            writeln!(self.output)?;
            writeln!(self.output, "--- MENU: {} ---", username)?;
            writeln!(self.output, "1. List contacts")?;
            writeln!(self.output, "2. Add contact")?;
            writeln!(self.output, "3. Edit contact")?;
            writeln!(self.output, "4. Delete contact")?;
            writeln!(self.output, "5. Recently viewed")?;
            writeln!(self.output, "6. Create group")?;
            writeln!(self.output, "7. Delete group")?;
            writeln!(self.output, "8. Manage group members")?;
            writeln!(self.output, "9. Search by name")?;
            writeln!(self.output, "0. Log out")?;
            let Some(choice) = self.prompt("Choose: ")? else {
                return Ok(Flow::Quit);
            };

            let flow = match choice.as_str() {
                "1" => self.list_contacts(id)?,
                "2" => self.add_contact(id, &username)?,
                "3" => self.edit_contact(id, &username)?,
                "4" => self.delete_contact(id, &username)?,
                "5" => self.recent_contacts(id)?,
                "6" => self.create_group(id, &username)?,
                "7" => self.delete_group(id, &username)?,
                "8" => self.group_menu(id, &username)?,
                "9" => self.search(id)?,
                "0" => return Ok(Flow::Continue),
                _ => Flow::Continue,
            };
            if let Flow::Quit = flow {
                return Ok(Flow::Quit);
            }
        }
    }

    fn list_contacts(&mut self, id: AccountId) -> Result<Flow> {
        let contacts: Vec<Contact> = match self.app.directory().member(id) {
            Some(member) => member.contacts().to_vec(),
            None => return Ok(Flow::Continue),
        };
        writeln!(self.output, "--- Contacts ({}) ---", contacts.len())?;
        writeln!(self.output, "{:<5} {:<20} {:<15}", "ID", "NAME", "PHONE")?;
        for contact in &contacts {
            self.print_contact_row(contact)?;
        }
        Ok(Flow::Continue)
    }

    fn add_contact(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        let Some(name) = self.prompt("Name: ")? else {
            return Ok(Flow::Quit);
        };
        let phone = loop {
            let Some(phone) = self.prompt("Phone: ")? else {
                return Ok(Flow::Quit);
            };
            if is_valid_phone(&phone) {
                break phone;
            }
            writeln!(self.output, "Phone numbers may only contain digits. Try again.")?;
        };
        let Some(email) = self.prompt("Email: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(address) = self.prompt("Address: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(notes) = self.prompt("Notes: ")? else {
            return Ok(Flow::Quit);
        };

        let Some(member) = self.app.directory_mut().member_mut(id) else {
            return Ok(Flow::Continue);
        };
        let contact = member.add_contact(
            ContactDraft::new(name, phone)
                .email(email)
                .address(address)
                .notes(notes),
        );
        let (contact_id, contact_name) = (contact.id, contact.name.clone());
        writeln!(self.output, "Added contact {}: {}", contact_id, contact_name)?;
        self.commit(Some(&format!(
            "{} added contact '{}'.",
            username, contact_name
        )))?;
        Ok(Flow::Continue)
    }

    fn edit_contact(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        let Some(contact_id) = self.prompt_id("Contact id to edit: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(contact_id) = contact_id else {
            return Ok(Flow::Continue);
        };
        let exists = self
            .app
            .directory()
            .member(id)
            .and_then(|m| m.contact(contact_id))
            .is_some();
        if !exists {
            writeln!(self.output, "Contact not found.")?;
            return Ok(Flow::Continue);
        }

        let mut edit = ContactEdit::new();
        let Some(name) = self.prompt("New name (Enter to skip): ")? else {
            return Ok(Flow::Quit);
        };
        edit.name = FieldEdit::from_input(&name);
        let Some(phone) = self.prompt("New phone (Enter to skip): ")? else {
            return Ok(Flow::Quit);
        };
        edit.phone = FieldEdit::from_input(&phone);
        if let FieldEdit::SetTo(value) = &edit.phone {
            if !is_valid_phone(value) {
                writeln!(self.output, "Invalid phone number, keeping the old one.")?;
                edit.phone = FieldEdit::Unchanged;
            }
        }
        let Some(email) = self.prompt("New email (Enter to skip): ")? else {
            return Ok(Flow::Quit);
        };
        edit.email = FieldEdit::from_input(&email);
        let Some(address) = self.prompt("New address (Enter to skip): ")? else {
            return Ok(Flow::Quit);
        };
        edit.address = FieldEdit::from_input(&address);
        let Some(notes) = self.prompt("New notes (Enter to skip): ")? else {
            return Ok(Flow::Quit);
        };
        edit.notes = FieldEdit::from_input(&notes);

        if edit.is_empty() {
            writeln!(self.output, "Nothing to change.")?;
            return Ok(Flow::Continue);
        }

        let updated = self
            .app
            .directory_mut()
            .member_mut(id)
            .is_some_and(|m| m.edit_contact(contact_id, edit));
        if updated {
            writeln!(self.output, "Contact {} updated.", contact_id)?;
            self.commit(Some(&format!(
                "{} edited contact {}.",
                username, contact_id
            )))?;
        } else {
            writeln!(self.output, "Contact not found.")?;
        }
        Ok(Flow::Continue)
    }

    fn delete_contact(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        let Some(contact_id) = self.prompt_id("Contact id to delete: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(contact_id) = contact_id else {
            return Ok(Flow::Continue);
        };
        let deleted = self
            .app
            .directory_mut()
            .member_mut(id)
            .is_some_and(|m| m.delete_contact(contact_id));
        if deleted {
            writeln!(self.output, "Deleted contact {}.", contact_id)?;
            self.commit(Some(&format!(
                "{} deleted contact {}.",
                username, contact_id
            )))?;
        } else {
            writeln!(self.output, "Contact not found.")?;
        }
        Ok(Flow::Continue)
    }

    fn recent_contacts(&mut self, id: AccountId) -> Result<Flow> {
        let recent: Vec<Contact> = match self.app.directory().member(id) {
            Some(member) => member.recent_contacts().into_iter().cloned().collect(),
            None => return Ok(Flow::Continue),
        };
        writeln!(self.output, "--- RECENTLY VIEWED ---")?;
        if recent.is_empty() {
            writeln!(self.output, "(no contacts viewed yet)")?;
        }
        for contact in &recent {
            if let Some(viewed) = contact.last_viewed_at {
                writeln!(self.output, "[{}] {}", viewed.format("%H:%M"), contact.name)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self, id: AccountId) -> Result<Flow> {
        let Some(keyword) = self.prompt_raw("Name to search: ")? else {
            return Ok(Flow::Quit);
        };
        let found: Vec<Contact> = match self.app.directory().member(id) {
            Some(member) => member
                .search_by_name(&keyword)
                .into_iter()
                .cloned()
                .collect(),
            None => return Ok(Flow::Continue),
        };

        let target = match found.as_slice() {
            [] => {
                writeln!(self.output, "No match.")?;
                return Ok(Flow::Continue);
            }
            [only] => {
                writeln!(self.output, "Found: {} - {}", only.name, only.phone)?;
                only.id
            }
            many => {
                writeln!(self.output, "--- {} matches ---", many.len())?;
                for contact in many {
                    self.print_contact_row(contact)?;
                }
                let Some(choice) = self.prompt_id("Contact id to view: ")? else {
                    return Ok(Flow::Quit);
                };
                match choice {
                    Some(contact_id) => contact_id,
                    None => return Ok(Flow::Continue),
                }
            }
        };
        self.show_contact(id, target)?;
        Ok(Flow::Continue)
    }

    /// Print a contact's details, recording the view.
    fn show_contact(&mut self, id: AccountId, contact_id: u32) -> Result<()> {
        let viewed = self
            .app
            .directory_mut()
            .member_mut(id)
            .and_then(|m| m.view_contact(contact_id).cloned());
        let Some(contact) = viewed else {
            writeln!(self.output, "Contact not found.")?;
            return Ok(());
        };
        writeln!(self.output, "--- DETAILS: {} ---", contact.name)?;
        writeln!(self.output, "Phone  : {}", contact.phone)?;
        writeln!(self.output, "Email  : {}", contact.email)?;
        writeln!(self.output, "Address: {}", contact.address)?;
        writeln!(self.output, "Notes  : {}", contact.notes)?;
        if let Some(viewed) = contact.last_viewed_at {
            writeln!(self.output, "Last viewed: {}", viewed.format("%H:%M %d/%m"))?;
        }
        self.commit(None)
    }

    // ─── Groups ──────────────────────────────────────────────────────

    fn print_groups(&mut self, id: AccountId) -> Result<()> {
        let groups: Vec<String> = self
            .app
            .directory()
            .member(id)
            .map(|m| {
                m.groups()
                    .iter()
                    .map(|g| format!("[{}:{}]", g.id, g.name))
                    .collect()
            })
            .unwrap_or_default();
        writeln!(self.output, "Groups: {}", groups.join(" "))?;
        Ok(())
    }

    fn create_group(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        let Some(name) = self.prompt("Group name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(member) = self.app.directory_mut().member_mut(id) else {
            return Ok(Flow::Continue);
        };
        let group_id = member.create_group(name.clone()).id;
        writeln!(self.output, "Created group [{}] {}", group_id, name)?;
        self.commit(Some(&format!("{} created group '{}'.", username, name)))?;
        Ok(Flow::Continue)
    }

    fn delete_group(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        self.print_groups(id)?;
        let Some(group_id) = self.prompt_id("Group id to delete: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(group_id) = group_id else {
            return Ok(Flow::Continue);
        };
        let removed = self
            .app
            .directory_mut()
            .member_mut(id)
            .is_some_and(|m| m.remove_group(group_id));
        if removed {
            writeln!(self.output, "Deleted group {}.", group_id)?;
            self.commit(Some(&format!("{} deleted group {}.", username, group_id)))?;
        } else {
            writeln!(self.output, "Group not found.")?;
        }
        Ok(Flow::Continue)
    }

    fn group_menu(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "--- GROUP MEMBERS ---")?;
            self.print_groups(id)?;
            writeln!(self.output, "1. Add contact to group")?;
            writeln!(self.output, "2. Remove contact from group")?;
            writeln!(self.output, "3. Rename group")?;
            writeln!(self.output, "4. List group members")?;
            writeln!(self.output, "0. Back")?;
            let Some(choice) = self.prompt("Choose: ")? else {
                return Ok(Flow::Quit);
            };
            let flow = match choice.as_str() {
                "1" => self.add_to_group(id, username)?,
                "2" => self.remove_from_group(id, username)?,
                "3" => self.rename_group(id, username)?,
                "4" => {
                    let Some(group_id) = self.prompt_id("Group id: ")? else {
                        return Ok(Flow::Quit);
                    };
                    if let Some(group_id) = group_id {
                        self.list_group(id, group_id)?;
                    }
                    Flow::Continue
                }
                "0" => return Ok(Flow::Continue),
                _ => Flow::Continue,
            };
            if let Flow::Quit = flow {
                return Ok(Flow::Quit);
            }
        }
    }

    fn list_group(&mut self, id: AccountId, group_id: u32) -> Result<()> {
        let contacts: Vec<Contact> = self
            .app
            .directory()
            .member(id)
            .map(|m| m.contacts_in_group(group_id).into_iter().cloned().collect())
            .unwrap_or_default();
        writeln!(self.output, "--- Members of group {} ---", group_id)?;
        if contacts.is_empty() {
            writeln!(self.output, "(empty)")?;
        }
        for contact in &contacts {
            self.print_contact_row(contact)?;
        }
        Ok(())
    }

    fn add_to_group(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        let Some(contact_id) = self.prompt_id("Contact id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(group_id) = self.prompt_id("Group id: ")? else {
            return Ok(Flow::Quit);
        };
        let (Some(contact_id), Some(group_id)) = (contact_id, group_id) else {
            return Ok(Flow::Continue);
        };
        let added = self
            .app
            .directory_mut()
            .member_mut(id)
            .is_some_and(|m| m.add_contact_to_group(contact_id, group_id));
        if added {
            writeln!(self.output, "Added contact {} to group {}.", contact_id, group_id)?;
            self.commit(Some(&format!(
                "{} added contact {} to group {}.",
                username, contact_id, group_id
            )))?;
        } else {
            writeln!(
                self.output,
                "Not added: unknown contact or group, or already a member."
            )?;
        }
        Ok(Flow::Continue)
    }

    fn remove_from_group(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        let Some(group_id) = self.prompt_id("Group id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(group_id) = group_id else {
            return Ok(Flow::Continue);
        };
        self.list_group(id, group_id)?;
        let Some(contact_id) = self.prompt_id("Contact id to remove: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(contact_id) = contact_id else {
            return Ok(Flow::Continue);
        };
        let removed = self
            .app
            .directory_mut()
            .member_mut(id)
            .is_some_and(|m| m.remove_contact_from_group(contact_id, group_id));
        if removed {
            writeln!(
                self.output,
                "Removed contact {} from group {}.",
                contact_id, group_id
            )?;
            self.commit(Some(&format!(
                "{} removed contact {} from group {}.",
                username, contact_id, group_id
            )))?;
        } else {
            writeln!(self.output, "That contact is not in the group.")?;
        }
        Ok(Flow::Continue)
    }

    fn rename_group(&mut self, id: AccountId, username: &str) -> Result<Flow> {
        let Some(group_id) = self.prompt_id("Group id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(new_name) = self.prompt("New name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(group_id) = group_id else {
            return Ok(Flow::Continue);
        };
        let renamed = self
            .app
            .directory_mut()
            .member_mut(id)
            .is_some_and(|m| m.rename_group(group_id, new_name.clone()));
        if renamed {
            writeln!(self.output, "Renamed group {} to {}.", group_id, new_name)?;
            self.commit(Some(&format!(
                "{} renamed group {} to '{}'.",
                username, group_id, new_name
            )))?;
        } else {
            writeln!(self.output, "Group not found.")?;
        }
        Ok(Flow::Continue)
    }

    // ─── Admin dashboard ─────────────────────────────────────────────

    fn admin_dashboard(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== ADMIN DASHBOARD ===")?;
            writeln!(self.output, "1. List members")?;
            writeln!(self.output, "2. Create member")?;
            writeln!(self.output, "3. Delete member")?;
            writeln!(self.output, "4. Lock / unlock member")?;
            writeln!(self.output, "5. View activity log")?;
            writeln!(self.output, "0. Log out")?;
            let Some(choice) = self.prompt("Choose: ")? else {
                return Ok(Flow::Quit);
            };
            let flow = match choice.as_str() {
                "1" => self.list_members()?,
                "2" => self.create_member()?,
                "3" => self.delete_member()?,
                "4" => self.toggle_member()?,
                "5" => self.show_log()?,
                "0" => return Ok(Flow::Continue),
                _ => Flow::Continue,
            };
            if let Flow::Quit = flow {
                return Ok(Flow::Quit);
            }
        }
    }

    fn list_members(&mut self) -> Result<Flow> {
        let rows: Vec<String> = self
            .app
            .directory()
            .members()
            .iter()
            .map(|m| {
                format!(
                    "ID: {} | User: {} | Contacts: {}{}",
                    m.id(),
                    m.username(),
                    m.contacts().len(),
                    if m.is_active() { "" } else { " | locked" }
                )
            })
            .collect();
        writeln!(self.output, "--- MEMBERS ---")?;
        for row in rows {
            writeln!(self.output, "{}", row)?;
        }
        Ok(Flow::Continue)
    }

    fn create_member(&mut self) -> Result<Flow> {
        let Some(username) = self.prompt("New username: ")? else {
            return Ok(Flow::Quit);
        };
        if username.is_empty() {
            writeln!(self.output, "Username cannot be empty.")?;
            return Ok(Flow::Continue);
        }
        if self.app.directory().find_member(&username).is_some() {
            writeln!(self.output, "Username already taken.")?;
            return Ok(Flow::Continue);
        }
        let Some(secret) = self.prompt_raw("Password: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(email) = self.prompt("Email: ")? else {
            return Ok(Flow::Quit);
        };

        let created = self
            .app
            .directory_mut()
            .create_member(&username, Secret::Raw(secret), &email)
            .map(|m| m.id());
        match created {
            Ok(member_id) => {
                writeln!(self.output, "Created member {} (id {}).", username, member_id)?;
                self.commit(Some(&format!("Admin created member '{}'.", username)))?;
            }
            Err(e) => writeln!(self.output, "Could not create member: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete_member(&mut self) -> Result<Flow> {
        let Some(member_id) = self.prompt_id("Member id to delete: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(member_id) = member_id else {
            return Ok(Flow::Continue);
        };
        let Some(username) = self
            .app
            .directory()
            .member(member_id)
            .map(|m| m.username().to_string())
        else {
            writeln!(self.output, "Member not found.")?;
            return Ok(Flow::Continue);
        };
        let Some(confirm) = self.prompt(&format!("Delete {}? (y/n): ", username))? else {
            return Ok(Flow::Quit);
        };
        if !confirm.eq_ignore_ascii_case("y") {
            return Ok(Flow::Continue);
        }
        match self.app.directory_mut().delete_member(member_id) {
            Ok(_) => {
                writeln!(self.output, "Deleted member {}.", username)?;
                self.commit(Some(&format!("Admin deleted member '{}'.", username)))?;
            }
            Err(e) => writeln!(self.output, "Could not delete member: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn toggle_member(&mut self) -> Result<Flow> {
        let Some(member_id) = self.prompt_id("Member id to lock/unlock: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(member_id) = member_id else {
            return Ok(Flow::Continue);
        };
        let Some((username, active)) = self
            .app
            .directory()
            .member(member_id)
            .map(|m| (m.username().to_string(), m.is_active()))
        else {
            writeln!(self.output, "Member not found.")?;
            return Ok(Flow::Continue);
        };
        self.app
            .directory_mut()
            .set_member_active(member_id, !active)?;
        let verb = if active { "locked" } else { "unlocked" };
        writeln!(self.output, "Member {} {}.", username, verb)?;
        self.commit(Some(&format!("Admin {} member '{}'.", verb, username)))?;
        Ok(Flow::Continue)
    }

    fn show_log(&mut self) -> Result<Flow> {
        let log = self.app.directory().log();
        let (lines, capacity) = (log.to_vec(), log.capacity());
        writeln!(
            self.output,
            "--- ACTIVITY LOG ({}/{}) ---",
            lines.len(),
            capacity
        )?;
        if lines.is_empty() {
            writeln!(self.output, "(empty)")?;
        }
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn session() -> (TempDir, Phonebook) {
        let tmp = TempDir::new().unwrap();
        let app = Phonebook::open(Config::with_storage_path(tmp.path().join("pb.json")));
        (tmp, app)
    }

    fn run_script(app: &mut Phonebook, script: &str) -> String {
        let mut out = Vec::new();
        Menu::new(app, Cursor::new(script.as_bytes()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("090111"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("09-01"));
        assert!(!is_valid_phone("abc"));
    }

    #[test]
    fn test_exit_records_shutdown() {
        let (_tmp, mut app) = session();
        let out = run_script(&mut app, "3\n");
        assert!(out.contains("Goodbye."));
        let last = app.directory().log().entries().last().unwrap().to_string();
        assert!(last.ends_with("System shutdown."));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_tmp, mut app) = session();
        let out = run_script(&mut app, "");
        assert!(out.contains("Goodbye."));
    }

    #[test]
    fn test_failed_login() {
        let (_tmp, mut app) = session();
        let out = run_script(&mut app, "1\nstudent\nwrong\n3\n");
        assert!(out.contains("Login failed"));
    }

    #[test]
    fn test_member_adds_contact_after_bad_phone() {
        let (_tmp, mut app) = session();
        let script = "1\nstudent\n123\n2\nAlpha\n09ab\n0901\na@example.com\n\n\n0\n3\n";
        let out = run_script(&mut app, script);
        assert!(out.contains("only contain digits"));
        assert!(out.contains("Added contact 2: Alpha"));

        let member = app.directory().find_member("student").unwrap();
        let alpha = member.contact(2).unwrap();
        assert_eq!(alpha.phone, "0901");
        assert_eq!(alpha.email, "a@example.com");
    }

    #[test]
    fn test_member_edit_skips_blank_fields() {
        let (_tmp, mut app) = session();
        let script = "1\nstudent\n123\n3\n1\nFather\n\n\n\n\n0\n3\n";
        run_script(&mut app, script);
        let member = app.directory().find_member("student").unwrap();
        let dad = member.contact(1).unwrap();
        assert_eq!(dad.name, "Father");
        assert_eq!(dad.phone, "090111");
        assert_eq!(dad.notes, "Family");
    }

    #[test]
    fn test_blank_edit_changes_nothing() {
        let (_tmp, mut app) = session();
        let out = run_script(&mut app, "1\nstudent\n123\n3\n1\n\n\n\n\n\n0\n3\n");
        assert!(out.contains("Nothing to change."));

        let member = app.directory().find_member("student").unwrap();
        assert!(member.contact(1).unwrap().updated_at.is_none());
        assert!(!app.directory().log().entries().any(|l| l.contains("edited contact")));
    }

    #[test]
    fn test_log_header_shows_capacity() {
        let (_tmp, mut app) = session();
        let out = run_script(&mut app, "2\nadmin\n123456\n5\n0\n3\n");
        assert!(out.contains("--- ACTIVITY LOG (2/100) ---"));
    }

    #[test]
    fn test_search_single_match_records_view() {
        let (_tmp, mut app) = session();
        let out = run_script(&mut app, "1\nstudent\n123\n9\ndad\n5\n0\n3\n");
        assert!(out.contains("Found: Dad - 090111"));
        assert!(out.contains("--- DETAILS: Dad ---"));
        let member = app.directory().find_member("student").unwrap();
        assert_eq!(member.recent_contacts().len(), 1);
    }

    #[test]
    fn test_group_membership_flow() {
        let (_tmp, mut app) = session();
        let script = "1\nstudent\n123\n8\n1\n1\n1\n1\n1\n1\n4\n1\n0\n0\n3\n";
        let out = run_script(&mut app, script);
        assert!(out.contains("Added contact 1 to group 1."));
        assert!(out.contains("Not added"));
        let member = app.directory().find_member("student").unwrap();
        assert_eq!(member.memberships().len(), 1);
    }

    #[test]
    fn test_admin_creates_and_locks_member() {
        let (_tmp, mut app) = session();
        let script = "2\nadmin\n123456\n2\nsv\n123\nsv@example.com\n2\nsv\n4\n102\n0\n3\n";
        let out = run_script(&mut app, script);
        assert!(out.contains("Created member sv (id 102)."));
        assert!(out.contains("Username already taken."));
        assert!(out.contains("Member sv locked."));
        assert!(app.directory().authenticate_member("sv", "123").is_none());
    }

    #[test]
    fn test_admin_deletes_member() {
        let (_tmp, mut app) = session();
        let out = run_script(&mut app, "2\nadmin\n123456\n3\n101\ny\n5\n0\n3\n");
        assert!(out.contains("Deleted member student."));
        assert!(out.contains("Admin deleted member 'student'."));
        assert!(app.directory().members().is_empty());
    }
}
