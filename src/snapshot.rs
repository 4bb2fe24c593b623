//! Snapshot persistence.
//!
//! The whole [`Directory`] (accounts, address books, activity log) is stored
//! as one pretty-printed JSON document and rewritten after every mutation.
//!
//! ```json
//! {
//!   "admins":  [{ "admin_id": 1, "username": "admin", "password": "<sha256 hex>" }],
//!   "members": [{
//!     "member_id": 101, "username": "student", "password": "<sha256 hex>",
//!     "email": "student@example.com", "is_active": true,
//!     "contacts":    [{ "contact_id": 1, "name": "Dad", "phone": "090111",
//!                       "email": "", "address": "", "notes": "",
//!                       "last_viewed_at": "2024-01-01 09:30:00" }],
//!     "groups":      [{ "group_id": 1, "group_name": "Family" }],
//!     "memberships": [{ "contact_id": 1, "group_id": 1, "added_at": "2024-01-01 09:31:00" }]
//!   }],
//!   "logs": ["[2024-01-01 09:29:00] System initialized with sample data."]
//! }
//! ```
//!
//! Timestamps use `YYYY-MM-DD HH:MM:SS` and therefore keep second precision.
//!
//! Reading is forgiving: a missing file is an empty directory, and a file that
//! cannot be read or parsed is logged and treated as empty. Optional fields
//! fall back to defaults and unparsable timestamps are dropped. Writes go to
//! `<path>.tmp`, which is then renamed over the previous snapshot.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use phonebook_core::account::MemberParts;
use phonebook_core::{
    ActivityLog, Admin, Contact, Directory, Group, Member, Membership, PasswordDigest, Secret,
    TIMESTAMP_FORMAT,
};

#[derive(Serialize, Deserialize)]
struct SnapshotRecord {
    #[serde(default)]
    admins: Vec<AdminRecord>,
    #[serde(default)]
    members: Vec<MemberRecord>,
    #[serde(default)]
    logs: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct AdminRecord {
    admin_id: u32,
    username: String,
    password: String,
}

#[derive(Serialize, Deserialize)]
struct MemberRecord {
    member_id: u32,
    username: String,
    password: String,
    #[serde(default)]
    email: String,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    contacts: Vec<ContactRecord>,
    #[serde(default)]
    groups: Vec<GroupRecord>,
    #[serde(default)]
    memberships: Vec<MembershipRecord>,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
struct ContactRecord {
    contact_id: u32,
    name: String,
    phone: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_viewed_at: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct GroupRecord {
    group_id: u32,
    group_name: String,
}

#[derive(Serialize, Deserialize)]
struct MembershipRecord {
    contact_id: u32,
    group_id: u32,
    #[serde(default)]
    added_at: Option<String>,
}

/// Format a timestamp for storage.
pub fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp. Returns `None` for anything unparsable.
pub fn parse_ts(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

// ─── Encoding ────────────────────────────────────────────────────────

/// Serialize accounts and log lines into snapshot text.
pub fn serialize(admins: &[Admin], members: &[Member], logs: &[String]) -> Result<String> {
    let record = SnapshotRecord {
        admins: admins.iter().map(admin_record).collect(),
        members: members.iter().map(member_record).collect(),
        logs: logs.to_vec(),
    };
    serde_json::to_string_pretty(&record).context("Failed to serialize snapshot")
}

/// Serialize a whole directory.
pub fn encode(directory: &Directory) -> Result<String> {
    serialize(
        directory.admins(),
        directory.members(),
        &directory.log().to_vec(),
    )
}

fn admin_record(admin: &Admin) -> AdminRecord {
    AdminRecord {
        admin_id: admin.id(),
        username: admin.username().to_string(),
        password: admin.password_digest().as_str().to_string(),
    }
}

fn member_record(member: &Member) -> MemberRecord {
    MemberRecord {
        member_id: member.id(),
        username: member.username().to_string(),
        password: member.password_digest().as_str().to_string(),
        email: member.email().to_string(),
        is_active: member.is_active(),
        contacts: member
            .contacts()
            .iter()
            .map(|c| ContactRecord {
                contact_id: c.id,
                name: c.name.clone(),
                phone: c.phone.clone(),
                email: c.email.clone(),
                address: c.address.clone(),
                notes: c.notes.clone(),
                last_viewed_at: c.last_viewed_at.as_ref().map(format_ts),
            })
            .collect(),
        groups: member
            .groups()
            .iter()
            .map(|g| GroupRecord {
                group_id: g.id,
                group_name: g.name.clone(),
            })
            .collect(),
        memberships: member
            .memberships()
            .iter()
            .map(|m| MembershipRecord {
                contact_id: m.contact_id,
                group_id: m.group_id,
                added_at: Some(format_ts(&m.added_at)),
            })
            .collect(),
    }
}

// ─── Decoding ────────────────────────────────────────────────────────

/// Parse snapshot text back into accounts and log lines.
///
/// Fails only if the text is not a valid snapshot document; optional fields
/// and bad timestamps are defaulted rather than rejected.
pub fn deserialize(text: &str) -> Result<(Vec<Admin>, Vec<Member>, Vec<String>)> {
    let record: SnapshotRecord =
        serde_json::from_str(text).context("Failed to parse snapshot")?;

    let admins = record
        .admins
        .into_iter()
        .map(|a| Admin::new(a.admin_id, a.username, Secret::Hashed(stored_digest(a.password))))
        .collect();

    let members = record.members.into_iter().map(restore_member).collect();

    Ok((admins, members, record.logs))
}

/// Parse snapshot text into a directory whose log keeps `log_capacity` lines.
pub fn decode(text: &str, log_capacity: usize) -> Result<Directory> {
    let (admins, members, logs) = deserialize(text)?;
    Ok(Directory::new(
        admins,
        members,
        ActivityLog::from_entries(logs, log_capacity),
    ))
}

/// A stored password that is not a valid digest predates hashing; hash it.
fn stored_digest(stored: String) -> PasswordDigest {
    match PasswordDigest::parse(&stored) {
        Ok(digest) => digest,
        Err(e) => {
            tracing::warn!(error = %e, "stored password is not a digest, hashing it");
            Secret::Raw(stored).into_digest()
        }
    }
}

fn restore_member(record: MemberRecord) -> Member {
    let contacts: Vec<Contact> = record
        .contacts
        .into_iter()
        .map(|c| Contact {
            id: c.contact_id,
            name: c.name,
            phone: c.phone,
            email: c.email,
            address: c.address,
            notes: c.notes,
            created_at: phonebook_core::now(),
            updated_at: None,
            last_viewed_at: c.last_viewed_at.as_deref().and_then(parse_ts),
        })
        .collect();

    let groups: Vec<Group> = record
        .groups
        .into_iter()
        .map(|g| Group::new(g.group_id, g.group_name))
        .collect();

    let memberships: Vec<Membership> = record
        .memberships
        .into_iter()
        .map(|m| Membership {
            contact_id: m.contact_id,
            group_id: m.group_id,
            added_at: m
                .added_at
                .as_deref()
                .and_then(parse_ts)
                .unwrap_or_else(phonebook_core::now),
        })
        .collect();

    let stored = (contacts.len(), groups.len(), memberships.len());
    let member = Member::restore(MemberParts {
        id: record.member_id,
        password: stored_digest(record.password),
        username: record.username,
        email: record.email,
        is_active: record.is_active,
        contacts,
        groups,
        memberships,
    });

    let contacts_dropped = stored.0 - member.contacts().len();
    if contacts_dropped > 0 {
        tracing::warn!(
            member = member.username(),
            dropped = contacts_dropped,
            "dropped contacts with repeated ids"
        );
    }
    let groups_dropped = stored.1 - member.groups().len();
    if groups_dropped > 0 {
        tracing::warn!(
            member = member.username(),
            dropped = groups_dropped,
            "dropped groups with repeated ids"
        );
    }
    let links_dropped = stored.2 - member.memberships().len();
    if links_dropped > 0 {
        tracing::warn!(
            member = member.username(),
            dropped = links_dropped,
            "dropped dangling or duplicate memberships"
        );
    }
    member
}

// ─── File I/O ────────────────────────────────────────────────────────

/// What was found at the snapshot path.
pub enum Loaded {
    /// No file yet.
    Missing,
    Restored(Directory),
    /// A file exists but could not be read or parsed.
    Unusable(anyhow::Error),
}

/// Read the snapshot at `path` without deciding what to do on failure.
pub fn read(path: &Path, log_capacity: usize) -> Loaded {
    if !path.exists() {
        return Loaded::Missing;
    }
    let loaded = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))
        .and_then(|text| decode(&text, log_capacity));
    match loaded {
        Ok(directory) => Loaded::Restored(directory),
        Err(e) => Loaded::Unusable(e),
    }
}

/// Load the snapshot at `path`.
///
/// A missing file yields an empty directory. An unreadable or malformed file
/// is logged and also yields an empty directory; the file is left in place.
pub fn load(path: &Path, log_capacity: usize) -> Directory {
    match read(path, log_capacity) {
        Loaded::Missing => {
            tracing::debug!(path = %path.display(), "no snapshot, starting empty");
            Directory::empty(log_capacity)
        }
        Loaded::Restored(directory) => {
            tracing::info!(
                path = %path.display(),
                admins = directory.admins().len(),
                members = directory.members().len(),
                "loaded snapshot"
            );
            directory
        }
        Loaded::Unusable(e) => {
            let error = format!("{:#}", e);
            tracing::warn!(path = %path.display(), %error, "ignoring unusable snapshot");
            Directory::empty(log_capacity)
        }
    }
}

/// `path` with `suffix` appended to its file name.
pub fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Move an unusable snapshot aside to `<path>.corrupt` and return the new
/// location.
pub fn quarantine(path: &Path) -> Result<PathBuf> {
    let target = sibling(path, ".corrupt");
    std::fs::rename(path, &target).with_context(|| {
        format!(
            "Failed to move {} to {}",
            path.display(),
            target.display()
        )
    })?;
    Ok(target)
}

/// Write the directory to `path`, replacing the previous snapshot atomically.
pub fn save(path: &Path, directory: &Directory) -> Result<()> {
    let json = encode(directory)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let tmp_path = sibling(path, ".tmp");
    let written = std::fs::write(&tmp_path, json)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))
        .and_then(|()| {
            std::fs::rename(&tmp_path, path)
                .with_context(|| format!("Failed to replace {}", path.display()))
        });
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    written?;

    tracing::debug!(path = %path.display(), "saved snapshot");
    Ok(())
}
