//! The running session: one [`Directory`] bound to its snapshot file.
//!
//! [`Phonebook::open`] loads the snapshot (seeding sample data on first run)
//! and [`Phonebook::commit`] writes the whole directory back after a
//! mutation. A failed write is logged and reported to the caller but never
//! aborts the session; the in-memory state stays authoritative.

use anyhow::Result;

use phonebook_core::Directory;

use crate::config::Config;
use crate::snapshot;

pub struct Phonebook {
    config: Config,
    directory: Directory,
}

impl Phonebook {
    /// Load the configured snapshot.
    ///
    /// An unusable snapshot is moved aside to `<path>.corrupt` before the
    /// session starts empty. When the directory holds no accounts and
    /// seeding is enabled, sample data is added and saved immediately.
    pub fn open(config: Config) -> Self {
        let path = &config.storage.path;
        let directory = match snapshot::read(path, config.log.capacity) {
            snapshot::Loaded::Missing => Directory::empty(config.log.capacity),
            snapshot::Loaded::Restored(directory) => directory,
            snapshot::Loaded::Unusable(e) => {
                let error = format!("{:#}", e);
                match snapshot::quarantine(path) {
                    Ok(moved) => tracing::warn!(
                        path = %path.display(),
                        moved_to = %moved.display(),
                        %error,
                        "unusable snapshot moved aside, starting empty"
                    ),
                    Err(e) => tracing::warn!(
                        path = %path.display(),
                        %error,
                        quarantine = %format!("{:#}", e),
                        "unusable snapshot could not be moved aside, starting empty"
                    ),
                }
                Directory::empty(config.log.capacity)
            }
        };
        let mut app = Self { config, directory };

        if app.directory.has_no_accounts() && app.config.seed.enabled {
            tracing::info!("no accounts found, creating sample data");
            app.directory.seed_sample_data();
            app.commit(None);
        }
        app
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut Directory {
        &mut self.directory
    }

    /// Write the snapshot.
    pub fn save(&self) -> Result<()> {
        snapshot::save(&self.config.storage.path, &self.directory)
    }

    /// Optionally log `message`, then write the snapshot.
    ///
    /// Returns `false` if the write failed; the failure is logged as a
    /// warning.
    pub fn commit(&mut self, message: Option<&str>) -> bool {
        if let Some(message) = message {
            self.directory.record(message);
        }
        match self.save() {
            Ok(()) => true,
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(path = %self.config.storage.path.display(), %error, "could not save snapshot");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonebook_core::ContactDraft;
    use tempfile::TempDir;

    #[test]
    fn test_first_open_seeds_and_saves() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("phonebook.json");
        let app = Phonebook::open(Config::with_storage_path(&path));

        assert!(path.exists());
        assert_eq!(app.directory().admins().len(), 1);
        assert_eq!(app.directory().members().len(), 1);
    }

    #[test]
    fn test_seeding_can_be_disabled() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("phonebook.json");
        let mut config = Config::with_storage_path(&path);
        config.seed.enabled = false;

        let app = Phonebook::open(config);
        assert!(app.directory().has_no_accounts());
        assert!(!path.exists());
    }

    #[test]
    fn test_commit_persists_across_sessions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("phonebook.json");

        let mut app = Phonebook::open(Config::with_storage_path(&path));
        let member = app.directory_mut().find_member("student").unwrap().id();
        app.directory_mut()
            .member_mut(member)
            .unwrap()
            .add_contact(ContactDraft::new("Mom", "090222"));
        assert!(app.commit(Some("student added a contact.")));

        let reopened = Phonebook::open(Config::with_storage_path(&path));
        let m = reopened.directory().find_member("student").unwrap();
        assert_eq!(m.contacts().len(), 2);
        assert!(reopened
            .directory()
            .log()
            .entries()
            .any(|l| l.ends_with("student added a contact.")));
    }

    #[test]
    fn test_commit_failure_keeps_state() {
        let tmp = TempDir::new().unwrap();
        // A regular file where the snapshot's parent directory should be.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("phonebook.json");

        let mut config = Config::with_storage_path(&path);
        config.seed.enabled = false;
        let mut app = Phonebook::open(config);
        app.directory_mut().seed_sample_data();

        assert!(!app.commit(Some("still here")));
        assert_eq!(app.directory().members().len(), 1);
    }

    #[test]
    fn test_unusable_snapshot_is_moved_aside() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("phonebook.json");
        let original = r#"{"members":[{"member_id":101,"username":"x"}]}"#;
        std::fs::write(&path, original).unwrap();

        let app = Phonebook::open(Config::with_storage_path(&path));
        assert!(app.directory().find_member("student").is_some());

        let moved = tmp.path().join("phonebook.json.corrupt");
        assert_eq!(std::fs::read_to_string(moved).unwrap(), original);
    }
}
