//! # Phonebook
//!
//! A terminal address book shared by several member accounts and managed by
//! administrators.
//!
//! Members keep their own contacts and groups; admins create, lock and delete
//! members and read the activity log. The whole state lives in one JSON
//! snapshot that is rewritten after every change.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌────────────────┐
//! │  pb (CLI)  │──▶│  Phonebook   │──▶│ phonebook.json │
//! │  + menu    │   │  session     │   │   snapshot     │
//! └────────────┘   └──────┬───────┘   └────────────────┘
//!                         │
//!                         ▼
//!                  ┌──────────────┐
//!                  │phonebook-core│
//!                  │  Directory   │
//!                  └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! pb init                       # create the snapshot with sample data
//! pb                            # interactive menu
//! pb members                    # list member accounts
//! pb log                        # print the activity log
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`snapshot`] | JSON snapshot encoding, loading and atomic saving |
//! | [`app`] | Session that ties a directory to its snapshot |
//! | [`menu`] | Interactive text menu |

pub mod app;
pub mod config;
pub mod menu;
pub mod snapshot;
