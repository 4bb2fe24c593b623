//! # Phonebook CLI (`pb`)
//!
//! Runs the interactive menu by default and offers a few non-interactive
//! commands for setup and inspection.
//!
//! ## Usage
//!
//! ```bash
//! pb --config ./config/pb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pb` / `pb menu` | Start the interactive menu |
//! | `pb init` | Create the snapshot, seeding sample data when empty |
//! | `pb members` | List member accounts (read-only) |
//! | `pb log` | Print the activity log (read-only) |
//! | `pb passwd-hash <secret>` | Print the stored digest for a password |
//!
//! Diagnostics go to stderr and are filtered with `RUST_LOG`
//! (default `phonebook=warn`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use phonebook::app::Phonebook;
use phonebook::config;
use phonebook::snapshot;
use phonebook::menu::Menu;

/// Phonebook CLI: a multi-account address book.
#[derive(Parser)]
#[command(name = "pb", about = "Multi-account phonebook manager", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/pb.toml`. A missing file means all defaults.
    #[arg(long, global = true, default_value = "./config/pb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (the default).
    Menu,

    /// Create the snapshot file.
    ///
    /// Seeds the sample admin and member when the snapshot holds no
    /// accounts and seeding is enabled. Safe to run repeatedly.
    Init,

    /// List member accounts without modifying the snapshot.
    Members,

    /// Print the activity log, oldest first, without modifying the snapshot.
    Log,

    /// Print the SHA-256 digest stored for a password.
    PasswdHash {
        /// Plain-text password.
        secret: String,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("phonebook=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Needs no config
    if let Some(Commands::PasswdHash { secret }) = &cli.command {
        println!("{}", phonebook_core::credential::hash_secret(secret).as_str());
        return Ok(());
    }

    let cfg = config::load_or_default(&cli.config)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let mut app = Phonebook::open(cfg);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            Menu::new(&mut app, stdin.lock(), stdout.lock()).run()?;
        }
        Commands::Init => {
            let app = Phonebook::open(cfg);
            app.save()?;
            println!(
                "Phonebook initialized at {}.",
                app.config().storage.path.display()
            );
        }
        // Read-only: never seeds or writes.
        Commands::Members => {
            let directory = snapshot::load(&cfg.storage.path, cfg.log.capacity);
            let members = directory.members();
            if members.is_empty() {
                println!("No members.");
            }
            for member in members {
                println!(
                    "{:<5} {:<20} {:<30} {:>4} contacts{}",
                    member.id(),
                    member.username(),
                    member.email(),
                    member.contacts().len(),
                    if member.is_active() { "" } else { "  (locked)" }
                );
            }
        }
        Commands::Log => {
            let directory = snapshot::load(&cfg.storage.path, cfg.log.capacity);
            for line in directory.log().entries() {
                println!("{}", line);
            }
        }
        Commands::PasswdHash { .. } => {}
    }

    Ok(())
}
