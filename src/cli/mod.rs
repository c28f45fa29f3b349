pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedmirror")]
#[command(about = "Mirror Blogger Atom feeds into a local SQLite store", long_about = None)]
pub struct Cli {
    /// Number of sources synced in parallel (overrides the config file)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a feed source and run its first sync
    Add {
        /// Short name for the source
        name: String,
        /// Blog id the remote serves the feed under
        remote_id: String,
        /// Username for feeds that require HTTP basic auth
        #[arg(long, requires = "password")]
        username: Option<String>,
        /// Password for feeds that require HTTP basic auth
        #[arg(long, requires = "username")]
        password: Option<String>,
    },
    /// Remove a source and its mirrored entries
    Remove {
        /// Name of the source to remove
        name: String,
    },
    /// Sync one source, or all of them
    Sync {
        /// Source to sync; omit to sync every source
        name: Option<String>,
        /// Discard stored entries and rebuild from the fetched payload
        #[arg(long)]
        force: bool,
        /// Cap on entries requested per fetch (overrides the config file)
        #[arg(long)]
        max_results: Option<u32>,
        /// Print sync reports as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List sources or entries
    List {
        /// Show mirrored entries instead of sources
        #[arg(long)]
        entries: bool,
    },
}
