//! # feedmirror
//!
//! A one-way mirror of Blogger Atom feeds into a local SQLite store.
//!
//! ## Architecture
//!
//! feedmirror follows a modular pipeline architecture:
//!
//! ```text
//! Client → Atom parser → Mapper → Sync engine → Store
//! ```
//!
//! - [`client`]: HTTP client with ETag/conditional request support
//! - [`atom`]: Raw Atom document parsing, etag attributes included
//! - [`mapper`]: Converts raw Atom structures into domain models
//! - [`sync`]: The merge cycle that keeps the local store current
//! - [`store`]: SQLite persistence layer
//!
//! ## Quick Start
//!
//! ```bash
//! # Register a source and run its first sync
//! feedmirror add teixo 8729
//!
//! # List sources
//! feedmirror list
//!
//! # Sync all sources
//! feedmirror sync
//!
//! # Rebuild one source from scratch
//! feedmirror sync teixo --force
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// store, client, sync engine.
pub mod app;

/// Raw Atom document parsing.
///
/// Keeps feed- and entry-level `gd:etag` attributes that general-purpose
/// feed parsers drop.
pub mod atom;

/// Command-line interface using clap.
///
/// Defines the CLI structure and subcommands:
/// - `add <name> <remote_id>` - Register a source and sync it
/// - `remove <name>` - Remove a source
/// - `sync [name] [--force]` - Sync one source or all of them
/// - `list [--entries]` - List sources or entries
pub mod cli;

/// HTTP fetching with conditional request support.
///
/// - [`FeedClient`](client::FeedClient): Async trait for feed fetching
/// - [`HttpFeedClient`](client::http::HttpFeedClient): reqwest-based implementation
pub mod client;

/// Configuration management.
///
/// Loads from `~/.config/feedmirror/config.toml`, supporting the
/// database location and sync concurrency settings.
pub mod config;

/// Core domain models.
///
/// - [`FeedSource`](domain::FeedSource): A subscribed remote feed
/// - [`Entry`](domain::Entry): A mirrored post with its permanent slug
pub mod domain;

/// Mapping from raw Atom structures to domain models.
///
/// Enforces the mandatory fields and derives content and summary from
/// whatever the payload carries.
pub mod mapper;

/// URL slug normalization and collision handling.
pub mod slug;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// HTML stripping and plain-text summarization.
pub mod summary;

/// The synchronization engine.
///
/// - [`SyncEngine`](sync::SyncEngine): One conditional fetch-and-merge cycle
/// - [`ParallelSyncer`](sync::parallel::ParallelSyncer): Concurrent syncing with semaphore
pub mod sync;
