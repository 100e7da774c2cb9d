//! echo-nav-core - Core library for Echo Nav
//!
//! This crate contains the bookmark models and the Gist synchronization
//! engine: config snapshots, validation, conflict detection, merging, diffs
//! and the sync orchestrator used by every Echo Nav front-end.

pub mod config;
pub mod error;
pub mod gist;
pub mod models;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Category, SyncConfig, SyncSettings, Website};
pub use state::SyncStatus;
pub use sync::{MergeStrategy, SyncManager};
