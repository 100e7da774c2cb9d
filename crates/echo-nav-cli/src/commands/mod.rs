pub mod add;
pub mod auth_cmd;
pub mod auto_sync;
pub mod common;
pub mod completions;
pub mod config;
pub mod history;
pub mod list;
pub mod status;
pub mod sync;
