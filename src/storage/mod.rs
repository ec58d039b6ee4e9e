//! # Storage Layer
//!
//! Persistence for Friday.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | Pipe-delimited text (one task per line) | `data/tasklist.txt` |
//! | Config | TOML | `--config` or `~/.config/friday/config.toml` |
//!
//! ## Durability
//!
//! - [`TaskFile`] rewrites the whole file on every save
//! - Writes go to a temp file which is renamed over the target
//! - Unreadable lines are skipped on load rather than failing it

mod config;
mod tasklist;

pub use config::{Config, ConfigError};
pub use tasklist::{decode_line, encode_line, LineError, Loaded, TaskFile};
