//! Friday - an interactive, line-oriented task-list assistant
//!
//! Friday keeps a list of to-dos, deadlines and events. Commands are typed
//! one per line, the list is saved to a pipe-delimited text file after every
//! change, and reloaded at the next start.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Task, TaskDateTime, TaskKind, TaskList};
