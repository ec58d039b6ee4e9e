//! # Command-Line Interface
//!
//! The interactive conversation and its entry point.
//!
//! ## Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `list` | Show all tasks, numbered from 1 |
//! | `todo <desc>` | Add a to-do |
//! | `deadline <desc> /by <when>` | Add a task due at `<when>` |
//! | `event <desc> /from <when> /to <when>` | Add a timed event |
//! | `mark <n>`, `unmark <n>` | Set or clear the done flag |
//! | `delete <n>` | Remove a task |
//! | `bye` | End the session |
//!
//! Dates are written `d/M/yyyy HHmm`, e.g. `2/12/2019 1800`.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! friday --verbose
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and start the session on stdin/stdout.

mod app;
mod command;
mod output;
mod session;

pub use app::{run, Cli};
pub use command::{split_deadline, split_event, split_keyword, Command, CommandError};
pub use output::{Output, ERROR_MARKER};
pub use session::{Flow, Session};
