//! Domain models for Friday
//!
//! Contains the task model and task list without any I/O concerns.

mod datetime;
mod task;
mod task_list;

pub use datetime::{DateTimeError, TaskDateTime};
pub use task::{Task, TaskKind};
pub use task_list::{AddOutcome, TaskList, TaskListError};
