//! Task domain model
//!
//! A task is a description plus a done flag, specialised into one of three
//! kinds. Deadlines carry a due date-time, events a start and an end.

use std::fmt;

use super::datetime::TaskDateTime;

/// Variant-specific part of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline { by: TaskDateTime },
    /// `from` is not required to precede `to`
    Event { from: TaskDateTime, to: TaskDateTime },
}

impl TaskKind {
    /// Single-letter tag used both on screen and in the task file
    pub fn tag(&self) -> char {
        match self {
            TaskKind::Todo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }
}

/// A unit of work in the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    kind: TaskKind,
}

impl Task {
    /// Creates a new, not yet done task
    pub fn new(description: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            description: description.into(),
            done: false,
            kind,
        }
    }

    pub fn todo(description: impl Into<String>) -> Self {
        Self::new(description, TaskKind::Todo)
    }

    pub fn deadline(description: impl Into<String>, by: TaskDateTime) -> Self {
        Self::new(description, TaskKind::Deadline { by })
    }

    pub fn event(description: impl Into<String>, from: TaskDateTime, to: TaskDateTime) -> Self {
        Self::new(description, TaskKind::Event { from, to })
    }

    /// Sets the done flag, for tasks restored from storage
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn mark_not_done(&mut self) {
        self.done = false;
    }

    /// `X` when done, a blank otherwise
    pub fn status_icon(&self) -> char {
        if self.done {
            'X'
        } else {
            ' '
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}] {}",
            self.kind.tag(),
            self.status_icon(),
            self.description
        )?;
        match &self.kind {
            TaskKind::Todo => Ok(()),
            TaskKind::Deadline { by } => write!(f, " (by: {})", by),
            TaskKind::Event { from, to } => write!(f, " (from: {} to: {})", from, to),
        }
    }
}
