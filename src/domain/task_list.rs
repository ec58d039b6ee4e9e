//! The ordered, in-memory task list
//!
//! Positions exposed to the user are 1-based and always refer to the current
//! order; deleting a task shifts every later task down by one.

use thiserror::Error;

use super::task::Task;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskListError {
    #[error("There is no task number {index}. {}", range_hint(.len))]
    IndexOutOfRange { index: i64, len: usize },
}

fn range_hint(len: &usize) -> String {
    match *len {
        0 => "Your list is empty.".to_string(),
        1 => "The only task is number 1.".to_string(),
        n => format!("Pick a number from 1 to {}.", n),
    }
}

/// Result of adding a task
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum AddOutcome {
    /// The task was appended at this 1-based position
    Added(usize),
    /// An identical task already exists at this 1-based position
    Duplicate(usize),
}

/// Ordered collection of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from tasks in their stored order
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Appends a task unless an identical one is already listed
    pub fn add(&mut self, task: Task) -> AddOutcome {
        if let Some(existing) = self.find_duplicate(&task) {
            return AddOutcome::Duplicate(existing + 1);
        }
        self.tasks.push(task);
        AddOutcome::Added(self.tasks.len())
    }

    /// Returns true if a task renders exactly like `candidate`
    ///
    /// The rendered form includes the done marker, so a completed task never
    /// duplicates an otherwise identical pending one.
    pub fn is_duplicate(&self, candidate: &Task) -> bool {
        self.find_duplicate(candidate).is_some()
    }

    fn find_duplicate(&self, candidate: &Task) -> Option<usize> {
        let rendered = candidate.to_string();
        self.tasks.iter().position(|t| t.to_string() == rendered)
    }

    pub fn mark_done(&mut self, index: i64) -> Result<&Task, TaskListError> {
        let pos = self.position(index)?;
        self.tasks[pos].mark_done();
        Ok(&self.tasks[pos])
    }

    pub fn mark_not_done(&mut self, index: i64) -> Result<&Task, TaskListError> {
        let pos = self.position(index)?;
        self.tasks[pos].mark_not_done();
        Ok(&self.tasks[pos])
    }

    /// Removes and returns the task at `index`
    pub fn delete(&mut self, index: i64) -> Result<Task, TaskListError> {
        let pos = self.position(index)?;
        Ok(self.tasks.remove(pos))
    }

    pub fn get(&self, index: i64) -> Result<&Task, TaskListError> {
        let pos = self.position(index)?;
        Ok(&self.tasks[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Converts a 1-based user index into a vector position
    fn position(&self, index: i64) -> Result<usize, TaskListError> {
        let out_of_range = || TaskListError::IndexOutOfRange {
            index,
            len: self.tasks.len(),
        };
        let pos = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .ok_or_else(out_of_range)?;
        if pos < self.tasks.len() {
            Ok(pos)
        } else {
            Err(out_of_range())
        }
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
