//! Parsing of typed commands from raw input lines
//!
//! Grammar:
//!
//! ```text
//! bye
//! list
//! mark <n> | unmark <n> | delete <n>
//! todo <description>
//! deadline <description> /by <d/M/yyyy HHmm>
//! event <description> /from <d/M/yyyy HHmm> /to <d/M/yyyy HHmm>
//! ```

use std::num::IntErrorKind;

use thiserror::Error;

use crate::domain::{DateTimeError, TaskDateTime, TaskListError};

const BY_MARKER: &str = "/by";
const FROM_MARKER: &str = "/from";
const TO_MARKER: &str = "/to";

/// Reasons a command could not be carried out
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("I'm sorry, but I don't know what '{0}' means :-(")]
    UnknownCommand(String),

    #[error("A deadline needs a due date. Use: deadline <description> /by <d/M/yyyy HHmm>")]
    MalformedDeadline,

    #[error("An event needs a start and an end. Use: event <description> /from <d/M/yyyy HHmm> /to <d/M/yyyy HHmm>")]
    MalformedEvent,

    #[error(transparent)]
    InvalidDateFormat(#[from] DateTimeError),

    #[error("The description of a {0} cannot be empty.")]
    EmptyDescription(&'static str),

    #[error("The description cannot contain '|'.")]
    ReservedCharacter,

    #[error("'{0}' is not a task number.")]
    NonNumericIndex(String),

    #[error(transparent)]
    IndexOutOfRange(#[from] TaskListError),
}

/// A fully parsed user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bye,
    List,
    Mark(i64),
    Unmark(i64),
    Delete(i64),
    Todo {
        description: String,
    },
    Deadline {
        description: String,
        by: TaskDateTime,
    },
    Event {
        description: String,
        from: TaskDateTime,
        to: TaskDateTime,
    },
}

impl Command {
    /// Parses one input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let (keyword, payload) = split_keyword(line);

        match keyword.as_str() {
            "bye" => Ok(Command::Bye),
            "list" => Ok(Command::List),
            "mark" => parse_index(payload).map(Command::Mark),
            "unmark" => parse_index(payload).map(Command::Unmark),
            "delete" => parse_index(payload).map(Command::Delete),
            "todo" => {
                let description = checked_description(payload.trim(), "todo")?;
                Ok(Command::Todo { description })
            }
            "deadline" => {
                if payload.trim().is_empty() {
                    return Err(CommandError::EmptyDescription("deadline"));
                }
                let (desc, by) = split_deadline(payload)?;
                let description = checked_description(desc, "deadline")?;
                Ok(Command::Deadline {
                    description,
                    by: TaskDateTime::parse(by)?,
                })
            }
            "event" => {
                if payload.trim().is_empty() {
                    return Err(CommandError::EmptyDescription("event"));
                }
                let (desc, from, to) = split_event(payload)?;
                let description = checked_description(desc, "event")?;
                Ok(Command::Event {
                    description,
                    from: TaskDateTime::parse(from)?,
                    to: TaskDateTime::parse(to)?,
                })
            }
            _ => Err(CommandError::UnknownCommand(keyword)),
        }
    }
}

/// Splits a line into a lowercased keyword and the remaining payload
///
/// Only the first whitespace character separates; the payload is kept as
/// typed apart from the line's outer whitespace.
pub fn split_keyword(line: &str) -> (String, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((keyword, payload)) => (keyword.to_lowercase(), payload),
        None => (line.to_lowercase(), ""),
    }
}

/// Splits a deadline payload into `(description, by)`
pub fn split_deadline(payload: &str) -> Result<(&str, &str), CommandError> {
    let (description, by) = payload
        .split_once(BY_MARKER)
        .ok_or(CommandError::MalformedDeadline)?;
    let by = by.trim();
    if by.is_empty() {
        return Err(CommandError::MalformedDeadline);
    }
    Ok((description.trim(), by))
}

/// Splits an event payload into `(description, from, to)`
pub fn split_event(payload: &str) -> Result<(&str, &str, &str), CommandError> {
    let (description, rest) = payload
        .split_once(FROM_MARKER)
        .ok_or(CommandError::MalformedEvent)?;
    let (from, to) = rest
        .split_once(TO_MARKER)
        .ok_or(CommandError::MalformedEvent)?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(CommandError::MalformedEvent);
    }
    Ok((description.trim(), from, to))
}

fn checked_description(text: &str, kind: &'static str) -> Result<String, CommandError> {
    if text.is_empty() {
        return Err(CommandError::EmptyDescription(kind));
    }
    if text.contains('|') {
        return Err(CommandError::ReservedCharacter);
    }
    Ok(text.to_string())
}

/// Numbers too large for an `i64` saturate, so they fail the bounds check
/// like any other out-of-range index
fn parse_index(payload: &str) -> Result<i64, CommandError> {
    let text = payload.trim();
    text.parse().or_else(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => Ok(i64::MAX),
        IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(CommandError::NonNumericIndex(text.to_string())),
    })
}
