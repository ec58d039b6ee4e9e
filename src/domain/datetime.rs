//! Date-time values attached to deadlines and events
//!
//! Two textual forms exist for the same value:
//! - Input / persisted: `d/M/yyyy HHmm` (e.g. `2/12/2019 1800`)
//! - Display: `MMM d yyyy, h:mm a` (e.g. `Dec 2 2019, 6:00 pm`)
//!
//! Values are naive local date-times; there is no timezone handling.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DISPLAY_FORMAT: &str = "%b %-d %Y, %-I:%M %P";
const PERSISTED_FORMAT: &str = "%-d/%-m/%Y %H%M";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid date '{input}': {reason}. Use d/M/yyyy HHmm, e.g. 2/12/2019 1800")]
pub struct DateTimeError {
    input: String,
    reason: &'static str,
}

impl DateTimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// Returns the text that failed to parse
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A minute-precision date-time used by deadlines and events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskDateTime(NaiveDateTime);

impl TaskDateTime {
    /// Parses the `d/M/yyyy HHmm` input format
    pub fn parse(text: &str) -> Result<Self, DateTimeError> {
        let input = text.trim();

        let (date_part, time_part) = input
            .split_once(' ')
            .ok_or_else(|| DateTimeError::new(input, "expected a date and a time"))?;

        let mut fields = date_part.split('/');
        let (day, month, year) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(d), Some(m), Some(y), None) => (d, m, y),
            _ => return Err(DateTimeError::new(input, "expected day/month/year")),
        };

        let day = numeric_field(input, day, 1..=2, "day must be 1 or 2 digits")?;
        let month = numeric_field(input, month, 1..=2, "month must be 1 or 2 digits")?;
        let year = numeric_field(input, year, 4..=4, "year must be 4 digits")?;
        let hhmm = numeric_field(input, time_part, 4..=4, "time must be 4 digits (HHmm)")?;

        let date = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| DateTimeError::new(input, "no such calendar date"))?;
        let time = NaiveTime::from_hms_opt(hhmm / 100, hhmm % 100, 0)
            .ok_or_else(|| DateTimeError::new(input, "no such time of day"))?;

        Ok(Self(NaiveDateTime::new(date, time)))
    }

    /// Formats the value the way it is written to the task file
    pub fn to_persisted(&self) -> String {
        self.0.format(PERSISTED_FORMAT).to_string()
    }

    /// Returns the underlying naive date-time
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }
}

fn numeric_field(
    input: &str,
    field: &str,
    width: std::ops::RangeInclusive<usize>,
    reason: &'static str,
) -> Result<u32, DateTimeError> {
    if !width.contains(&field.len()) || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateTimeError::new(input, reason));
    }
    field
        .parse()
        .map_err(|_| DateTimeError::new(input, reason))
}

impl From<NaiveDateTime> for TaskDateTime {
    fn from(value: NaiveDateTime) -> Self {
        // Persisted form only carries minutes
        let truncated = value
            .with_second(0)
            .and_then(|v| v.with_nanosecond(0))
            .unwrap_or(value);
        Self(truncated)
    }
}

impl fmt::Display for TaskDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl FromStr for TaskDateTime {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
