//! Pipe-delimited storage for the task list
//!
//! Tasks are stored one per line, fields separated by `" | "`:
//!
//! ```text
//! T | 0 | read book
//! D | 1 | return book | 2/12/2019 1800
//! E | 0 | project meeting | 2/12/2019 1400 | 2/12/2019 1600
//! ```
//!
//! The whole file is rewritten on every save.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{DateTimeError, Task, TaskDateTime, TaskKind, TaskList};

const SEPARATOR: &str = " | ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("expected {expected} fields for type '{tag}', found {found}")]
    FieldCount {
        tag: char,
        expected: usize,
        found: usize,
    },

    #[error("invalid done flag '{0}', expected 0 or 1")]
    DoneFlag(String),

    #[error("empty description")]
    EmptyDescription,

    #[error(transparent)]
    Date(#[from] DateTimeError),
}

/// Encodes a task as a single line (without the trailing newline)
pub fn encode_line(task: &Task) -> String {
    let mut fields = vec![
        task.kind().tag().to_string(),
        if task.is_done() { "1" } else { "0" }.to_string(),
        task.description().to_string(),
    ];
    match task.kind() {
        TaskKind::Todo => {}
        TaskKind::Deadline { by } => fields.push(by.to_persisted()),
        TaskKind::Event { from, to } => {
            fields.push(from.to_persisted());
            fields.push(to.to_persisted());
        }
    }
    fields.join(SEPARATOR)
}

/// Decodes one line of the task file
///
/// Returns `Ok(None)` for lines whose type tag is not recognised.
pub fn decode_line(line: &str) -> Result<Option<Task>, LineError> {
    let fields: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();

    let tag = match fields[0] {
        "T" => 'T',
        "D" => 'D',
        "E" => 'E',
        _ => return Ok(None),
    };
    let expected = match tag {
        'T' => 3,
        'D' => 4,
        _ => 5,
    };
    if fields.len() != expected {
        return Err(LineError::FieldCount {
            tag,
            expected,
            found: fields.len(),
        });
    }

    let done = match fields[1] {
        "0" => false,
        "1" => true,
        other => return Err(LineError::DoneFlag(other.to_string())),
    };

    let description = fields[2];
    if description.is_empty() {
        return Err(LineError::EmptyDescription);
    }

    let task = match tag {
        'T' => Task::todo(description),
        'D' => Task::deadline(description, TaskDateTime::parse(fields[3])?),
        _ => Task::event(
            description,
            TaskDateTime::parse(fields[3])?,
            TaskDateTime::parse(fields[4])?,
        ),
    };

    Ok(Some(task.with_done(done)))
}

/// Tasks read from disk, plus how many lines had to be skipped
#[derive(Debug, Default)]
pub struct Loaded {
    pub tasks: TaskList,
    pub skipped: usize,
}

/// File holding the persisted task list
#[derive(Debug, Clone)]
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    /// Creates a task file handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the task file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Reads the task list
    ///
    /// A missing file yields an empty list. Lines that fail to decode are
    /// skipped with a warning and counted in [`Loaded::skipped`].
    pub fn load(&self) -> Result<Loaded> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task file yet, starting empty");
            return Ok(Loaded::default());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open task file: {}", self.path.display()))?;

        let reader = BufReader::new(file);
        let mut tasks = Vec::new();
        let mut skipped = 0;

        for (line_num, bytes) in reader.split(b'\n').enumerate() {
            let bytes = bytes.with_context(|| format!("Failed to read line {}", line_num + 1))?;
            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = line_num + 1,
                        error = %e,
                        "skipping task line that is not valid UTF-8"
                    );
                    skipped += 1;
                    continue;
                }
            };
            let line = line.strip_suffix('\r').unwrap_or(&line);

            if line.trim().is_empty() {
                continue;
            }

            match decode_line(line) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => {
                    debug!(line = line_num + 1, "skipping line with unknown task type");
                }
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = line_num + 1,
                        error = %e,
                        "skipping unreadable task line"
                    );
                    skipped += 1;
                }
            }
        }

        debug!(count = tasks.len(), skipped, "loaded task file");
        Ok(Loaded {
            tasks: TaskList::from_tasks(tasks),
            skipped,
        })
    }

    /// Writes the whole task list (full rewrite)
    pub fn save(&self, tasks: &TaskList) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.temp_path();

        let written = Self::write_temp(&temp_path, tasks).and_then(|()| {
            fs::rename(&temp_path, &self.path).with_context(|| {
                format!(
                    "Failed to rename {} to {}",
                    temp_path.display(),
                    self.path.display()
                )
            })
        });
        if written.is_err() && temp_path.exists() {
            if let Err(e) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %e, "could not remove temp file");
            }
        }
        written?;

        debug!(count = tasks.len(), path = %self.path.display(), "saved task file");
        Ok(())
    }

    fn write_temp(temp_path: &Path, tasks: &TaskList) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        let mut writer = BufWriter::new(&file);
        for task in tasks {
            writeln!(writer, "{}", encode_line(task)).context("Failed to write task")?;
        }
        writer.flush().context("Failed to flush task file")
    }
}
