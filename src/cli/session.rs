//! The interactive session
//!
//! Reads one command per line, applies it to the task list, saves after
//! every change and answers between divider lines. Errors never end the
//! session; they are shown with the error marker and the next line is read.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::command::{Command, CommandError};
use super::output::Output;
use crate::domain::{AddOutcome, Task, TaskList};
use crate::storage::{Loaded, TaskFile};

/// Whether the session keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

struct Reply {
    lines: Vec<String>,
    changed: bool,
    flow: Flow,
}

impl Reply {
    fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            changed: false,
            flow: Flow::Continue,
        }
    }

    fn changed(mut self) -> Self {
        self.changed = true;
        self
    }

    fn exit(mut self) -> Self {
        self.flow = Flow::Exit;
        self
    }
}

pub struct Session<W: Write> {
    name: String,
    tasks: TaskList,
    skipped: usize,
    file: TaskFile,
    output: Output<W>,
}

impl<W: Write> Session<W> {
    pub fn new(name: impl Into<String>, loaded: Loaded, file: TaskFile, output: Output<W>) -> Self {
        Self {
            name: name.into(),
            tasks: loaded.tasks,
            skipped: loaded.skipped,
            file,
            output,
        }
    }

    /// Returns the current task list
    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Consumes the session, returning its output
    pub fn into_output(self) -> Output<W> {
        self.output
    }

    /// Greets the user, then handles input lines until `bye` or end of input
    ///
    /// A line that is not valid UTF-8 is reported and skipped.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<()> {
        self.greet()?;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .context("Failed to read input")?;
            if read == 0 {
                break;
            }

            let flow = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line.trim_end_matches(['\n', '\r']))?,
                Err(e) => {
                    debug!(error = %e, "input line is not valid UTF-8");
                    self.output
                        .error("I can only read UTF-8 text, so I ignored that line.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }

        debug!("end of input");
        self.farewell()?;
        Ok(())
    }

    pub fn greet(&mut self) -> io::Result<()> {
        let mut lines = vec![
            format!("Hello! I'm {}", self.name),
            "What can I do for you?".to_string(),
        ];
        if self.skipped > 0 {
            lines.push(format!(
                "(I couldn't read {} saved {} in {}, so I left {} out.)",
                self.skipped,
                plural(self.skipped, "line"),
                self.file.path().display(),
                if self.skipped == 1 { "it" } else { "them" },
            ));
        }
        self.output.response(&lines)
    }

    fn farewell(&mut self) -> io::Result<()> {
        self.output.response(&["Bye. Hope to see you again soon!"])
    }

    /// Processes one line of input
    ///
    /// Only I/O errors on the output are returned; everything else is
    /// reported to the user.
    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let reply = match Command::parse(line).and_then(|command| {
            debug!(?command, "dispatching");
            self.execute(command)
        }) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(error = %e, "command rejected");
                self.output.error(&e.to_string())?;
                return Ok(Flow::Continue);
            }
        };

        let saved = if reply.changed { self.save() } else { Ok(()) };
        self.output.response(&reply.lines)?;
        if let Err(e) = saved {
            self.output
                .error(&format!("I couldn't save your tasks: {:#}", e))?;
        }

        Ok(reply.flow)
    }

    fn save(&self) -> Result<()> {
        self.file.save(&self.tasks).map_err(|e| {
            warn!(path = %self.file.path().display(), error = %format!("{:#}", e), "save failed");
            e
        })
    }

    fn execute(&mut self, command: Command) -> Result<Reply, CommandError> {
        let reply = match command {
            Command::Bye => {
                info!("session ended by user");
                Reply::new(vec!["Bye. Hope to see you again soon!".into()]).exit()
            }
            Command::List => Reply::new(self.list()),
            Command::Mark(index) => {
                let task = self.tasks.mark_done(index)?;
                Reply::new(vec![
                    "Nice! I've marked this task as done:".into(),
                    format!("  {}", task),
                ])
                .changed()
            }
            Command::Unmark(index) => {
                let task = self.tasks.mark_not_done(index)?;
                Reply::new(vec![
                    "OK, I've marked this task as not done yet:".into(),
                    format!("  {}", task),
                ])
                .changed()
            }
            Command::Delete(index) => {
                let task = self.tasks.delete(index)?;
                Reply::new(vec![
                    "Noted. I've removed this task:".into(),
                    format!("  {}", task),
                    self.count_line(),
                ])
                .changed()
            }
            Command::Todo { description } => self.add(Task::todo(description)),
            Command::Deadline { description, by } => self.add(Task::deadline(description, by)),
            Command::Event {
                description,
                from,
                to,
            } => self.add(Task::event(description, from, to)),
        };
        Ok(reply)
    }

    fn add(&mut self, task: Task) -> Reply {
        let rendered = task.to_string();
        match self.tasks.add(task) {
            AddOutcome::Added(_) => Reply::new(vec![
                "Got it. I've added this task:".into(),
                format!("  {}", rendered),
                self.count_line(),
            ])
            .changed(),
            AddOutcome::Duplicate(position) => {
                debug!(position, "duplicate task not added");
                Reply::new(vec![
                    "This task is already in your list:".into(),
                    format!("  {}.{}", position, rendered),
                ])
            }
        }
    }

    fn list(&self) -> Vec<String> {
        if self.tasks.is_empty() {
            return vec!["No tasks added yet.".into()];
        }
        let mut lines = vec!["Here are the tasks in your list:".to_string()];
        lines.extend(
            self.tasks
                .iter()
                .enumerate()
                .map(|(i, task)| format!("{}.{}", i + 1, task)),
        );
        lines
    }

    fn count_line(&self) -> String {
        let count = self.tasks.len();
        format!("Now you have {} {} in the list.", count, plural(count, "task"))
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DIVIDER: &str = "__________";

    fn new_session(dir: &TempDir) -> Session<Vec<u8>> {
        let file = TaskFile::new(dir.path().join("data").join("tasklist.txt"));
        let loaded = file.load().unwrap();
        Session::new("Friday", loaded, file, Output::new(Vec::new(), DIVIDER.len()))
    }

    /// Runs each line and returns the text of the last response
    fn run_lines(session: &mut Session<Vec<u8>>, lines: &[&str]) -> String {
        let mut last = String::new();
        for line in lines {
            let start = session.output.writer().len();
            session.handle_line(line).unwrap();
            last = body(&session.output.writer()[start..]);
        }
        last
    }

    fn body(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes)
            .lines()
            .filter(|l| *l != DIVIDER)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn greets_with_name() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        session.greet().unwrap();

        let text = String::from_utf8(session.into_output().into_inner()).unwrap();
        assert_eq!(
            text,
            format!("{DIVIDER}\nHello! I'm Friday\nWhat can I do for you?\n{DIVIDER}\n")
        );
    }

    #[test]
    fn empty_list_has_message() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);

        assert_eq!(run_lines(&mut session, &["list"]), "No tasks added yet.");
    }

    #[test]
    fn adds_each_kind_of_task() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);

        assert_eq!(
            run_lines(&mut session, &["todo read book"]),
            "Got it. I've added this task:\n  [T][ ] read book\nNow you have 1 task in the list."
        );
        assert_eq!(
            run_lines(&mut session, &["deadline return book /by 2/12/2019 1800"]),
            "Got it. I've added this task:\n  [D][ ] return book (by: Dec 2 2019, 6:00 pm)\nNow you have 2 tasks in the list."
        );
        assert_eq!(
            run_lines(
                &mut session,
                &["event project meeting /from 2/12/2019 1400 /to 2/12/2019 1600"]
            ),
            "Got it. I've added this task:\n  [E][ ] project meeting (from: Dec 2 2019, 2:00 pm to: Dec 2 2019, 4:00 pm)\nNow you have 3 tasks in the list."
        );
    }

    #[test]
    fn list_is_numbered_and_repeatable() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        run_lines(&mut session, &["todo read book", "todo clean room", "mark 2"]);

        let first = run_lines(&mut session, &["list"]);
        let second = run_lines(&mut session, &["list"]);
        assert_eq!(
            first,
            "Here are the tasks in your list:\n1.[T][ ] read book\n2.[T][X] clean room"
        );
        assert_eq!(first, second);
    }

    #[test]
    fn mark_and_unmark_messages() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        run_lines(&mut session, &["todo read book"]);

        assert_eq!(
            run_lines(&mut session, &["mark 1"]),
            "Nice! I've marked this task as done:\n  [T][X] read book"
        );
        assert_eq!(
            run_lines(&mut session, &["unmark 1"]),
            "OK, I've marked this task as not done yet:\n  [T][ ] read book"
        );
    }

    #[test]
    fn delete_reports_remaining_count() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        run_lines(&mut session, &["todo a", "todo b", "todo c"]);

        assert_eq!(
            run_lines(&mut session, &["delete 2"]),
            "Noted. I've removed this task:\n  [T][ ] b\nNow you have 2 tasks in the list."
        );
        let remaining: Vec<_> = session.tasks().iter().map(|t| t.description()).collect();
        assert_eq!(remaining, vec!["a", "c"]);
    }

    #[test]
    fn duplicate_is_reported_not_added() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);

        run_lines(&mut session, &["todo clean room"]);
        assert_eq!(
            run_lines(&mut session, &["todo clean room"]),
            "This task is already in your list:\n  1.[T][ ] clean room"
        );
        assert_eq!(session.tasks().len(), 1);

        run_lines(&mut session, &["mark 1", "todo clean room"]);
        assert_eq!(session.tasks().len(), 2);
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        run_lines(&mut session, &["todo a", "todo b", "todo c"]);
        let before = session.tasks().clone();

        for line in ["mark 0", "mark -1", "mark 4", "mark 99999999999999999999"] {
            let text = run_lines(&mut session, &[line]);
            assert!(text.starts_with("OOPS!!! There is no task number"), "{text}");
        }
        assert_eq!(session.tasks(), &before);

        assert!(run_lines(&mut session, &["blah"]).starts_with("OOPS!!! I'm sorry"));
        assert!(run_lines(&mut session, &["mark x"]).contains("is not a task number"));
        assert!(run_lines(&mut session, &["deadline submit report"])
            .contains("Use: deadline <description> /by <d/M/yyyy HHmm>"));
        assert!(run_lines(&mut session, &["event trip /from 1/1/2024 0900"])
            .starts_with("OOPS!!! An event needs"));
        assert!(run_lines(&mut session, &["deadline x /by 32/1/2024 0900"])
            .starts_with("OOPS!!! Invalid date '32/1/2024 0900'"));
        assert_eq!(
            run_lines(&mut session, &["todo"]),
            "OOPS!!! The description of a todo cannot be empty."
        );
        assert_eq!(session.tasks(), &before);
    }

    #[test]
    fn bye_exits() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);

        assert_eq!(session.handle_line("bye").unwrap(), Flow::Exit);
        assert_eq!(session.handle_line("list").unwrap(), Flow::Continue);
    }

    #[test]
    fn mutations_are_saved() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        run_lines(
            &mut session,
            &["todo read book", "deadline return book /by 2/12/2019 1800", "mark 2"],
        );

        let content = fs::read_to_string(dir.path().join("data").join("tasklist.txt")).unwrap();
        assert_eq!(
            content,
            "T | 0 | read book\nD | 1 | return book | 2/12/2019 1800\n"
        );

        let reloaded = new_session(&dir);
        assert_eq!(reloaded.tasks(), session.tasks());
    }

    #[test]
    fn failed_save_keeps_session_alive() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("tasklist.txt");
        fs::create_dir_all(path.join("blocker")).unwrap();
        let file = TaskFile::new(&path);
        let mut session = Session::new(
            "Friday",
            Loaded::default(),
            file,
            Output::new(Vec::new(), DIVIDER.len()),
        );

        let text = run_lines(&mut session, &["todo read book"]);
        assert!(text.contains("Got it. I've added this task:"));
        assert!(text.contains("OOPS!!! I couldn't save your tasks"));
        assert_eq!(session.tasks().len(), 1);

        assert_eq!(
            run_lines(&mut session, &["list"]),
            "Here are the tasks in your list:\n1.[T][ ] read book"
        );
    }

    #[test]
    fn run_treats_end_of_input_as_bye() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);

        session.run("todo read book\n".as_bytes()).unwrap();

        let text = String::from_utf8(session.into_output().into_inner()).unwrap();
        assert!(text.ends_with(&format!("Bye. Hope to see you again soon!\n{DIVIDER}\n")));
    }

    #[test]
    fn run_stops_at_bye() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);

        session.run("bye\ntodo never added\n".as_bytes()).unwrap();
        assert!(session.tasks().is_empty());
    }

    #[test]
    fn run_skips_line_that_is_not_utf8() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);

        session
            .run(&b"todo a\ntodo caf\xE9\ntodo b\nbye\n"[..])
            .unwrap();

        let remaining: Vec<_> = session.tasks().iter().map(|t| t.description()).collect();
        assert_eq!(remaining, vec!["a", "b"]);
        let text = String::from_utf8(session.into_output().into_inner()).unwrap();
        assert!(text.contains("OOPS!!! I can only read UTF-8 text"));
        assert!(text.ends_with(&format!("Bye. Hope to see you again soon!\n{DIVIDER}\n")));
    }

    #[test]
    fn run_accepts_crlf_input() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);

        session.run("todo read book\r\nbye\r\n".as_bytes()).unwrap();
        assert_eq!(session.tasks().len(), 1);
        assert_eq!(
            session.tasks().iter().next().unwrap().description(),
            "read book"
        );
    }

    #[test]
    fn greeting_mentions_skipped_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("tasklist.txt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "T | 0 | ok\nD | 0 | broken | never\n").unwrap();

        let mut session = new_session(&dir);
        session.greet().unwrap();

        let text = String::from_utf8(session.into_output().into_inner()).unwrap();
        assert!(text.contains("I couldn't read 1 saved line"));
    }
}
