//! Output formatting for the conversation

use std::io::{self, Write};

/// Prefix for every error shown to the user
pub const ERROR_MARKER: &str = "OOPS!!!";

/// Writes responses framed by divider lines
pub struct Output<W: Write> {
    writer: W,
    divider: String,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W, divider_width: usize) -> Self {
        Self {
            writer,
            divider: "_".repeat(divider_width),
        }
    }

    /// Prints one response between two divider lines
    pub fn response<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        writeln!(self.writer, "{}", self.divider)?;
        for line in lines {
            writeln!(self.writer, "{}", line.as_ref())?;
        }
        writeln!(self.writer, "{}", self.divider)?;
        self.writer.flush()
    }

    /// Prints an error message with the error marker
    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.response(&[format!("{} {}", ERROR_MARKER, message)])
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consumes the output, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
