//! Where input lines come from.
//!
//! [`Readline`] serves interactive terminals through rustyline; [`PlainLines`]
//! reads any buffered stream and is used for pipes, files and tests.

use crate::errors::ShellResult;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, ErrorKind, Write};

/// One line of input, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    /// The user abandoned the line (Ctrl-C at the prompt).
    Interrupted,
    /// The input stream is closed.
    Eof,
}

/// A source of input lines that shows `prompt` before each one.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> ShellResult<Line>;
}

/// Interactive line reader backed by rustyline.
///
/// Entries are not added to the editor's own history, so there is no recall.
pub struct Readline {
    editor: DefaultEditor,
}

impl Readline {
    pub fn new() -> ShellResult<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Readline {
    fn read_line(&mut self, prompt: &str) -> ShellResult<Line> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Line::Text(line)),
            Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
            Err(ReadlineError::Eof) => Ok(Line::Eof),
            Err(ReadlineError::Io(e)) if e.kind() == ErrorKind::InvalidData => {
                log::warn!("discarding undecodable input line: {}", e);
                Ok(Line::Interrupted)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Line reader over any [`BufRead`], printing the prompt to `prompt_out`.
pub struct PlainLines<R, W> {
    input: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PlainLines<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Self { input, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for PlainLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> ShellResult<Line> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;

        // bytes that are not UTF-8 become U+FFFD instead of failing the read
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(Line::Eof);
        }
        Ok(Line::Text(String::from_utf8_lossy(&buf).into_owned()))
    }
}
