use rustyline::error::ReadlineError;
use std::io;
use thiserror::Error;

/// Errors raised while acquiring input lines.
///
/// Command failures never show up here: builtins and launched programs report
/// their own errors and only hand a [`Flow`](crate::Flow) back to the loop.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("readline error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("input error: {0}")]
    Io(#[from] io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
