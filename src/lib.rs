//! A tiny interactive command shell.
//!
//! Each input line is split on whitespace into an argument vector. The first word
//! names either a builtin implemented in this crate or a program found through
//! `PATH`, which is started as a child process and waited for before the next
//! prompt. There is no quoting, piping, redirection, globbing or job control.
//!
//! The main entry point is [`Interpreter`], which owns the [`Session`] state and
//! routes each line through an ordered list of command factories.

mod builtin;
pub mod command;
pub mod config;
pub mod errors;
mod external;
pub mod history;
mod interpreter;
pub mod lexer;
pub mod line_source;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use command::{ExitCode, Flow};
pub use config::Config;
pub use interpreter::Interpreter;
pub use session::Session;
