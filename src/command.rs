use crate::session::Session;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Programs killed by a signal are reported as `128 + signal`, like POSIX shells do.
pub type ExitCode = i32;

/// What the dispatch loop should do after a command has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Prompt for the next line.
    Continue,
    /// Leave the loop and terminate the shell successfully.
    Exit,
}

impl Flow {
    pub fn should_continue(self) -> bool {
        self == Flow::Continue
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
/// Failures are reported on `stderr` by the command itself; the loop only ever
/// sees the resulting [`Flow`].
pub trait ExecutableCommand {
    /// Executes the command once.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        session: &mut Session,
    ) -> Flow;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;

    /// Whether this factory produces shell builtins rather than child processes.
    fn is_builtin(&self) -> bool {
        true
    }
}
