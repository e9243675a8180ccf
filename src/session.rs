use crate::command::ExitCode;
use crate::history::History;

/// Mutable state owned by the dispatch loop and lent to every command it runs.
///
/// The working directory is deliberately absent: `cd` changes it process-wide so
/// that launched programs inherit it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Names of previously invoked commands.
    pub history: History,
    /// Exit code of the most recent external program, if any ran.
    pub last_status: Option<ExitCode>,
}

impl Session {
    pub fn new(history: History) -> Self {
        Self {
            history,
            last_status: None,
        }
    }
}
