use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Flow};
use crate::interpreter::Factory;
use crate::session::Session;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Command that is not a builtin: a program started as a child process.
pub struct ExternalCommand {
    /// Name as typed by the user, passed as `argv[0]`.
    name: OsString,
    /// Resolved location of the program.
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(name: OsString, program: PathBuf, args: Vec<OsString>) -> Self {
        Self {
            name,
            program,
            args,
        }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = std::env::var_os("PATH").unwrap_or_default();
        let executable = find_command_path(&search_paths, Path::new(name))?;
        Some(Box::new(ExternalCommand::new(
            name.into(),
            executable.into_owned(),
            args.iter().map(|x| x.into()).collect(),
        )))
    }

    fn is_builtin(&self) -> bool {
        false
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        session: &mut Session,
    ) -> Flow {
        let display_name = self.name.to_string_lossy();
        // the child writes straight to the inherited descriptors
        let _ = stdout.flush();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        set_arg0(&mut cmd, &self.name);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                let _ = writeln!(stderr, "{}: {}", display_name, e);
                return Flow::Continue;
            }
        };
        log::debug!("spawned {} as pid {}", self.program.display(), child.id());

        // Child::wait returns only once the child has terminated; a stopped child
        // keeps the shell waiting.
        match child.wait() {
            Ok(status) => {
                let code = exit_code(status);
                log::debug!("{} exited with status {}", display_name, code);
                session.last_status = Some(code);
            }
            Err(e) => {
                let _ = writeln!(stderr, "{}: wait failed: {}", display_name, e);
            }
        }
        Flow::Continue
    }
}

#[cfg(unix)]
fn set_arg0(cmd: &mut Command, name: &OsStr) {
    use std::os::unix::process::CommandExt;
    cmd.arg0(name);
}

#[cfg(not(unix))]
fn set_arg0(_cmd: &mut Command, _name: &OsStr) {}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it exists.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first executable regular file with that name.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

/// A regular file with at least one execute bit, as `execvp` requires.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
