use crate::command::{CommandFactory, ExecutableCommand, Flow};
use crate::interpreter::Factory;
use crate::session::Session;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are built through the [`argh`] crate's `FromArgs` trait and executed
/// directly in-process without spawning a child process. Their `FromArgs` impls
/// read positional words only and ignore surplus ones, so paths may start with `-`.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Executes the command with the shell's output streams and session.
    ///
    /// An `Err` is reported on `stderr` as `<name>: <error>` and the shell carries on.
    fn execute(
        self,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        session: &mut Session,
    ) -> Result<Flow>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        session: &mut Session,
    ) -> Flow {
        match T::execute(*self, stdout, stderr, session) {
            Ok(flow) => flow,
            Err(e) => {
                let _ = writeln!(stderr, "{}: {:#}", T::name(), e);
                Flow::Continue
            }
        }
    }
}

/// Result of an argument parse that ended early: either informational output
/// or a usage error.
struct InvalidArgs {
    name: &'static str,
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Flow {
        let output = self.output.trim_end();
        if self.is_error {
            let _ = writeln!(stderr, "{}: {}", self.name, output);
        } else {
            let _ = writeln!(stdout, "{}", output);
        }
        Flow::Continue
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    name: T::name(),
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

/// Usage lines printed by `help`, in registry order.
pub(crate) const BUILTIN_USAGE: &[(&str, &str)] = &[
    ("cd <directory>", "Change the current directory"),
    ("pwd", "Print the current working directory"),
    ("exit", "Exit the shell"),
    ("help", "Display this help message"),
    ("history", "Display the command history"),
    ("echo [args...]", "Display a line of text made of the arguments"),
    ("ls [directory]", "List all entries of a directory"),
    ("touch <files...>", "Create each file, emptying it if it exists"),
    ("date", "Display the local date and time"),
    ("clear", "Clear the terminal screen"),
];

fn usage_error(message: &str) -> EarlyExit {
    EarlyExit {
        output: message.to_string(),
        status: Err(()),
    }
}

/// Implements `FromArgs` for builtins that take no arguments and ignore any given.
macro_rules! ignores_args {
    ($($builtin:ident),+ $(,)?) => {
        $(
            impl FromArgs for $builtin {
                fn from_args(_command_name: &[&str], _args: &[&str]) -> Result<Self, EarlyExit> {
                    Ok($builtin {})
                }
            }
        )+
    };
}

ignores_args!(Pwd, Help, HistoryCmd, Date, Clear);

/// Change the current working directory of the shell.
pub struct Cd {
    /// Directory to switch to; absolute or relative to the current directory.
    pub dir: String,
}

impl FromArgs for Cd {
    fn from_args(_command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        match args.first() {
            Some(dir) => Ok(Cd {
                dir: dir.to_string(),
            }),
            None => Err(usage_error("expected a directory argument")),
        }
    }
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        env::set_current_dir(&self.dir)
            .with_context(|| format!("can't change directory to {}", self.dir))?;
        Ok(Flow::Continue)
    }
}

/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        let cwd = env::current_dir().context("can't resolve the current directory")?;
        writeln!(stdout, "{}", cwd.display())?;
        Ok(Flow::Continue)
    }
}

/// Exit the shell. Any arguments are ignored.
pub struct Exit;

impl FromArgs for Exit {
    fn from_args(_command_name: &[&str], _args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Exit)
    }
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        Ok(Flow::Exit)
    }
}

/// Display a summary of the built-in commands.
pub struct Help {}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        writeln!(stdout, "-------- minishell --------")?;
        writeln!(stdout, "     Supported built-in commands:")?;
        for (usage, text) in BUILTIN_USAGE {
            writeln!(stdout, "  -> {} - {}", usage, text)?;
        }
        Ok(Flow::Continue)
    }
}

/// Display the names of previously invoked commands.
pub struct HistoryCmd {}

impl BuiltinCommand for HistoryCmd {
    fn name() -> &'static str {
        "history"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        session: &mut Session,
    ) -> Result<Flow> {
        writeln!(stdout, "Command History:")?;
        for (number, name) in session.history.numbered() {
            writeln!(stdout, "{}. {}", number, name)?;
        }
        Ok(Flow::Continue)
    }
}

/// Write the arguments to standard output, separated by spaces and followed by a
/// newline. Every argument is printed verbatim, including ones that look like flags.
pub struct Echo {
    pub args: Vec<String>,
}

impl FromArgs for Echo {
    fn from_args(_command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Echo {
            args: args.iter().map(|arg| arg.to_string()).collect(),
        })
    }
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        writeln!(stdout, "{}", self.args.join(" "))?;
        Ok(Flow::Continue)
    }
}

/// List the entries of a directory, one per line, in directory order.
pub struct Ls {
    /// Directory to list. Defaults to the current directory.
    pub dir: Option<String>,
}

impl FromArgs for Ls {
    fn from_args(_command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Ls {
            dir: args.first().map(|dir| dir.to_string()),
        })
    }
}

impl BuiltinCommand for Ls {
    fn name() -> &'static str {
        "ls"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        let dir = self.dir.as_deref().unwrap_or(".");
        let entries = fs::read_dir(dir).with_context(|| format!("can't open {}", dir))?;

        // read_dir hides the self and parent entries
        writeln!(stdout, ".")?;
        writeln!(stdout, "..")?;
        for entry in entries {
            let entry = entry.with_context(|| format!("can't read {}", dir))?;
            writeln!(stdout, "{}", entry.file_name().to_string_lossy())?;
        }
        Ok(Flow::Continue)
    }
}

/// Create each file, truncating it when it already exists.
pub struct Touch {
    pub files: Vec<String>,
}

impl FromArgs for Touch {
    fn from_args(_command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Touch {
            files: args.iter().map(|file| file.to_string()).collect(),
        })
    }
}

impl BuiltinCommand for Touch {
    fn name() -> &'static str {
        "touch"
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        for file in &self.files {
            if let Err(e) = fs::File::create(file) {
                writeln!(stderr, "touch: {}: {}", file, e)?;
            }
        }
        Ok(Flow::Continue)
    }
}

/// Print the current local date and time.
pub struct Date {}

impl BuiltinCommand for Date {
    fn name() -> &'static str {
        "date"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        let now = chrono::Local::now();
        writeln!(stdout, "Current time: {}", now.format("%a %b %e %H:%M:%S %Y"))?;
        Ok(Flow::Continue)
    }
}

/// Clear the terminal screen and move the cursor home.
pub struct Clear {}

impl BuiltinCommand for Clear {
    fn name() -> &'static str {
        "clear"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<Flow> {
        write!(stdout, "\x1b[2J\x1b[H")?;
        stdout.flush()?;
        Ok(Flow::Continue)
    }
}
