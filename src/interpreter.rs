use crate::command::{CommandFactory, Flow};
use crate::lexer;
use crate::line_source::{Line, LineSource};
use crate::session::Session;
use std::io::Write;

/// Name of the builtin whose invocations are never recorded in the history.
const HISTORY_COMMAND: &str = "history";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only support commands defined in this crate — BuiltinCommand and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal interactive shell: reads lines, splits them into words and runs either a
/// builtin or an external program.
///
/// The interpreter owns a [`Session`] and an ordered list of [`CommandFactory`]
/// objects. The first factory that recognises a command name gets to run it, so
/// builtins registered ahead of the external launcher shadow programs of the same name.
///
/// Example
/// ```
/// use minishell::{Flow, Interpreter};
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let flow = sh.dispatch("echo hello   world", &mut out, &mut std::io::sink());
/// assert_eq!(flow, Flow::Continue);
/// assert_eq!(out, b"hello world\n");
/// ```
pub struct Interpreter {
    session: Session,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>, session: Session) -> Self {
        Self { session, commands }
    }

    /// Create an interpreter with every builtin followed by the external launcher.
    pub fn with_builtins(session: Session) -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(
            vec![
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Pwd>::default()),
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Help>::default()),
                Box::new(Factory::<HistoryCmd>::default()),
                Box::new(Factory::<Echo>::default()),
                Box::new(Factory::<Ls>::default()),
                Box::new(Factory::<Touch>::default()),
                Box::new(Factory::<Date>::default()),
                Box::new(Factory::<Clear>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
            session,
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Tokenize one input line, record it in the history and run it.
    ///
    /// Blank lines do nothing. Every non-blank line except `history` itself is
    /// recorded before lookup, so unknown commands show up in the history too.
    pub fn dispatch(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Flow {
        let argv = lexer::split_into_tokens(line);
        let Some(name) = argv.command() else {
            return Flow::Continue;
        };

        if name != HISTORY_COMMAND {
            self.session.history.record(name);
        }

        self.run(name, argv.args(), stdout, stderr)
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Unknown commands are reported on `stderr`; the result is always a [`Flow`].
    pub fn run(
        &mut self,
        name: &str,
        args: &[&str],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Flow {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(name, args) {
                log::debug!(
                    "dispatching {} to {}",
                    name,
                    if factory.is_builtin() { "builtin" } else { "child process" }
                );
                let flow = cmd.execute(stdout, stderr, &mut self.session);
                let _ = stdout.flush();
                return flow;
            }
        }
        let _ = writeln!(stderr, "{}: command not found", name);
        Flow::Continue
    }

    /// Read-eval-print loop: prompt, read, dispatch, until `exit` or end of input.
    ///
    /// Ctrl-C at the prompt abandons the line. A read error is reported and ends
    /// the loop the same way end of input does.
    pub fn repl(
        &mut self,
        source: &mut dyn LineSource,
        prompt: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) {
        loop {
            match source.read_line(prompt) {
                Ok(Line::Text(line)) => {
                    if !self.dispatch(&line, stdout, stderr).should_continue() {
                        break;
                    }
                }
                Ok(Line::Interrupted) => continue,
                Ok(Line::Eof) => {
                    log::debug!("end of input");
                    break;
                }
                Err(e) => {
                    let _ = writeln!(stderr, "{}", e);
                    break;
                }
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::with_builtins(Session::default())
    }
}

#[cfg(test)]
mod repl_tests {
    use crate::Interpreter;
    use crate::command::{CommandFactory, Flow};
    use crate::history::History;
    use crate::line_source::PlainLines;
    use crate::session::Session;
    use crate::test_utils::lock_current_dir;
    use std::io::Cursor;

    struct Transcript {
        prompts: String,
        out: String,
        err: String,
    }

    fn run_script(sh: &mut Interpreter, script: &str) -> Transcript {
        run_bytes(sh, script.as_bytes())
    }

    fn run_bytes(sh: &mut Interpreter, input: &[u8]) -> Transcript {
        let mut prompts = Vec::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut source = PlainLines::new(Cursor::new(input.to_vec()), &mut prompts);
            sh.repl(&mut source, "> ", &mut out, &mut err);
        }
        Transcript {
            prompts: String::from_utf8(prompts).unwrap(),
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    fn history_names(sh: &Interpreter) -> Vec<String> {
        sh.session()
            .history
            .numbered()
            .map(|(_, name)| name.to_string())
            .collect()
    }

    #[test]
    fn test_blank_lines_are_not_recorded() {
        let mut sh = Interpreter::default();
        let mut out = Vec::new();
        let flow = sh.dispatch(" \t \n", &mut out, &mut Vec::new());

        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
        assert!(sh.session().history.is_empty());
    }

    #[test]
    fn test_history_never_lists_itself() {
        let mut sh = Interpreter::default();
        let t = run_script(&mut sh, "history\necho hi\nhistory\n");

        assert_eq!(
            t.out,
            "Command History:\nhi\nCommand History:\n1. echo\n"
        );
        assert_eq!(history_names(&sh), vec!["echo"]);
    }

    #[test]
    fn test_unknown_command_is_reported_and_recorded() {
        let mut sh = Interpreter::default();
        let t = run_script(&mut sh, "not_a_real_command_xyz --flag\necho still here\n");

        assert!(t.err.contains("not_a_real_command_xyz: command not found"));
        assert_eq!(t.out, "still here\n");
        assert_eq!(history_names(&sh), vec!["not_a_real_command_xyz", "echo"]);
        assert_eq!(t.prompts, "> > > ");
    }

    #[test]
    fn test_exit_stops_the_loop_despite_arguments() {
        let mut sh = Interpreter::default();
        let t = run_script(&mut sh, "exit now please\necho unreachable\n");

        assert!(t.out.is_empty());
        assert!(t.err.is_empty());
        assert_eq!(t.prompts, "> ");
        assert_eq!(history_names(&sh), vec!["exit"]);
    }

    #[test]
    fn test_end_of_input_stops_the_loop() {
        let mut sh = Interpreter::default();
        let t = run_script(&mut sh, "echo one\n");

        assert_eq!(t.out, "one\n");
        assert!(t.err.is_empty());
        assert_eq!(t.prompts, "> > ");
    }

    #[test]
    fn test_builtins_shadow_programs_on_path() {
        let _lock = lock_current_dir();
        let mut sh = Interpreter::default();
        // /bin/echo and /bin/pwd exist, but their output would not land in `out`
        let t = run_script(&mut sh, "echo shadowed\npwd\n");

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(t.out, format!("shadowed\n{}\n", cwd.display()));
        assert_eq!(sh.session().last_status, None);
    }

    #[test]
    fn test_every_builtin_shadows_programs_on_path() {
        let _lock = lock_current_dir();
        let names = [
            "cd", "pwd", "exit", "help", "history", "echo", "ls", "touch", "date", "clear",
        ];
        let mut sh = Interpreter::default();
        for name in names {
            let factory = sh
                .commands
                .iter()
                .find(|factory| factory.try_create(name, &["."]).is_some())
                .expect("every builtin name resolves");
            assert!(factory.is_builtin(), "{} resolved to a program", name);
        }

        // running them never starts a child process
        let mut out = Vec::new();
        let mut err = Vec::new();
        for name in names {
            let line = if name == "cd" { "cd ." } else { name };
            sh.dispatch(line, &mut out, &mut err);
        }
        assert_eq!(sh.session().last_status, None);
        assert!(String::from_utf8(err).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_line_does_not_stop_the_loop() {
        let mut sh = Interpreter::default();
        let t = run_bytes(&mut sh, b"echo \xff\xfe\n echo after\n");

        assert_eq!(t.out, "\u{fffd}\u{fffd}\nafter\n");
        assert!(t.err.is_empty());
        assert_eq!(history_names(&sh), vec!["echo", "echo"]);
    }

    #[test]
    fn test_failed_cd_keeps_directory() {
        let _lock = lock_current_dir();
        let before = std::env::current_dir().unwrap();
        let mut sh = Interpreter::default();
        let t = run_script(&mut sh, "cd /no/such/dir/for/minishell\npwd\n");

        assert!(t.err.starts_with("cd: "));
        assert_eq!(t.out, format!("{}\n", before.display()));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_without_argument_reports_and_continues() {
        let _lock = lock_current_dir();
        let before = std::env::current_dir().unwrap();
        let mut sh = Interpreter::default();
        let t = run_script(&mut sh, "cd\necho after\n");

        assert!(!t.err.is_empty());
        assert_eq!(t.out, "after\n");
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    #[cfg(unix)]
    fn test_external_command_runs_and_loop_continues() {
        let mut sh = Interpreter::default();
        let t = run_script(&mut sh, "sh -c true\nfalse\necho done\n");

        assert_eq!(t.out, "done\n");
        assert_eq!(sh.session().last_status, Some(1));
        assert_eq!(history_names(&sh), vec!["sh", "false", "echo"]);
    }

    #[test]
    fn test_history_capacity_evicts_oldest() {
        let _lock = lock_current_dir();
        let mut sh = Interpreter::with_builtins(Session::new(History::with_capacity(2)));
        let t = run_script(&mut sh, "echo a\npwd\nclear\nhistory\n");

        assert!(t.out.ends_with("Command History:\n2. pwd\n3. clear\n"));
    }

    #[test]
    fn test_custom_registry_without_launcher() {
        let commands: Vec<Box<dyn CommandFactory>> = vec![Box::new(
            crate::interpreter::Factory::<crate::builtin::Echo>::default(),
        )];
        let mut sh = Interpreter::new(commands, Session::default());
        let mut err = Vec::new();
        let flow = sh.dispatch("ls", &mut Vec::new(), &mut err);

        assert_eq!(flow, Flow::Continue);
        assert_eq!(String::from_utf8(err).unwrap(), "ls: command not found\n");
    }
}
