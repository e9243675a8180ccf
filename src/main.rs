use minishell::history::History;
use minishell::line_source::{LineSource, PlainLines, Readline};
use minishell::{Config, Interpreter, Session};
use std::io::{self, IsTerminal};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config: Config = argh::from_env();
    log::debug!("starting with {:?}", config);

    let mut source: Box<dyn LineSource> = if config.plain || !io::stdin().is_terminal() {
        Box::new(PlainLines::new(io::stdin().lock(), io::stdout()))
    } else {
        match Readline::new() {
            Ok(editor) => Box::new(editor),
            Err(e) => {
                log::warn!("line editor unavailable, reading plain lines: {}", e);
                Box::new(PlainLines::new(io::stdin().lock(), io::stdout()))
            }
        }
    };

    let session = Session::new(History::with_capacity(config.history_size));
    let mut shell = Interpreter::with_builtins(session);
    shell.repl(
        source.as_mut(),
        &config.prompt,
        &mut io::stdout(),
        &mut io::stderr(),
    );

    ExitCode::SUCCESS
}
