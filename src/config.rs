use crate::history::DEFAULT_HISTORY_SIZE;
use argh::FromArgs;

/// Default prompt shown before each line.
pub const DEFAULT_PROMPT: &str = ">$~ ";

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

#[derive(FromArgs, Debug, Clone, PartialEq, Eq)]
/// A small interactive shell. Set RUST_LOG=debug for diagnostics.
pub struct Config {
    #[argh(option, default = "default_prompt()")]
    /// prompt printed before each input line.
    pub prompt: String,

    #[argh(option, default = "default_history_size()")]
    /// number of command names kept by `history`; the oldest are dropped first.
    pub history_size: usize,

    #[argh(switch)]
    /// read plain lines from stdin even when it is a terminal.
    pub plain: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            history_size: default_history_size(),
            plain: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_args(&["minishell"], &[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.prompt, ">$~ ");
        assert_eq!(config.history_size, 1024);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_args(
            &["minishell"],
            &["--prompt", "$ ", "--history-size", "5", "--plain"],
        )
        .unwrap();
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.history_size, 5);
        assert!(config.plain);
    }

    #[test]
    fn test_rejects_bad_history_size() {
        assert!(Config::from_args(&["minishell"], &["--history-size", "many"]).is_err());
    }
}
