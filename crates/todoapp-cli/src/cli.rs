use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use todoapp_core::Filter;
use todoapp_shared::TaskId;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// One `--rc key=value` override. The value may be empty, the key may not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Self {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            }),
            Some(_) => Err(anyhow!("missing key in override: {raw}")),
            None => Err(anyhow!("expected key=value, got: {raw}")),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "todo",
    version,
    about = "Terminal client for the todoapp task service",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Override a config key, e.g. `--rc api_base=http://localhost:8000`.
    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Exchange a username and password for a session.
    Login {
        username: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// List tasks.
    List {
        #[arg(long, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Show one task in full.
    Show { id: TaskId },
    /// Create a task. Words are joined with spaces.
    Add {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        title: Vec<String>,
    },
    /// Flip a task between complete and incomplete.
    Toggle { id: TaskId },
    /// Delete a task.
    Delete { id: TaskId },
    /// Delete every task, one request at a time.
    Clear,
}

/// `-q` wins over `-v`; with neither, only warnings reach stderr.
fn default_level(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) | (0, 0) => "warn",
        (0, 1) => "info",
        (0, 2) => "debug",
        (0, _) => "trace",
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(verbose, quiet)))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_rc_overrides_and_subcommand() {
        let cli = GlobalCli::parse_from([
            "todo",
            "--rc",
            "api_base=http://localhost:8000",
            "list",
            "--filter",
            "incomplete",
        ]);

        assert_eq!(cli.rc_overrides.len(), 1);
        assert_eq!(cli.rc_overrides[0].key, "api_base");
        assert!(matches!(
            cli.command,
            Command::List {
                filter: Filter::Incomplete
            }
        ));
    }

    #[test]
    fn add_joins_words_and_ids_parse() {
        let cli = GlobalCli::parse_from(["todo", "add", "buy", "milk"]);
        match cli.command {
            Command::Add { title } => assert_eq!(title.join(" "), "buy milk"),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = GlobalCli::parse_from(["todo", "toggle", "12"]);
        assert!(matches!(
            cli.command,
            Command::Toggle {
                id: TaskId::Number(12)
            }
        ));
    }

    #[test]
    fn overrides_need_a_key() {
        assert_eq!(
            " timeout_secs = 5 ".parse::<KeyVal>().expect("kv"),
            KeyVal {
                key: "timeout_secs".to_string(),
                value: "5".to_string(),
            }
        );
        assert_eq!("api_base=".parse::<KeyVal>().expect("kv").value, "");
        assert!("=5".parse::<KeyVal>().is_err());
        assert!("api_base".parse::<KeyVal>().is_err());
    }

    #[test]
    fn quiet_beats_verbose() {
        assert_eq!(default_level(0, 0), "warn");
        assert_eq!(default_level(2, 0), "debug");
        assert_eq!(default_level(5, 0), "trace");
        assert_eq!(default_level(3, 1), "warn");
        assert_eq!(default_level(0, 3), "error");
    }

    #[test]
    fn rejects_unknown_filter() {
        assert!(GlobalCli::try_parse_from(["todo", "list", "--filter", "done"]).is_err());
    }
}
