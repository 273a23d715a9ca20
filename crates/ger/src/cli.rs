use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line client for the Gerrit code review server.
#[derive(Debug, Parser)]
#[command(name = "ger", version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use an alternative remote from the configuration.
    #[arg(long, short, global = true, value_name = "NAME")]
    pub remote: Option<String>,

    /// Log to stderr; repeat for more detail.
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up and display changes.
    #[command(subcommand)]
    Change(ChangeCommand),

    /// Manage configured Gerrit remotes.
    #[command(subcommand)]
    Remote(RemoteCommand),
}

#[derive(Debug, Subcommand)]
pub enum RemoteCommand {
    /// Lists configured remotes.
    #[command(visible_alias = "ls")]
    List,

    /// Shows details of one remote, or of every remote.
    Show {
        /// Remote name.
        name: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ChangeCommand {
    /// Lists changes matching a query.
    #[command(visible_alias = "ls")]
    List {
        /// Limit the number of changes to output.
        #[arg(long, short = 'n', value_name = "max-count", default_value_t = 25)]
        limit: u32,

        /// Search query, e.g. "status:open" or "owner:self".
        #[arg(default_value = "status:open")]
        query: String,
    },

    /// Shows one change in detail.
    Show {
        /// Legacy numeric id, Change-Id, or commit SHA-1.
        change: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn change_list_defaults() {
        let cli = Cli::parse_from(["ger", "change", "list"]);
        match cli.command {
            Command::Change(ChangeCommand::List { limit, query }) => {
                assert_eq!(limit, 25);
                assert_eq!(query, "status:open");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn remote_list_alias_parses() {
        let cli = Cli::parse_from(["ger", "remote", "ls"]);
        assert!(matches!(cli.command, Command::Remote(RemoteCommand::List)));
    }

    #[test]
    fn change_list_alias_and_flags() {
        let cli = Cli::parse_from(["ger", "-r", "upstream", "change", "ls", "-n", "5", "owner:self"]);
        assert_eq!(cli.remote.as_deref(), Some("upstream"));
        match cli.command {
            Command::Change(ChangeCommand::List { limit, query }) => {
                assert_eq!(limit, 5);
                assert_eq!(query, "owner:self");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
