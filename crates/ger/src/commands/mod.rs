pub mod change;
pub mod remote;

use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::config::Config;

pub fn run(config: &Config, cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Change(cmd) => change::exec(config, cli.remote.as_deref(), cmd),
        Command::Remote(cmd) => remote::exec(config, cmd),
    }
}
