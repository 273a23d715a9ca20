use anyhow::Result;
use gerlib::{AdditionalOpt, HttpRequestHandler, QueryParams, RestHandler};
use tracing::info;

use crate::cli::ChangeCommand;
use crate::config::Config;
use crate::output;

pub fn exec(config: &Config, remote: Option<&str>, cmd: &ChangeCommand) -> Result<()> {
    let (name, remote) = config.select_remote(remote)?;
    info!(remote = name, url = %remote.url, "using remote");
    let transport =
        HttpRequestHandler::new(&remote.url, &remote.username, &remote.http_password)?;
    let rest = RestHandler::new(transport)?;

    let stdout = std::io::stdout();
    match cmd {
        ChangeCommand::List { limit, query } => {
            let params = QueryParams {
                queries: vec![query.clone()],
                additional_opts: vec![
                    AdditionalOpt::DetailedAccounts,
                    AdditionalOpt::CurrentRevision,
                ],
                limit: Some(*limit),
                start: None,
            };
            let changes = rest.query_changes(&params)?;
            output::print_change_list(&mut stdout.lock(), &changes)?;
        }
        ChangeCommand::Show { change } => {
            let change = rest.get_change(change)?;
            output::print_change(&mut stdout.lock(), &change)?;
        }
    }
    Ok(())
}
