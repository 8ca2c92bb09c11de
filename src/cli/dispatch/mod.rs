use crate::cli::{
    actions::{Action, dev_server::Args},
    commands,
};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .context("missing required argument: --port")?;
    let auto_approve = matches.get_flag(commands::ARG_AUTO_APPROVE);
    let poll_interval_ms = matches
        .get_one::<u64>(commands::ARG_POLL_INTERVAL)
        .copied()
        .context("missing required argument: --poll-interval")?;
    let delegation_ttl_secs = matches
        .get_one::<u64>(commands::ARG_DELEGATION_TTL)
        .copied()
        .context("missing required argument: --delegation-ttl")?;

    Ok(Action::DevServer(Args {
        port,
        auto_approve,
        poll_interval_ms,
        delegation_ttl_secs,
    }))
}
