pub mod logging;

use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";
pub const ARG_AUTO_APPROVE: &str = "auto-approve";
pub const ARG_POLL_INTERVAL: &str = "poll-interval";
pub const ARG_DELEGATION_TTL: &str = "delegation-ttl";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!(
            "{} - {}",
            env!("CARGO_PKG_VERSION"),
            crate::app_lib::GIT_COMMIT_HASH
        )
        .into_boxed_str(),
    );

    let command = Command::new("marks-dev")
        .about("Local identity provider and student backend for development")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("4943")
                .env("MARKS_DEV_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_AUTO_APPROVE)
                .long("auto-approve")
                .help("Approve sign-in requests without opening the approval page")
                .env("MARKS_DEV_AUTO_APPROVE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_POLL_INTERVAL)
                .long("poll-interval")
                .help("Polling interval suggested to clients, in milliseconds")
                .default_value("500")
                .env("MARKS_DEV_POLL_INTERVAL")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_DELEGATION_TTL)
                .long("delegation-ttl")
                .help("Lifetime of issued delegations, in seconds")
                .default_value("28800")
                .env("MARKS_DEV_DELEGATION_TTL")
                .value_parser(clap::value_parser!(u64)),
        );

    logging::with_args(command)
}
