use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Parses the command line, installs logging and returns the action to run.
///
/// # Errors
///
/// Returns an error if logging cannot be installed or the arguments are inconsistent.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );
    let json = matches.get_flag(commands::logging::ARG_LOG_JSON);

    telemetry::init(verbosity_level, json)?;

    dispatch::handler(&matches)
}

#[cfg(test)]
mod tests {
    use super::get_verbosity_level;
    use tracing::Level;

    #[test]
    fn test_get_verbosity_level() {
        assert_eq!(get_verbosity_level(0), Level::ERROR);
        assert_eq!(get_verbosity_level(1), Level::WARN);
        assert_eq!(get_verbosity_level(2), Level::INFO);
        assert_eq!(get_verbosity_level(3), Level::DEBUG);
        assert_eq!(get_verbosity_level(4), Level::TRACE);
        assert_eq!(get_verbosity_level(9), Level::TRACE);
    }
}
