use crate::dev::{self, DevSettings};
use anyhow::Result;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub auto_approve: bool,
    pub poll_interval_ms: u64,
    pub delegation_ttl_secs: u64,
}

impl From<&Args> for DevSettings {
    fn from(args: &Args) -> Self {
        Self {
            auto_approve: args.auto_approve,
            poll_interval_ms: args.poll_interval_ms,
            delegation_ttl_secs: args.delegation_ttl_secs,
            ..Self::default()
        }
    }
}

/// Execute the dev server action.
/// # Errors
/// Returns an error if the port cannot be bound or the server stops unexpectedly.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        port = args.port,
        auto_approve = args.auto_approve,
        poll_interval_ms = args.poll_interval_ms,
        "Starting marks-dev"
    );

    dev::new(args.port, DevSettings::from(&args)).await
}

#[cfg(test)]
mod tests {
    use super::Args;
    use crate::dev::DevSettings;

    #[test]
    fn test_settings_from_args() {
        let settings = DevSettings::from(&Args {
            port: 4943,
            auto_approve: true,
            poll_interval_ms: 50,
            delegation_ttl_secs: 60,
        });

        assert!(settings.auto_approve);
        assert_eq!(settings.poll_interval_ms, 50);
        assert_eq!(settings.delegation_ttl_secs, 60);
        assert_eq!(settings.request_ttl_ms, DevSettings::default().request_ttl_ms);
    }
}
