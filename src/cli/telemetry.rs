use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Installs the global subscriber: a fmt layer (plain or JSON) filtered by
/// `RUST_LOG`, falling back to `level`.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init(level: Level, json: bool) -> Result<()> {
    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if json {
        let subscriber = Registry::default()
            .with(fmt::layer().json().with_current_span(true))
            .with(env_filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let fmt_layer = fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(false);
        let subscriber = Registry::default().with(fmt_layer).with(env_filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
