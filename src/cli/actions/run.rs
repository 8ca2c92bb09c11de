use crate::cli::actions::{Action, dev_server};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::DevServer(args) => dev_server::execute(args).await,
    }
}
