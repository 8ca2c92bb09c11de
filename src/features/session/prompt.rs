//! Hands the provider's verification URI to the user during interactive login.

use crate::app_lib::AppError;
use tracing::info;

pub trait LoginPrompt {
    /// Called synchronously from the user's sign-in gesture, before any
    /// network round trip.
    fn prepare(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn open(&self, verification_uri: &str) -> Result<(), AppError>;
}

/// Logs the URI; used where there is no window to open.
pub struct LogPrompt;

impl LoginPrompt for LogPrompt {
    fn open(&self, verification_uri: &str) -> Result<(), AppError> {
        info!(%verification_uri, "Complete sign-in at the identity provider");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
const PROVIDER_WINDOW: &str = "idpWindow";

/// Opens the provider in a named window, reused across attempts.
///
/// Browsers only allow pop-ups during a user gesture, so `prepare` opens a
/// blank window right away and `open` later points it at the provider.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct WindowPrompt {
    popup: std::cell::RefCell<Option<web_sys::Window>>,
}

#[cfg(target_arch = "wasm32")]
impl WindowPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn open_provider_window(url: &str) -> Result<web_sys::Window, AppError> {
    let window =
        web_sys::window().ok_or_else(|| AppError::Config("No browser window.".to_string()))?;
    match window.open_with_url_and_target(url, PROVIDER_WINDOW) {
        Ok(Some(popup)) => Ok(popup),
        Ok(None) | Err(_) => Err(AppError::Config(
            "The identity provider window was blocked. Allow pop-ups and retry.".to_string(),
        )),
    }
}

#[cfg(target_arch = "wasm32")]
impl LoginPrompt for WindowPrompt {
    fn prepare(&self) -> Result<(), AppError> {
        let popup = open_provider_window("about:blank")?;
        *self.popup.borrow_mut() = Some(popup);
        Ok(())
    }

    fn open(&self, verification_uri: &str) -> Result<(), AppError> {
        let popup = self.popup.borrow_mut().take();
        let Some(popup) = popup.filter(|popup| !popup.closed().unwrap_or(true)) else {
            return open_provider_window(verification_uri).map(|_| ());
        };

        popup.location().set_href(verification_uri).map_err(|_| {
            AppError::Config("Could not reach the identity provider window.".to_string())
        })
    }
}
