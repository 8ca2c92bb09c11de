//! Build-time configuration for the backend and identity provider endpoints
//! with an optional runtime override. The runtime config is read from
//! `window.MARKS_CONFIG` (if present) so static deployments can change endpoints
//! without rebuilding. Configuration values are public; do not store secrets here.

use super::errors::AppError;
use url::Url;

/// Identity provider used in development when nothing else is configured.
const DEFAULT_LOCAL_PROVIDER: &str = "http://localhost:4943";

/// Deployment environment; selects which identity provider the login flow uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything other than `production` (case-insensitive) is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend_base_url: String,
    pub identity_provider_url: String,
    pub identity_canister_id: String,
    pub environment: Environment,
    pub app_name: String,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let backend_base_url = option_env!("MARKS_BACKEND_URL").unwrap_or("");
        let identity_provider_url =
            option_env!("MARKS_IDENTITY_PROVIDER_URL").unwrap_or(DEFAULT_LOCAL_PROVIDER);
        let identity_canister_id = option_env!("MARKS_IDENTITY_CANISTER_ID").unwrap_or("");
        let environment =
            option_env!("MARKS_ENV").map_or(Environment::Development, Environment::parse);
        let app_name = option_env!("MARKS_APP_NAME").unwrap_or(env!("CARGO_PKG_NAME"));

        let mut config = Self {
            backend_base_url: backend_base_url.to_string(),
            identity_provider_url: identity_provider_url.to_string(),
            identity_canister_id: identity_canister_id.to_string(),
            environment,
            app_name: app_name.to_string(),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    /// Identity provider for the interactive login.
    ///
    /// Development points at the local provider, tagged with the identity
    /// canister id when one is configured. Production returns `None` so the
    /// auth client falls back to its default remote provider.
    pub fn identity_provider(&self) -> Result<Option<Url>, AppError> {
        match self.environment {
            Environment::Production => Ok(None),
            Environment::Development => {
                let mut url = Url::parse(self.identity_provider_url.trim()).map_err(|err| {
                    AppError::Config(format!("Invalid identity provider URL: {err}"))
                })?;
                let canister_id = self.identity_canister_id.trim();
                if !canister_id.is_empty() {
                    url.query_pairs_mut().append_pair("canisterId", canister_id);
                }
                Ok(Some(url))
            }
        }
    }
}

#[derive(Default)]
struct RuntimeConfig {
    backend_base_url: Option<String>,
    identity_provider_url: Option<String>,
    identity_canister_id: Option<String>,
    environment: Option<String>,
    app_name: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.backend_base_url {
        config.backend_base_url = value;
    }
    if let Some(value) = runtime.identity_provider_url {
        config.identity_provider_url = value;
    }
    if let Some(value) = runtime.identity_canister_id {
        config.identity_canister_id = value;
    }
    if let Some(value) = runtime.environment {
        config.environment = Environment::parse(&value);
    }
    if let Some(value) = runtime.app_name {
        config.app_name = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("MARKS_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        backend_base_url: read_runtime_value(&object, "backend_base_url"),
        identity_provider_url: read_runtime_value(&object, "identity_provider_url"),
        identity_canister_id: read_runtime_value(&object, "identity_canister_id"),
        environment: read_runtime_value(&object, "environment"),
        app_name: read_runtime_value(&object, "app_name"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
