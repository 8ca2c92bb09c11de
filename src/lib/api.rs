//! HTTP helpers for JSON APIs with consistent timeouts and error handling. Feature
//! clients use these helpers to avoid duplicating request setup. The helpers do
//! not store credentials; they only attach the bearer token a caller passes in.

use super::errors::AppError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};

/// Default request timeout (milliseconds); browsers apply their own, so native only.
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client used by the auth and backend clients.
pub fn build_client() -> Result<Client, AppError> {
    let builder = Client::builder();

    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder
        .user_agent(APP_USER_AGENT)
        .timeout(std::time::Duration::from_millis(DEFAULT_TIMEOUT_MS));

    builder
        .build()
        .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))
}

/// Fetches JSON, optionally authorized with a bearer token.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    token: Option<&SecretString>,
) -> Result<T, AppError> {
    let response = send(with_bearer(client.get(url), token)).await?;
    handle_json_response(response).await
}

/// Posts JSON and parses a JSON response.
pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    client: &Client,
    url: &str,
    body: &B,
    token: Option<&SecretString>,
) -> Result<T, AppError> {
    let response = send(with_bearer(client.post(url).json(body), token)).await?;
    handle_json_response(response).await
}

/// Posts JSON and ignores any response body on success.
pub async fn post_json_empty<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    body: &B,
    token: Option<&SecretString>,
) -> Result<(), AppError> {
    let response = send(with_bearer(client.post(url).json(body), token)).await?;
    handle_empty_response(response).await
}

/// Puts JSON and ignores any response body on success.
pub async fn put_json_empty<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    body: &B,
    token: Option<&SecretString>,
) -> Result<(), AppError> {
    let response = send(with_bearer(client.put(url).json(body), token)).await?;
    handle_empty_response(response).await
}

/// Sends a DELETE and expects no meaningful body.
pub async fn delete_empty(
    client: &Client,
    url: &str,
    token: Option<&SecretString>,
) -> Result<(), AppError> {
    let response = send(with_bearer(client.delete(url), token)).await?;
    handle_empty_response(response).await
}

/// Posts an empty body, used to revoke a delegation.
pub async fn post_empty(
    client: &Client,
    url: &str,
    token: Option<&SecretString>,
) -> Result<(), AppError> {
    let response = send(with_bearer(client.post(url), token)).await?;
    handle_empty_response(response).await
}

/// Posts an empty body and returns `None` while the server answers 202/204.
pub async fn post_optional_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
) -> Result<Option<T>, AppError> {
    let response = send(client.post(url)).await?;
    handle_optional_json_response(response).await
}

/// Builds a URL from an explicit base URL and the provided path.
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn with_bearer(builder: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token.expose_secret()),
        None => builder,
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, AppError> {
    builder.send().await.map_err(map_request_error)
}

/// Maps transport errors into `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Serialization(format!("Failed to build request: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

/// Handles empty responses and returns sanitized HTTP errors when needed.
async fn handle_empty_response(response: Response) -> Result<(), AppError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

/// Parses optional JSON responses; 202 and 204 mean "nothing yet".
async fn handle_optional_json_response<T: DeserializeOwned>(
    response: Response,
) -> Result<Option<T>, AppError> {
    let status = response.status();
    if status == StatusCode::ACCEPTED || status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AppError::Http {
        status,
        message: sanitize_body(&body),
    }
}

/// Sanitizes HTTP error bodies by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_ERROR_CHARS, build_url_with_base, sanitize_body};

    #[test]
    fn build_url_joins_without_doubling_slashes() {
        assert_eq!(
            build_url_with_base("https://backend.dev/", "/v1/students"),
            "https://backend.dev/v1/students"
        );
        assert_eq!(
            build_url_with_base("https://backend.dev", "v1/students/7"),
            "https://backend.dev/v1/students/7"
        );
    }

    #[test]
    fn build_url_with_empty_base_is_relative() {
        assert_eq!(build_url_with_base("  ", "/v1/students"), "/v1/students");
    }

    #[test]
    fn sanitize_body_defaults_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  not found \n"), "not found");

        let long = "x".repeat(MAX_ERROR_CHARS * 2);
        assert_eq!(sanitize_body(&long).chars().count(), MAX_ERROR_CHARS);
    }
}
