//! Shared utilities for HTTP access, configuration, errors, runtime shims and
//! build metadata.
//!
//! ## Remote collaborators
//!
//! ### Identity provider
//!
//! 1. **Authorize:** the client POSTs to `/v1/authorize` and receives a request id
//!    plus a verification URI the user opens to approve the sign-in.
//! 2. **Poll:** the client POSTs to `/v1/authorize/{request_id}/token` until the
//!    provider answers `200` with a delegation (`202` means "still waiting").
//! 3. **Revoke:** sign-out POSTs to `/v1/logout` with the delegation as a bearer
//!    token.
//!
//! ### Student backend
//!
//! `/v1/students` (list, create) and `/v1/students/{id}` (update, delete), all
//! authorized with the delegation as a bearer token.
//!
//! These helpers never log delegations; callers must not either.

pub mod api;
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub mod config;
pub mod errors;
pub mod runtime;
#[cfg(target_arch = "wasm32")]
pub mod telemetry;

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub use config::{AppConfig, Environment};
pub use errors::AppError;
