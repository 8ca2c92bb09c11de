pub mod health;
pub use self::health::health;

pub mod identity;
pub use self::identity::{approve, authorize, logout, token};

pub mod students;
pub use self::students::{create_student, delete_student, list_students, update_student};

// common functions for the handlers
use axum::http::{HeaderMap, header::AUTHORIZATION};

/// Bearer token from the `Authorization` header, if any.
pub fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
