use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
    Storage(String),
    /// A backend call was attempted while no identity is bound.
    Unauthenticated,
    /// The transport a call started on was replaced before the call settled.
    StaleTransport,
}

impl AppError {
    /// True for `404` responses from the backend.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Http { status: 404, .. })
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
            AppError::Storage(message) => write!(formatter, "Storage error: {message}"),
            AppError::Unauthenticated => write!(formatter, "Not signed in."),
            AppError::StaleTransport => {
                write!(formatter, "The session changed before the request finished.")
            }
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn http_errors_render_status_and_message() {
        let err = AppError::Http {
            status: 404,
            message: "student not found".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed (404): student not found");
        assert!(err.is_not_found());
        assert!(!AppError::Unauthenticated.is_not_found());
    }
}
