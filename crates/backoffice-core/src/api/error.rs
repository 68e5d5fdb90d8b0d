use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized{}", detail(.0))]
    Unauthorized(Option<String>),

    #[error("Access denied{}", detail(.0))]
    AccessDenied(Option<String>),

    #[error("Resource not found{}", detail(.0))]
    NotFound(Option<String>),

    #[error("Server error ({status}){}", detail(.message))]
    Server { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Validation(String),
}

/// Maximum length for raw response bodies kept in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error payload the API sends alongside 4xx/5xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    /// Pull the `message` field out of a JSON error body, if there is one.
    fn server_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::server_message(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            code if message.is_some() => ApiError::Server { status: code, message },
            code if body.trim().is_empty() => ApiError::Server { status: code, message: None },
            code => ApiError::InvalidResponse(format!(
                "Status {}: {}",
                code,
                Self::truncate_body(body)
            )),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Text for an error banner: the server's own message when it sent one,
    /// otherwise the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Validation(m) => m.clone(),
            ApiError::Unauthorized(Some(m))
            | ApiError::AccessDenied(Some(m))
            | ApiError::NotFound(Some(m))
            | ApiError::Server { message: Some(m), .. } => m.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_extracts_server_message() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Title is required"}"#,
        );
        assert!(matches!(err, ApiError::Server { status: 400, .. }));
        assert_eq!(err.user_message("Failed to save service"), "Title is required");
    }

    #[test]
    fn test_from_status_maps_auth_codes() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, r#"{"message":"Not authorized as an admin"}"#),
            ApiError::AccessDenied(Some(_))
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "{}"),
            ApiError::NotFound(None)
        ));
    }

    #[test]
    fn test_user_message_falls_back_without_server_message() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert_eq!(err.user_message("Failed to fetch services"), "Failed to fetch services");

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.user_message("Failed to fetch services"), "Failed to fetch services");
    }

    #[test]
    fn test_unauthorized_without_message_uses_fallback() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.user_message("Login failed"), "Login failed");
        assert_eq!(err.to_string(), "Unauthorized");

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message":"Invalid email or password"}"#);
        assert_eq!(err.user_message("Login failed"), "Invalid email or password");
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated"));
        assert!(truncated.contains(&format!("{} total bytes", long.len())));
    }
}
