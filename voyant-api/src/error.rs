use reqwest::StatusCode;
use serde_json::Value;
use voyant_core::CoreError;

pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's `detail` or a status fallback.
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// A 401 survived the refresh-and-retry. The session is already cleared.
    #[error("Session expired")]
    SessionExpired { redirect: &'static str },
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn session_expired() -> Self {
        ApiError::SessionExpired {
            redirect: LOGIN_ROUTE,
        }
    }

    /// Builds the error for a failed response from its status and (possibly empty) body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| server_message(&json))
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        ApiError::Http {
            status: status.as_u16(),
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

fn server_message(json: &Value) -> Option<String> {
    ["detail", "message", "error"]
        .iter()
        .filter_map(|key| json.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { message, .. } => CoreError::Rejected(message),
            ApiError::Network(msg) => CoreError::Unavailable(msg),
            ApiError::Decode(msg) => CoreError::InternalError(msg),
            ApiError::SessionExpired { .. } => CoreError::SessionExpired,
            ApiError::Validation(msg) => CoreError::ValidationError(msg),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => ApiError::Validation(msg),
            CoreError::SessionExpired => ApiError::session_expired(),
            other => ApiError::Validation(other.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message_wins() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"detail": "Room sold out"}"#);
        assert_eq!(err.to_string(), "Room sold out");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_status_fallback() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "HTTP error! status: 500");

        let err = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"email": ["required"]}"#);
        assert_eq!(err.to_string(), "HTTP error! status: 400");
    }

    #[test]
    fn test_core_mapping() {
        let core: CoreError = ApiError::session_expired().into();
        assert_eq!(core, CoreError::SessionExpired);

        let core: CoreError = ApiError::from_response(StatusCode::CONFLICT, r#"{"detail": "Taken"}"#).into();
        assert_eq!(core, CoreError::Rejected("Taken".to_string()));
    }
}
