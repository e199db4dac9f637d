//! HTTP error classification and user-facing messages
//!
//! Maps a failed response onto the fixed set of notification texts shown to
//! the user. The mapping depends only on the status code and the message the
//! server put in the body.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Shown when the error body is empty or JSON `null`
pub const GENERIC_ERROR_MESSAGE: &str = "internal system error, contact administrator";
/// Notification for 404 responses
pub const NOT_FOUND_MESSAGE: &str = "very sorry, resource not found";
/// Notification for 403 responses
pub const FORBIDDEN_MESSAGE: &str = "very sorry, you have no permission for this operation";
/// Notification for 401 responses
pub const UNAUTHORIZED_MESSAGE: &str = "very sorry, authentication expired, please log in again";
/// Notification substituted for the refresh-token sentinel
pub const SESSION_EXPIRED_MESSAGE: &str = "login expired, please log in again";
/// Message the server sends when the refresh token is no longer valid
pub const REFRESH_TOKEN_INVALID: &str = "refresh token无效";

/// Classification of a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClassification {
    /// 404
    NotFound,
    /// 403
    Forbidden,
    /// 401
    Unauthorized,
    /// Any other status carrying the refresh-token sentinel
    SessionExpired,
    /// Any other status; the server's message is shown verbatim
    ServerMessage,
    /// No response reached the client
    Network,
}

impl ErrorClassification {
    /// Classify a structured response by status and extracted message
    pub fn classify(status: u16, message: &str) -> Self {
        match status {
            404 => ErrorClassification::NotFound,
            403 => ErrorClassification::Forbidden,
            401 => ErrorClassification::Unauthorized,
            _ if message == REFRESH_TOKEN_INVALID => ErrorClassification::SessionExpired,
            _ => ErrorClassification::ServerMessage,
        }
    }

    /// Text to notify for this classification, `None` when nothing is shown
    pub fn notification(&self, message: &str) -> Option<String> {
        match self {
            ErrorClassification::NotFound => Some(NOT_FOUND_MESSAGE.to_string()),
            ErrorClassification::Forbidden => Some(FORBIDDEN_MESSAGE.to_string()),
            ErrorClassification::Unauthorized => Some(UNAUTHORIZED_MESSAGE.to_string()),
            ErrorClassification::SessionExpired => Some(SESSION_EXPIRED_MESSAGE.to_string()),
            ErrorClassification::ServerMessage => Some(message.to_string()),
            ErrorClassification::Network => None,
        }
    }
}

/// Normalized representation of a failed call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpError {
    /// HTTP status code if a response was received
    pub status_code: Option<u16>,
    /// Classification driving the notification
    pub classification: ErrorClassification,
    /// Display message extracted from the body
    pub message: String,
    /// Parsed JSON body, if any
    pub details: Option<Value>,
}

impl HttpError {
    /// Build from a status and the raw body text
    pub fn from_parts(status: StatusCode, body: &str) -> Self {
        let details = serde_json::from_str::<Value>(body).ok();
        let message = Self::extract_message(&details, body);
        let classification = ErrorClassification::classify(status.as_u16(), &message);

        Self {
            status_code: Some(status.as_u16()),
            classification,
            message,
            details: details.filter(|v| !v.is_null()),
        }
    }

    /// Create from a reqwest Response that carried a failure status
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_parts(status, &body)
    }

    /// Create from a request that never produced a response
    pub fn from_request_error(error: &reqwest::Error) -> Self {
        Self {
            status_code: None,
            classification: ErrorClassification::Network,
            message: error.to_string(),
            details: None,
        }
    }

    /// Pick the display message out of an error body
    ///
    /// Empty or `null` bodies yield [`GENERIC_ERROR_MESSAGE`]. JSON objects
    /// yield their `message` field, then the envelope's `msg` field. Bodies
    /// that are not JSON are shown as text.
    fn extract_message(details: &Option<Value>, body: &str) -> String {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return GENERIC_ERROR_MESSAGE.to_string();
        }

        match details {
            Some(Value::Null) => GENERIC_ERROR_MESSAGE.to_string(),
            Some(Value::Object(map)) => ["message", "msg"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => trimmed.to_string(),
        }
    }

    /// Notification text for this failure, `None` for transport failures
    pub fn notification_text(&self) -> Option<String> {
        self.classification.notification(&self.message)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP Error [{}]: {} (classification: {:?})",
            self.status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            self.message,
            self.classification
        )
    }
}

impl std::error::Error for HttpError {}
