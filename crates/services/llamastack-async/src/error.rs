use thiserror::Error;

use crate::turn::TurnStatus;
use crate::types::events::EventCategory;

/// Errors produced by the client, the event transport, and the turn accumulator.
#[derive(Debug, Error)]
pub enum StackError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Error response returned by the API
    #[error("API error: {0:?}")]
    Api(ApiErrorObject),

    /// Invalid client or request configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Response body could not be deserialized
    #[error("Serialization error: {0}")]
    Serde(String),

    /// The upstream event stream failed or ended mid-turn.
    ///
    /// Accumulator state up to the failure point is left intact so callers
    /// can render a partial response.
    #[error("upstream stream error: {0}")]
    Stream(String),

    /// An event arrived for a turn that is no longer open.
    ///
    /// Events after `turn_complete` (or after `discard`) violate the
    /// delivery contract and are reported rather than silently applied.
    #[error("late {category:?} event for a turn in state {status:?}")]
    LateEvent {
        /// State the turn was in when the event arrived
        status: TurnStatus,
        /// Category of the offending event
        category: EventCategory,
    },

    /// A shield reported a violation and the accumulator is configured to
    /// treat violations as failures ([`ViolationPolicy::Fail`](crate::turn::ViolationPolicy)).
    #[error("shield violation: {0}")]
    ShieldViolation(String),

    /// `finalize` was called a second time on the same turn.
    #[error("turn was already finalized")]
    AlreadyFinalized,

    /// `finalize` was called before the turn reached completion.
    #[error("turn is not complete; cannot finalize")]
    IncompleteTurn,

    /// A spawned background task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

/// Structured error payload returned by the API
#[derive(Debug, Clone)]
pub struct ApiErrorObject {
    /// HTTP status code of the response
    pub status: u16,
    /// Human-readable error message
    pub message: String,
    /// Error type discriminator, when the server provides one
    pub kind: Option<String>,
}

/// Parse an error response body into a structured API error.
///
/// Falls back to the raw body text when the body is not the expected
/// `{"error": {"message": ..., "type": ...}}` shape.
pub(crate) fn deserialize_api_error(status: reqwest::StatusCode, bytes: &[u8]) -> StackError {
    #[derive(serde::Deserialize)]
    struct Body {
        error: Detail,
    }

    #[derive(serde::Deserialize)]
    struct Detail {
        message: String,
        #[serde(rename = "type")]
        kind: Option<String>,
    }

    match serde_json::from_slice::<Body>(bytes) {
        Ok(body) => StackError::Api(ApiErrorObject {
            status: status.as_u16(),
            message: body.error.message,
            kind: body.error.kind,
        }),
        Err(_) => StackError::Api(ApiErrorObject {
            status: status.as_u16(),
            message: String::from_utf8_lossy(bytes).into_owned(),
            kind: None,
        }),
    }
}

/// Map a body deserialization failure, keeping a short preview of the body
/// for diagnostics.
pub(crate) fn map_deser(e: &serde_json::Error, bytes: &[u8]) -> StackError {
    let body = String::from_utf8_lossy(bytes);
    let preview: String = body.chars().take(200).collect();
    StackError::Serde(format!("{e}; body: {preview}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_structured_body() {
        let bytes = br#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#;
        let err = deserialize_api_error(reqwest::StatusCode::NOT_FOUND, bytes);
        match err {
            StackError::Api(obj) => {
                assert_eq!(obj.status, 404);
                assert_eq!(obj.message, "model not found");
                assert_eq!(obj.kind.as_deref(), Some("invalid_request_error"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn api_error_unstructured_body() {
        let err = deserialize_api_error(reqwest::StatusCode::BAD_GATEWAY, b"upstream exploded");
        match err {
            StackError::Api(obj) => {
                assert_eq!(obj.status, 502);
                assert_eq!(obj.message, "upstream exploded");
                assert!(obj.kind.is_none());
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
