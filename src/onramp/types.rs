//! Provider error definitions and response helpers.

use serde_json::Value;
use thiserror::Error;

/// Message fragment the provider returns when a phone number is already
/// bound to an existing customer.
pub const LINKED_CUSTOMER_MARKER: &str = "already linked to customerId";

/// Errors that can occur while talking to the onramp provider.
#[derive(Debug, Error)]
pub enum OnrampError {
    /// Network or protocol failure before a response was received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status with a JSON error body.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        body: Value,
    },

    /// Non-success status whose body was not JSON.
    #[error("HTTP error! status: {status}")]
    UnexpectedStatus { status: u16 },

    /// Success status but the body was not JSON.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// A header value could not be built (non-ASCII key, etc.).
    #[error("Invalid header value for '{0}'")]
    InvalidHeader(&'static str),

    /// Malformed envelope payload.
    #[error("Envelope error: {0}")]
    Envelope(String),
}

/// Result type for provider operations.
pub type OnrampResult<T> = Result<T, OnrampError>;

impl OnrampError {
    /// Build an error from a non-success status and the raw response text.
    pub fn from_response(status: u16, text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(body) => {
                let message = body
                    .get("error")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP error! status: {}", status));
                OnrampError::Api {
                    status,
                    message,
                    body,
                }
            }
            Err(_) => OnrampError::UnexpectedStatus { status },
        }
    }

    /// HTTP status if the provider answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            OnrampError::Api { status, .. } | OnrampError::UnexpectedStatus { status } => {
                Some(*status)
            }
            OnrampError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The existing customer id, when this is the "already linked" rejection.
    pub fn linked_customer_id(&self) -> Option<&str> {
        match self {
            OnrampError::Api {
                status: 400,
                message,
                body,
            } if message.contains(LINKED_CUSTOMER_MARKER) => body
                .get("customerId")
                .or_else(|| body.get("data").and_then(|d| d.get("customerId")))
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty()),
            _ => None,
        }
    }
}

/// Outcome of an entity-creating call.
///
/// `RetryWithId` is the only case that permits a follow-up call, and the
/// follow-up result is never classified again.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(Value),
    RetryWithId {
        customer_id: String,
        error: OnrampError,
    },
    Failed(OnrampError),
}

impl CreateOutcome {
    pub fn classify(result: OnrampResult<Value>) -> Self {
        match result {
            Ok(value) => CreateOutcome::Created(value),
            Err(error) => {
                let linked = error.linked_customer_id().map(str::to_string);
                match linked {
                    Some(customer_id) => CreateOutcome::RetryWithId { customer_id, error },
                    None => CreateOutcome::Failed(error),
                }
            }
        }
    }
}

/// The `data` member of a provider response, or `Null`.
pub fn response_data(response: &Value) -> &Value {
    static NULL: Value = Value::Null;
    response.get("data").unwrap_or(&NULL)
}

/// Render a JSON scalar the way it would appear in a form field.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
