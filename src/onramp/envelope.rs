//! Request envelope encoding and the signed request it produces.
//!
//! The provider recomputes the signature from the `payload` header, so the
//! encoding must be byte-for-byte stable: compact JSON, `body` before
//! `timestamp`, standard padded base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Credentials;
use crate::onramp::signer::sign;
use crate::onramp::types::{OnrampError, OnrampResult};

// HeaderName requires lowercase; the provider matches names case-insensitively.
pub const HEADER_API_KEY: &str = "apikey";
pub const HEADER_TIMESTAMP: &str = "timestamp";
pub const HEADER_PAYLOAD: &str = "payload";
pub const HEADER_SIGNATURE: &str = "signature";

/// The `{body, timestamp}` structure that gets encoded and signed.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub body: Value,
    pub timestamp: String,
}

/// Encode `body` and `timestamp` as base64 of `{"body":…,"timestamp":"…"}`.
pub fn encode(body: &Value, timestamp: &str) -> String {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        body: &'a Value,
        timestamp: &'a str,
    }

    // Serializing a Value with string keys cannot fail.
    let json = serde_json::to_vec(&Borrowed { body, timestamp }).unwrap_or_default();
    STANDARD.encode(json)
}

/// Reverse of [`encode`].
pub fn decode(payload: &str) -> OnrampResult<RequestEnvelope> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| OnrampError::Envelope(format!("invalid base64: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| OnrampError::Envelope(format!("invalid envelope JSON: {}", e)))
}

/// Milliseconds since the Unix epoch, as decimal ASCII.
pub fn timestamp_now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .to_string()
}

/// An authenticated request ready to send.
///
/// `payload` and `signature` are computed together in [`SignedRequest::new`]
/// and cannot be set separately.
#[derive(Clone)]
pub struct SignedRequest {
    url: String,
    api_key: String,
    timestamp: String,
    payload: String,
    signature: String,
    body: Value,
}

impl SignedRequest {
    /// Build a request signed with a fresh timestamp.
    pub fn new(url: impl Into<String>, body: Value, credentials: &Credentials) -> Self {
        Self::with_timestamp(url, body, credentials, timestamp_now())
    }

    /// Build a request signed at a caller-chosen timestamp.
    pub fn with_timestamp(
        url: impl Into<String>,
        body: Value,
        credentials: &Credentials,
        timestamp: String,
    ) -> Self {
        let payload = encode(&body, &timestamp);
        let signature = sign(payload.as_bytes(), &credentials.api_secret);
        Self {
            url: url.into(),
            api_key: credentials.api_key.clone(),
            timestamp,
            payload,
            signature,
            body,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The unencoded body, sent verbatim as the HTTP body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Authentication and content negotiation headers.
    pub fn headers(&self) -> OnrampResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_API_KEY, header_value(HEADER_API_KEY, &self.api_key)?);
        headers.insert(HEADER_TIMESTAMP, header_value(HEADER_TIMESTAMP, &self.timestamp)?);
        headers.insert(HEADER_PAYLOAD, header_value(HEADER_PAYLOAD, &self.payload)?);
        headers.insert(HEADER_SIGNATURE, header_value(HEADER_SIGNATURE, &self.signature)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl std::fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedRequest")
            .field("url", &self.url)
            .field("timestamp", &self.timestamp)
            .field("payload_len", &self.payload.len())
            .finish_non_exhaustive()
    }
}

fn header_value(name: &'static str, value: &str) -> OnrampResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| OnrampError::InvalidHeader(name))
}
