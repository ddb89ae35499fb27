//! Onramp provider HTTP client.
//!
//! # Responsibilities
//! - Sign and send authenticated calls to the white-label endpoints
//! - Best-effort lookups against the public endpoint
//! - Map non-success responses to typed errors
//!
//! Authenticated calls send the envelope in headers and the original body
//! as the HTTP body. The provider verifies both; do not drop either.

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Credentials, ProviderConfig};
use crate::observability::metrics;
use crate::onramp::envelope::SignedRequest;
use crate::onramp::types::{response_data, OnrampError, OnrampResult};

/// Path prefix shared by every provider endpoint.
pub const API_PREFIX: &str = "onramp/api/v2";

pub const PATH_PAYMENT_METHOD_TYPES: &str = "common/public/fetchPaymentMethodType";
pub const PATH_KYC_URL: &str = "whiteLabel/kyc/url";
pub const PATH_KYC_STATUS: &str = "whiteLabel/kyc/status";
pub const PATH_ONRAMP_QUOTE: &str = "whiteLabel/onramp/quote";
pub const PATH_ONRAMP_CREATE_TRANSACTION: &str = "whiteLabel/onramp/createTransaction";
pub const PATH_ONRAMP_TRANSACTION: &str = "whiteLabel/onramp/transaction";
pub const PATH_OFFRAMP_TRANSACTION: &str = "whiteLabel/offramp/transaction";

/// Client for the onramp provider API.
#[derive(Clone)]
pub struct OnrampClient {
    http: Client,
    base_url: String,
    credentials: Arc<Credentials>,
    receive_address: Option<String>,
}

impl OnrampClient {
    /// Create a client from provider configuration.
    pub fn new(config: &ProviderConfig) -> OnrampResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        tracing::info!(
            base_url = %config.base_url,
            api_key_present = !config.credentials.api_key.is_empty(),
            api_secret_present = !config.credentials.api_secret.is_empty(),
            "Onramp client initialized"
        );
        if !config.credentials.is_complete() {
            tracing::warn!("Onramp credentials incomplete; authenticated calls will be rejected");
        }

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: Arc::new(config.credentials.clone()),
            receive_address: config.receive_address.clone(),
        })
    }

    /// Full URL for an endpoint path relative to [`API_PREFIX`].
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    /// Build the signed request for `path` without sending it.
    pub fn sign_request(&self, path: &str, body: Value) -> SignedRequest {
        SignedRequest::new(self.endpoint_url(path), body, &self.credentials)
    }

    /// POST an authenticated request and return the parsed JSON response.
    pub async fn call_authenticated(&self, path: &str, body: &Value) -> OnrampResult<Value> {
        let start = Instant::now();
        let request = self.sign_request(path, body.clone());

        tracing::debug!(
            url = %request.url(),
            timestamp = %request.timestamp(),
            payload_len = request.payload().len(),
            "Sending authenticated onramp request"
        );

        let sent = self
            .http
            .post(request.url())
            .headers(request.headers()?)
            .json(request.body())
            .send()
            .await;

        let response = match sent {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Onramp request failed");
                metrics::record_provider_request(path, 0, start);
                return Err(OnrampError::Transport(e));
            }
        };

        let status = response.status();
        metrics::record_provider_request(path, status.as_u16(), start);
        let text = response.text().await?;

        if !status.is_success() {
            let error = OnrampError::from_response(status.as_u16(), &text);
            tracing::warn!(
                path = %path,
                status = status.as_u16(),
                error = %error,
                "Onramp request rejected"
            );
            return Err(error);
        }

        serde_json::from_str(&text).map_err(|e| OnrampError::Decode(e.to_string()))
    }

    /// GET an unauthenticated endpoint.
    ///
    /// Any failure yields an empty object; callers fall back to static data.
    pub async fn call_public(&self, path: &str) -> Value {
        let start = Instant::now();
        let url = self.endpoint_url(path);

        let sent = self
            .http
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await;

        let response = match sent {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Public onramp lookup failed");
                metrics::record_provider_request(path, 0, start);
                return empty();
            }
        };

        let status = response.status();
        metrics::record_provider_request(path, status.as_u16(), start);
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Public onramp lookup rejected");
            return empty();
        }

        match response.json::<Value>().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Public onramp lookup returned invalid JSON");
                empty()
            }
        }
    }

    /// Create a customer (or reuse one) and get a hosted KYC URL.
    pub async fn create_kyc_url(&self, body: &Value) -> OnrampResult<Value> {
        self.call_authenticated(PATH_KYC_URL, body).await
    }

    pub async fn kyc_status(&self, customer_id: &str) -> OnrampResult<Value> {
        self.call_authenticated(PATH_KYC_STATUS, &json!({ "customerId": customer_id }))
            .await
    }

    /// Fiat to crypto quote.
    pub async fn create_onramp_quote(&self, body: &Value) -> OnrampResult<Value> {
        self.call_authenticated(PATH_ONRAMP_QUOTE, body).await
    }

    pub async fn create_onramp_transaction(&self, body: &Value) -> OnrampResult<Value> {
        self.call_authenticated(PATH_ONRAMP_CREATE_TRANSACTION, body)
            .await
    }

    pub async fn onramp_transaction(
        &self,
        customer_id: &str,
        transaction_id: &str,
    ) -> OnrampResult<Value> {
        self.call_authenticated(
            PATH_ONRAMP_TRANSACTION,
            &json!({ "customerId": customer_id, "transactionId": transaction_id }),
        )
        .await
    }

    pub async fn offramp_transaction(
        &self,
        customer_id: &str,
        transaction_id: &str,
    ) -> OnrampResult<Value> {
        self.call_authenticated(
            PATH_OFFRAMP_TRANSACTION,
            &json!({ "customerId": customer_id, "transactionId": transaction_id }),
        )
        .await
    }

    /// Supported payment methods keyed by fiat type id.
    ///
    /// Returns the response's `data` object, or `{}`.
    pub async fn payment_method_types(&self) -> Value {
        let response = self.call_public(PATH_PAYMENT_METHOD_TYPES).await;
        payment_methods_from(&response)
    }

    /// Set `toAddress` to the override or configured receive address, unless
    /// the payload already carries one.
    pub fn with_receive_address(&self, mut payload: Value, override_address: Option<&str>) -> Value {
        let address = override_address
            .filter(|a| !a.is_empty())
            .or(self.receive_address.as_deref());
        if let (Some(address), Some(map)) = (address, payload.as_object_mut()) {
            let present = map
                .get("toAddress")
                .is_some_and(|v| !v.is_null() && v.as_str() != Some(""));
            if !present {
                map.insert("toAddress".to_string(), Value::String(address.to_string()));
            }
        }
        payload
    }

    pub fn receive_address(&self) -> Option<&str> {
        self.receive_address.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for OnrampClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnrampClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}

/// The lookup's `data` object, or `{}` for anything else.
fn payment_methods_from(response: &Value) -> Value {
    match response_data(response) {
        data @ Value::Object(_) => data.clone(),
        _ => empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(receive_address: Option<&str>) -> OnrampClient {
        let config = ProviderConfig {
            base_url: "https://api.example.com/".to_string(),
            credentials: Credentials::new("key", "secret"),
            receive_address: receive_address.map(str::to_string),
            ..ProviderConfig::default()
        };
        OnrampClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_url() {
        let client = test_client(None);
        assert_eq!(
            client.endpoint_url(PATH_KYC_URL),
            "https://api.example.com/onramp/api/v2/whiteLabel/kyc/url"
        );
        assert_eq!(
            client.endpoint_url("/whiteLabel/kyc/status"),
            "https://api.example.com/onramp/api/v2/whiteLabel/kyc/status"
        );
    }

    #[test]
    fn test_with_receive_address_fills_missing() {
        let client = test_client(Some("TConfigured"));
        let out = client.with_receive_address(json!({"chain": "trc20"}), None);
        assert_eq!(out["toAddress"], "TConfigured");

        let out = client.with_receive_address(json!({}), Some("TOverride"));
        assert_eq!(out["toAddress"], "TOverride");
    }

    #[test]
    fn test_with_receive_address_keeps_existing() {
        let client = test_client(Some("TConfigured"));
        let out = client.with_receive_address(json!({"toAddress": "TMine"}), Some("TOverride"));
        assert_eq!(out["toAddress"], "TMine");
    }

    #[test]
    fn test_with_receive_address_without_any_address() {
        let client = test_client(None);
        let out = client.with_receive_address(json!({"chain": "trc20"}), None);
        assert!(out.get("toAddress").is_none());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = ProviderConfig {
            credentials: Credentials::new("k-PLAINTEXT", "s-PLAINTEXT"),
            ..ProviderConfig::default()
        };
        let debug = format!("{:?}", OnrampClient::new(&config).unwrap());
        assert!(!debug.contains("k-PLAINTEXT"));
        assert!(!debug.contains("s-PLAINTEXT"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_payment_methods_need_object_data() {
        let methods = json!({"1": {"UPI": 1}});
        assert_eq!(payment_methods_from(&json!({"data": methods})), methods);
        for data in [json!(false), json!(""), json!(0), json!(null), json!([1])] {
            assert_eq!(payment_methods_from(&json!({"data": data})), json!({}));
        }
        assert_eq!(payment_methods_from(&json!({"status": 1})), json!({}));
    }
}
