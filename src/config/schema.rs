//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.onramp.money";

/// Default settlement chain.
pub const DEFAULT_CHAIN: &str = "trc20";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Onramp provider connection and credentials.
    pub provider: ProviderConfig,

    /// Public-facing application settings.
    pub app: AppConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// API credentials issued by the provider.
///
/// Loaded once at startup and read-only afterwards. `Debug` never prints
/// the values.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Both halves present.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Onramp provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider base URL, without trailing slash.
    pub base_url: String,

    /// API key and shared secret.
    #[serde(flatten)]
    pub credentials: Credentials,

    /// Default settlement chain when the form does not pick one.
    pub chain: String,

    /// Wallet address that receives purchased crypto.
    pub receive_address: Option<String>,

    /// Outbound request timeout. `None` keeps the transport default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::default(),
            chain: DEFAULT_CHAIN.to_string(),
            receive_address: None,
            request_timeout_secs: None,
        }
    }
}

/// Public-facing application settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Public URL the provider redirects back to after KYC.
    pub public_url: String,

    /// How long an invoice session survives between the two steps.
    pub session_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_url: "http://localhost:3000".to_string(),
            session_ttl_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Where the KYC widget sends the customer once verification is done.
    pub fn kyc_redirect_url(&self) -> String {
        format!("{}/invoice/continue", self.public_url.trim_end_matches('/'))
    }
}

/// Timeout configuration for inbound requests.
///
/// Applies to the health and admin routes only. The invoice routes wrap
/// entity-creating provider calls and always run to completion.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds. `None` disables it.
    pub request_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the pretty format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin surface configuration.
///
/// The admin routes and the offramp lookup page are only mounted when both
/// username and password are set.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Basic-auth username.
    pub username: String,

    /// Basic-auth password.
    pub password: String,
}

impl AdminConfig {
    pub fn enabled(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
    /// Mark session cookies `Secure`.
    pub secure_cookies: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
            secure_cookies: true,
        }
    }
}
