//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Missing provider credentials are fatal at startup
//! - Validate URLs and bind addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.provider.credentials.api_key.is_empty() {
        errors.push(ValidationError::new("provider.api_key", "API key is required"));
    }
    if config.provider.credentials.api_secret.is_empty() {
        errors.push(ValidationError::new(
            "provider.api_secret",
            "API secret is required",
        ));
    }

    match url::Url::parse(&config.provider.base_url) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
        Ok(u) => errors.push(ValidationError::new(
            "provider.base_url",
            format!("unsupported scheme '{}'", u.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "provider.base_url",
            format!("invalid URL '{}': {}", config.provider.base_url, e),
        )),
    }

    if config.provider.chain.trim().is_empty() {
        errors.push(ValidationError::new("provider.chain", "chain must not be empty"));
    }

    if let Err(e) = url::Url::parse(&config.app.public_url) {
        errors.push(ValidationError::new(
            "app.public_url",
            format!("invalid URL '{}': {}", config.app.public_url, e),
        ));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("invalid socket address '{}'", config.listener.bind_address),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "invalid socket address '{}'",
                config.observability.metrics_address
            ),
        ));
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    // Both admin credentials or neither.
    if config.admin.username.is_empty() != config.admin.password.is_empty() {
        errors.push(ValidationError::new(
            "admin",
            "username and password must be set together",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Credentials;

    fn valid_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.provider.credentials = Credentials::new("key", "secret");
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_credentials_reports_both() {
        let config = GatewayConfig::default();
        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"provider.api_key"));
        assert!(fields.contains(&"provider.api_secret"));
    }

    #[test]
    fn test_bad_base_url() {
        let mut config = valid_config();
        config.provider.base_url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "provider.base_url");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        assert_eq!(config.timeouts.request_secs, None);
        config.timeouts.request_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "timeouts.request_secs");
    }

    #[test]
    fn test_half_configured_admin() {
        let mut config = valid_config();
        config.admin.username = "admin".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "admin");
    }
}
