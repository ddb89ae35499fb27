//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable names.
pub const ENV_BASE_URL: &str = "ONRAMP_BASE_URL";
pub const ENV_API_KEY: &str = "ONRAMP_API_KEY";
pub const ENV_SECRET_KEY: &str = "ONRAMP_SECRET_KEY";
pub const ENV_API_SECRET: &str = "ONRAMP_API_SECRET";
pub const ENV_CHAIN: &str = "ONRAMP_CHAIN";
pub const ENV_RECEIVE_ADDRESS: &str = "ONRAMP_RECEIVE_ADDRESS";
pub const ENV_BIND_ADDRESS: &str = "ONRAMP_BIND_ADDRESS";
pub const ENV_PUBLIC_URL: &str = "APP_PUBLIC_URL";
pub const ENV_ADMIN_USERNAME: &str = "BASIC_AUTH_USERNAME";
pub const ENV_ADMIN_PASSWORD: &str = "BASIC_AUTH_PASSWORD";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: optional TOML file, then environment overrides,
/// then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => GatewayConfig::default(),
    };

    apply_env(&mut config, |name| std::env::var(name).ok());
    normalize(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values on top of `config`.
///
/// Empty values are treated as unset. The secret is read from
/// `ONRAMP_SECRET_KEY`, falling back to `ONRAMP_API_SECRET`.
pub fn apply_env<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = get(ENV_BASE_URL) {
        config.provider.base_url = v;
    }
    if let Some(v) = get(ENV_API_KEY) {
        config.provider.credentials.api_key = v;
    }
    if let Some(v) = get(ENV_SECRET_KEY).or_else(|| get(ENV_API_SECRET)) {
        config.provider.credentials.api_secret = v;
    }
    if let Some(v) = get(ENV_CHAIN) {
        config.provider.chain = v;
    }
    if let Some(v) = get(ENV_RECEIVE_ADDRESS) {
        config.provider.receive_address = Some(v);
    }
    if let Some(v) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = v;
    }
    if let Some(v) = get(ENV_PUBLIC_URL) {
        config.app.public_url = v;
    }
    if let Some(v) = get(ENV_ADMIN_USERNAME) {
        config.admin.username = v;
    }
    if let Some(v) = get(ENV_ADMIN_PASSWORD) {
        config.admin.password = v;
    }
}

fn normalize(config: &mut GatewayConfig) {
    let trimmed = config.provider.base_url.trim_end_matches('/').len();
    config.provider.base_url.truncate(trimmed);
    if config
        .provider
        .receive_address
        .as_deref()
        .is_some_and(str::is_empty)
    {
        config.provider.receive_address = None;
    }
}
