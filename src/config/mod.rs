//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (ONRAMP_*, APP_PUBLIC_URL, BASIC_AUTH_*)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; credentials never change at runtime
//! - All fields have defaults to allow minimal configs
//! - Missing provider credentials fail startup, never a single request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AdminConfig, AppConfig, Credentials, GatewayConfig, ProviderConfig};
