//! Onramp payment gateway library.

pub mod admin;
pub mod config;
pub mod flow;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod onramp;
pub mod session;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use onramp::{OnrampClient, OnrampError};
