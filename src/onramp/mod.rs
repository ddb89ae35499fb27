//! Onramp provider integration.
//!
//! # Data Flow
//! ```text
//! Credentials (environment / config file)
//!     → envelope.rs (base64 of {body, timestamp})
//!     → signer.rs (HMAC-SHA512 of the payload, hex)
//!     → client.rs (headers + original body, POST)
//!     → types.rs (typed errors, single-retry classification)
//! ```
//!
//! # Security Constraints
//! - The API secret is never logged; only presence is reported
//! - Timestamps are regenerated for every request
//! - Signature and payload are derived together, never set separately

pub mod client;
pub mod envelope;
pub mod signer;
pub mod types;

pub use client::OnrampClient;
pub use envelope::{RequestEnvelope, SignedRequest};
pub use signer::sign;
pub use types::{CreateOutcome, OnrampError, OnrampResult};
