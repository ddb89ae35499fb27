//! Per-customer state carried between the invoice steps.
//!
//! The first step stores the form values and the provider customer id; the
//! continue step (reached via the provider's KYC redirect) reads them back.
//! Only an opaque id travels in the cookie.

pub mod cookie;
pub mod store;

pub use cookie::{session_cookie, session_id_from_headers, SESSION_COOKIE};
pub use store::{MemorySessionStore, SessionStore};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Amount used when the form leaves it blank.
pub const DEFAULT_AMOUNT: &str = "100";
pub const DEFAULT_FIAT_CURRENCY: &str = "INR";
pub const DEFAULT_CRYPTO_CURRENCY: &str = "usdt";

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Values collected on the invoice form plus the provider's customer id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub customer_id: String,
    pub phone: String,
    pub email: String,
    pub amount: String,
    pub fiat_currency: String,
    pub crypto_currency: String,
    pub description: String,
    pub chain: String,
}

impl Session {
    /// Fill blanks with defaults; `chain` falls back to `default_chain`.
    pub fn with_defaults(mut self, default_chain: &str) -> Self {
        fill(&mut self.amount, DEFAULT_AMOUNT);
        fill(&mut self.fiat_currency, DEFAULT_FIAT_CURRENCY);
        fill(&mut self.crypto_currency, DEFAULT_CRYPTO_CURRENCY);
        fill(&mut self.chain, default_chain);
        self
    }
}

fn fill(field: &mut String, default: &str) {
    if field.trim().is_empty() {
        *field = default.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults_fills_blanks_only() {
        let session = Session {
            customer_id: "c1".into(),
            phone: "+1".into(),
            fiat_currency: "EUR".into(),
            amount: "  ".into(),
            ..Session::default()
        }
        .with_defaults("trc20");

        assert_eq!(session.amount, "100");
        assert_eq!(session.fiat_currency, "EUR");
        assert_eq!(session.crypto_currency, "usdt");
        assert_eq!(session.chain, "trc20");
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_eq!(SessionId::parse("nope"), None);
    }
}
