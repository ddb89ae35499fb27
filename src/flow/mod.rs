//! Invoice and lookup flows.
//!
//! # Data Flow
//! ```text
//! POST /invoice/new
//!     → invoice.rs (validate, create KYC URL, link-existing retry)
//!     → session store, redirect to provider KYC
//!
//! GET /invoice/continue (provider redirect)
//!     → checkout.rs (KYC status → payment method → quote → transaction)
//!
//! Offramp / onramp lookups
//!     → lookup.rs
//! ```
//!
//! Each step awaits the previous one. A failed step ends the chain and is
//! reported back to the caller as data.

pub mod checkout;
pub mod invoice;
pub mod lookup;
pub mod payment_methods;

pub use checkout::{continue_invoice, InvoiceSummary};
pub use invoice::{create_invoice, InvoiceForm, InvoiceStarted};
pub use lookup::{lookup_offramp, lookup_onramp, TransactionLookup};

use serde_json::Value;
use thiserror::Error;

use crate::onramp::OnrampError;

/// Errors surfaced to the user by a flow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Missing or malformed user input; no outbound call was made.
    #[error("{0}")]
    Validation(String),

    /// The provider accepted the customer but returned no KYC URL.
    #[error("Unable to get KYC URL from Onramp. Please try again.")]
    MissingKycUrl,

    /// Receive address does not belong to the selected chain.
    #[error("{0}")]
    AddressMismatch(String),

    #[error(transparent)]
    Provider(#[from] OnrampError),
}

impl FlowError {
    /// Message suitable for the rendered page.
    ///
    /// Provider errors prefer the `error` field of the response body.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Provider(OnrampError::Api { body, message, .. }) => body
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(message)
                .to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the caller's input was at fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, FlowError::Validation(_))
    }
}
