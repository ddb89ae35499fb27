//! Transaction lookups by customer and transaction id.

use serde::Deserialize;
use serde_json::Value;

use crate::flow::FlowError;
use crate::onramp::OnrampClient;

/// Lookup form / JSON body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionLookup {
    #[serde(alias = "customerId")]
    pub customer_id: String,
    #[serde(alias = "transactionId")]
    pub transaction_id: String,
}

impl TransactionLookup {
    fn validated(&self) -> Result<(&str, &str), FlowError> {
        let customer_id = self.customer_id.trim();
        let transaction_id = self.transaction_id.trim();
        if customer_id.is_empty() || transaction_id.is_empty() {
            return Err(FlowError::Validation(
                "Customer ID and Transaction ID are required".to_string(),
            ));
        }
        Ok((customer_id, transaction_id))
    }
}

/// Fetch an offramp transaction. Returns the full provider response.
pub async fn lookup_offramp(
    client: &OnrampClient,
    lookup: &TransactionLookup,
) -> Result<Value, FlowError> {
    let (customer_id, transaction_id) = lookup.validated()?;
    Ok(client.offramp_transaction(customer_id, transaction_id).await?)
}

/// Fetch an onramp transaction. Returns the full provider response.
pub async fn lookup_onramp(
    client: &OnrampClient,
    lookup: &TransactionLookup,
) -> Result<Value, FlowError> {
    let (customer_id, transaction_id) = lookup.validated()?;
    Ok(client.onramp_transaction(customer_id, transaction_id).await?)
}
