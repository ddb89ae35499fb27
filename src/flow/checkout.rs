//! Second invoice step, run when the provider redirects back after KYC.

use serde::Serialize;
use serde_json::{json, Value};

use crate::flow::payment_methods::{self, MethodSource};
use crate::flow::FlowError;
use crate::observability::metrics;
use crate::onramp::types::{response_data, value_to_string};
use crate::onramp::OnrampClient;
use crate::session::Session;

/// Chains that settle to EVM-style addresses.
pub const EVM_CHAINS: &[&str] = &["matic20", "bep20", "erc20", "arbitrum", "optimism"];

/// Tron chain identifier.
pub const TRON_CHAIN: &str = "trc20";

/// Everything the continue page shows.
///
/// Steps that completed before a failure keep their results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceSummary {
    pub customer_id: String,
    pub phone: String,
    pub email: String,
    pub amount: String,
    pub fiat_currency: String,
    pub crypto_currency: String,
    pub chain: String,
    pub kyc_status: Option<String>,
    pub payment_method: Option<String>,
    pub to_amount: Option<String>,
    pub rate: Option<String>,
    pub transaction_id: Option<String>,
    pub transaction: Option<Value>,
    pub error: Option<String>,
}

impl InvoiceSummary {
    fn from_session(session: &Session) -> Self {
        Self {
            customer_id: session.customer_id.clone(),
            phone: session.phone.clone(),
            email: session.email.clone(),
            amount: session.amount.clone(),
            fiat_currency: session.fiat_currency.to_uppercase(),
            crypto_currency: session.crypto_currency.to_lowercase(),
            chain: session.chain.clone(),
            ..Self::default()
        }
    }

    /// KYC completed successfully.
    pub fn kyc_approved(&self) -> bool {
        self.kyc_status.as_deref() == Some("SUCCESS")
    }
}

/// Run KYC status, payment method, quote and transaction creation.
///
/// Never fails: the first error ends the chain and lands in
/// [`InvoiceSummary::error`].
pub async fn continue_invoice(client: &OnrampClient, session: &Session) -> InvoiceSummary {
    let mut summary = InvoiceSummary::from_session(session);

    match advance(client, &mut summary).await {
        Ok(()) => metrics::record_flow_outcome("continue", "ok"),
        Err(e) => {
            tracing::error!(customer_id = %summary.customer_id, error = %e, "Invoice flow failed");
            metrics::record_flow_outcome("continue", "error");
            summary.error = Some(e.user_message());
        }
    }

    summary
}

async fn advance(client: &OnrampClient, summary: &mut InvoiceSummary) -> Result<(), FlowError> {
    let kyc = client.kyc_status(&summary.customer_id).await?;
    summary.kyc_status = response_data(&kyc)
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string);
    tracing::info!(customer_id = %summary.customer_id, kyc_status = ?summary.kyc_status, "KYC status fetched");

    let methods = client.payment_method_types().await;
    let (method, source) = payment_methods::resolve(&methods, &summary.fiat_currency);
    tracing::info!(
        fiat = %summary.fiat_currency,
        method = %method,
        dynamic = source == MethodSource::Lookup,
        "Payment method resolved"
    );
    summary.payment_method = Some(method.clone());

    let quote_payload = json!({
        "fromCurrency": summary.fiat_currency,
        "toCurrency": summary.crypto_currency,
        "fromAmount": summary.amount,
        "chain": summary.chain,
        "paymentMethodType": method,
    });
    let quote_response = client.create_onramp_quote(&quote_payload).await?;
    let quote = response_data(&quote_response);
    let to_amount = value_to_string(&quote["toAmount"]);
    let rate = value_to_string(&quote["rate"]);
    tracing::info!(to_amount = %to_amount, rate = %rate, "Quote created");
    summary.to_amount = Some(to_amount.clone());
    summary.rate = Some(rate.clone());

    let receive_address = client.receive_address();
    check_receive_address(&summary.chain, receive_address)?;

    let mut tx_payload = quote_payload;
    if let Some(map) = tx_payload.as_object_mut() {
        map.insert("customerId".into(), json!(summary.customer_id));
        map.insert("toAmount".into(), json!(to_amount));
        map.insert("rate".into(), json!(rate));
        if let Some(address) = receive_address {
            // Both fields are accepted by the provider; send both.
            map.insert("depositAddress".into(), json!(address));
        }
    }
    let tx_payload = client.with_receive_address(tx_payload, None);

    let tx_response = client.create_onramp_transaction(&tx_payload).await?;
    let transaction = response_data(&tx_response).clone();
    let transaction_id = value_to_string(&transaction["transactionId"]);
    tracing::info!(transaction_id = %transaction_id, "Transaction created");
    summary.transaction_id = Some(transaction_id).filter(|id| !id.is_empty());
    summary.transaction = Some(transaction);

    Ok(())
}

/// Reject a receive address that cannot settle on `chain`.
pub fn check_receive_address(chain: &str, address: Option<&str>) -> Result<(), FlowError> {
    let address = address.unwrap_or_default();
    let is_tron_address = address.starts_with('T');

    if EVM_CHAINS.contains(&chain) && is_tron_address {
        return Err(FlowError::AddressMismatch(format!(
            "Address Mismatch: You are using a Tron address ({}) but the network is set to {}. \
             Please update your configuration or select TRC20.",
            address, chain
        )));
    }
    if chain == TRON_CHAIN && !is_tron_address {
        return Err(FlowError::AddressMismatch(
            "Address Mismatch: You are using a non-Tron address but the network is set to TRC20."
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tron_address_on_evm_chain() {
        let err = check_receive_address("matic20", Some("TXyz")).unwrap_err();
        assert!(err.user_message().contains("Tron address (TXyz)"));
        assert!(err.user_message().contains("matic20"));
    }

    #[test]
    fn test_evm_address_on_tron_chain() {
        let err = check_receive_address("trc20", Some("0xabc")).unwrap_err();
        assert!(matches!(err, FlowError::AddressMismatch(_)));
    }

    #[test]
    fn test_missing_address_on_tron_chain() {
        assert!(check_receive_address("trc20", None).is_err());
    }

    #[test]
    fn test_compatible_addresses() {
        assert!(check_receive_address("trc20", Some("TXyz")).is_ok());
        assert!(check_receive_address("bep20", Some("0xabc")).is_ok());
        assert!(check_receive_address("solana", Some("So1anaAddr")).is_ok());
        assert!(check_receive_address("erc20", None).is_ok());
    }

    #[test]
    fn test_summary_normalizes_currencies() {
        let session = Session {
            fiat_currency: "eur".into(),
            crypto_currency: "USDT".into(),
            ..Session::default()
        };
        let summary = InvoiceSummary::from_session(&session);
        assert_eq!(summary.fiat_currency, "EUR");
        assert_eq!(summary.crypto_currency, "usdt");
        assert!(!summary.kyc_approved());
    }
}
