//! First invoice step: register the customer and obtain a KYC URL.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::flow::FlowError;
use crate::observability::metrics;
use crate::onramp::types::{response_data, value_to_string};
use crate::onramp::{CreateOutcome, OnrampClient};
use crate::session::Session;

/// Invoice form fields, as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceForm {
    pub phone_number: String,
    pub email: String,
    pub amount: String,
    pub fiat_currency: String,
    pub crypto_currency: String,
    pub description: String,
    pub chain: String,
}

/// Result of a successful first step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceStarted {
    /// Provider-hosted KYC page to redirect the customer to.
    pub kyc_url: String,
    /// State to persist for the continue step.
    pub session: Session,
}

/// Validate the form, create the KYC session and build the customer session.
///
/// If the phone number is already bound to a customer, the call is retried
/// exactly once with that customer's id. When the retry fails or returns no
/// URL, the original error is returned.
pub async fn create_invoice(
    client: &OnrampClient,
    config: &GatewayConfig,
    form: InvoiceForm,
) -> Result<InvoiceStarted, FlowError> {
    let result = start(client, config, form).await;
    metrics::record_flow_outcome("invoice", if result.is_ok() { "ok" } else { "error" });
    result
}

async fn start(
    client: &OnrampClient,
    config: &GatewayConfig,
    form: InvoiceForm,
) -> Result<InvoiceStarted, FlowError> {
    let phone = form.phone_number.trim().to_string();
    if phone.is_empty() {
        return Err(FlowError::Validation("Phone number is required".to_string()));
    }

    let kyc_redirect_url = config.app.kyc_redirect_url();
    let payload = kyc_payload(&phone, form.email.trim(), &kyc_redirect_url);

    let (kyc_url, customer_id) = match CreateOutcome::classify(client.create_kyc_url(&payload).await) {
        CreateOutcome::Created(response) => {
            let data = response_data(&response);
            let kyc_url = kyc_url(data).ok_or(FlowError::MissingKycUrl)?;
            (kyc_url, value_to_string(&data["customerId"]))
        }
        CreateOutcome::RetryWithId { customer_id, error } => {
            tracing::info!(customer_id = %customer_id, "Phone already linked, retrying with existing customer");
            let retry = json!({
                "customerId": customer_id,
                "kycRedirectUrl": kyc_redirect_url,
            });
            match client.create_kyc_url(&retry).await {
                Ok(response) => match kyc_url(response_data(&response)) {
                    Some(url) => (url, customer_id),
                    None => return Err(error.into()),
                },
                Err(retry_error) => {
                    tracing::warn!(error = %retry_error, "Retry with existing customer failed");
                    return Err(error.into());
                }
            }
        }
        CreateOutcome::Failed(error) => return Err(error.into()),
    };

    let session = Session {
        customer_id,
        phone,
        email: form.email.trim().to_string(),
        amount: form.amount.trim().to_string(),
        fiat_currency: form.fiat_currency.trim().to_string(),
        crypto_currency: form.crypto_currency.trim().to_string(),
        description: form.description.trim().to_string(),
        chain: form.chain.trim().to_string(),
    }
    .with_defaults(&config.provider.chain);

    tracing::info!(customer_id = %session.customer_id, chain = %session.chain, "KYC session created");

    Ok(InvoiceStarted { kyc_url, session })
}

fn kyc_payload(phone: &str, email: &str, kyc_redirect_url: &str) -> Value {
    let mut payload = Map::new();
    payload.insert("phoneNumber".into(), json!(phone));
    payload.insert("clientCustomerId".into(), json!(Uuid::new_v4().to_string()));
    payload.insert("type".into(), json!("INDIVIDUAL"));
    if !email.is_empty() {
        payload.insert("email".into(), json!(email));
    }
    payload.insert("kycRedirectUrl".into(), json!(kyc_redirect_url));
    Value::Object(payload)
}

fn kyc_url(data: &Value) -> Option<String> {
    data.get("kycUrl")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}
