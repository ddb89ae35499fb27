use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::flow::{lookup_offramp, lookup_onramp, FlowError, TransactionLookup};
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
}

/// Configuration with secrets reduced to presence flags.
#[derive(Serialize)]
pub struct ConfigSummary {
    pub base_url: String,
    pub chain: String,
    pub receive_address: Option<String>,
    pub api_key_present: bool,
    pub api_secret_present: bool,
    pub public_url: String,
    pub session_ttl_secs: u64,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigSummary> {
    let provider = &state.config.provider;
    Json(ConfigSummary {
        base_url: provider.base_url.clone(),
        chain: provider.chain.clone(),
        receive_address: provider.receive_address.clone(),
        api_key_present: !provider.credentials.api_key.is_empty(),
        api_secret_present: !provider.credentials.api_secret.is_empty(),
        public_url: state.config.app.public_url.clone(),
        session_ttl_secs: state.config.app.session_ttl_secs,
    })
}

pub async fn get_payment_methods(State(state): State<AppState>) -> Json<Value> {
    Json(state.client.payment_method_types().await)
}

pub async fn post_offramp(
    State(state): State<AppState>,
    Json(lookup): Json<TransactionLookup>,
) -> Response {
    lookup_response(lookup_offramp(&state.client, &lookup).await)
}

pub async fn post_onramp(
    State(state): State<AppState>,
    Json(lookup): Json<TransactionLookup>,
) -> Response {
    lookup_response(lookup_onramp(&state.client, &lookup).await)
}

fn lookup_response(result: Result<Value, FlowError>) -> Response {
    match result {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(e) => {
            let status = if e.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, Json(json!({ "error": e.user_message() }))).into_response()
        }
    }
}
