//! Page handlers for the invoice and lookup flows.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde_json::json;

use crate::flow::{self, FlowError, InvoiceForm, TransactionLookup};
use crate::http::server::AppState;
use crate::http::views;
use crate::session::{session_cookie, session_id_from_headers};

pub async fn index() -> Redirect {
    Redirect::to("/invoice/new")
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn new_invoice_page(State(state): State<AppState>) -> Html<String> {
    Html(views::invoice_form(None, &state.config.provider.chain))
}

/// Start an invoice: on success set the session cookie and send the
/// customer to the provider's KYC page.
pub async fn submit_invoice(
    State(state): State<AppState>,
    Form(form): Form<InvoiceForm>,
) -> Response {
    let result = flow::create_invoice(&state.client, &state.config, form)
        .await
        .and_then(|started| {
            // The URL ends up in a Location header; reject it before any session exists.
            match HeaderValue::from_str(&started.kyc_url) {
                Ok(_) => Ok(started),
                Err(_) => {
                    tracing::warn!("Provider returned a KYC URL that is not a valid header value");
                    Err(FlowError::MissingKycUrl)
                }
            }
        });

    match result {
        Ok(started) => {
            let id = state.sessions.create(started.session);
            let cookie = session_cookie(
                &id,
                state.config.app.session_ttl_secs,
                state.config.security.secure_cookies,
            );
            (
                [(header::SET_COOKIE, cookie)],
                Redirect::to(&started.kyc_url),
            )
                .into_response()
        }
        Err(e) => {
            let status = if e.is_validation() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            let html = views::invoice_form(Some(&e.user_message()), &state.config.provider.chain);
            (status, Html(html)).into_response()
        }
    }
}

/// Landing page after KYC: runs the rest of the flow and renders it.
///
/// Once a transaction exists the session is dropped, so a reload cannot
/// create a second one.
pub async fn continue_invoice_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Html<String> {
    let Some(id) = session_id_from_headers(&headers) else {
        return Html(views::session_expired());
    };
    match state.sessions.get(&id) {
        Some(session) if !session.customer_id.is_empty() => {
            let summary = flow::continue_invoice(&state.client, &session).await;
            if summary.transaction.is_some() {
                state.sessions.remove(&id);
            }
            Html(views::invoice_summary(&summary))
        }
        _ => Html(views::session_expired()),
    }
}

pub async fn offramp_lookup_page() -> Html<String> {
    Html(views::offramp_lookup(None, None))
}

pub async fn offramp_lookup_submit(
    State(state): State<AppState>,
    Form(lookup): Form<TransactionLookup>,
) -> Response {
    match flow::lookup_offramp(&state.client, &lookup).await {
        Ok(transaction) => Html(views::offramp_lookup(None, Some(&transaction))).into_response(),
        Err(e) => {
            let status = if e.is_validation() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, Html(views::offramp_lookup(Some(&e.user_message()), None))).into_response()
        }
    }
}
