pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::pages;
use crate::http::server::AppState;

/// Admin JSON API plus the offramp lookup page, behind basic auth.
pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/config", get(get_config))
        .route("/admin/payment-methods", get(get_payment_methods))
        .route("/admin/offramp", post(post_offramp))
        .route("/admin/onramp", post(post_onramp))
        .route(
            "/onramp/offramp-lookup",
            get(pages::offramp_lookup_page).post(pages::offramp_lookup_submit),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}
