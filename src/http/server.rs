//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, security headers)
//! - Bound non-invoice routes with the optional inbound timeout
//! - Mount the admin surface when credentials are configured
//! - Bind server to listener and drain on shutdown

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::GatewayConfig;
use crate::http::pages;
use crate::onramp::{OnrampClient, OnrampResult};
use crate::session::{MemorySessionStore, SessionStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub client: OnrampClient,
    pub sessions: Arc<dyn SessionStore>,
    pub started_at: Instant,
}

impl AppState {
    /// Build state with an in-memory session store.
    pub fn new(config: GatewayConfig) -> OnrampResult<Self> {
        let client = OnrampClient::new(&config.provider)?;
        let sessions = Arc::new(MemorySessionStore::new(Duration::from_secs(
            config.app.session_ttl_secs,
        )));
        Ok(Self {
            config: Arc::new(config),
            client,
            sessions,
            started_at: Instant::now(),
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> OnrampResult<Self> {
        Ok(Self::with_state(AppState::new(config)?))
    }

    pub fn with_state(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        // Creates provider entities; never cut short by the inbound timeout.
        let invoice = Router::new()
            .route(
                "/invoice/new",
                get(pages::new_invoice_page).post(pages::submit_invoice),
            )
            .route("/invoice/continue", get(pages::continue_invoice_page))
            .with_state(state.clone());

        let mut bounded = Router::new()
            .route("/", get(pages::index))
            .route("/health", get(pages::health))
            .with_state(state.clone());

        if config.admin.enabled() {
            bounded = bounded.merge(setup_admin_router(state));
        } else {
            tracing::info!("Admin credentials not configured; admin routes disabled");
        }

        if let Some(secs) = config.timeouts.request_secs {
            bounded = bounded.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        let mut router = invoice.merge(bounded);

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                ));
        }

        router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admin_enabled = self.state.config.admin.enabled(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
