//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit, CORS)
//! - Build the upstream clients shared by all requests
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    error_handling::HandleErrorLayer,
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    BoxError, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::bot::BotClient;
use crate::carrier::CarrierClient;
use crate::config::RelayConfig;
use crate::http::request::{make_span, MakeRequestUuidV4};
use crate::http::response::ApiError;
use crate::http::{health, lookup, order};
use crate::observability::metrics;
use crate::order::OrderNotifier;
use crate::resilience::upstream_client;
use crate::security::{body_limit, cors_layer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub carrier: CarrierClient,
    pub notifier: OrderNotifier,
}

impl AppState {
    /// Build the upstream clients from configuration.
    pub fn from_config(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let http = upstream_client(&config.timeouts)?;
        Ok(Self {
            carrier: CarrierClient::new(&config.carrier, http.clone()),
            notifier: OrderNotifier::new(BotClient::new(&config.bot, http)),
            config: Arc::new(config),
        })
    }
}

/// HTTP server for the order relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::from_config(config)?;
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The deadline sits inside CORS and request-ID propagation so a timed
    /// out request still gets a JSON error carrying both.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(health::root))
            .route("/api/health", get(health::health))
            .route("/api/novaposhta", post(lookup::novaposhta))
            .route("/api/getCities", post(lookup::get_cities))
            .route("/api/getWarehouses", post(lookup::get_warehouses))
            .route("/api/sendOrder", post(order::send_order))
            .route_layer(middleware::from_fn(track_requests))
            .fallback(health::not_found)
            .with_state(state)
            .layer(body_limit(&config.security))
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_middleware_error))
                    .timeout(Duration::from_secs(config.timeouts.request_secs)),
            )
            .layer(cors_layer(&config.security))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, e.g. for driving it without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request deadline exceeded");
        ApiError::Timeout
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::Internal("Internal server error".to_string())
    }
}

async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(route, response.status().as_u16(), start);
    response
}
