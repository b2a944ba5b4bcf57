//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request id, tracing, security headers, CORS,
//!   rate limit, compression, body limit, metrics)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Request};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::config::{AppConfig, SecurityConfig};
use crate::http::request::request_id;
use crate::observability::metrics::track_requests;
use crate::routing;
use crate::security::headers::security_headers;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};
use crate::store::ListStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document collection backend.
    pub documents: Arc<dyn ListStore>,
    /// Relational table backend.
    pub relational: Arc<dyn ListStore>,
    /// Runtime mode shown in the root banner.
    pub mode: Arc<str>,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn ListStore>,
        relational: Arc<dyn ListStore>,
        mode: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            documents,
            relational,
            mode: mode.into(),
        }
    }
}

/// HTTP server for the CRUD API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and stores.
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(&config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The request id is set before the trace span opens; metrics sit
    /// innermost so they see the matched route.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let mut router = routing::router::build(state)
            .layer(middleware::from_fn(track_requests))
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(CompressionLayer::new());

        if config.rate_limit.enabled && config.rate_limit.max_requests > 0 {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        router = router.layer(cors_layer(&config.security));

        if config.security.enable_headers {
            router = router.layer(middleware::from_fn(security_headers));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}
