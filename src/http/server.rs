//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Hold the swappable state (config + tracer) and trace history
//! - Apply config reloads and stop on the shutdown broadcast

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockchain::{ExplorerClient, ProviderError, TransactionHistoryProvider};
use crate::config::ServiceConfig;
use crate::http::trace::{health, recent_traces, trace_flow};
use crate::tracer::{FlowTracer, TraceHistory};

/// State replaced as a unit on config reload.
pub struct InnerState {
    pub config: ServiceConfig,
    pub tracer: FlowTracer,
}

impl InnerState {
    pub fn new(config: ServiceConfig, provider: Arc<dyn TransactionHistoryProvider>) -> Self {
        let mut tracer = FlowTracer::new(provider);
        if config.tracer.deadline_secs > 0 {
            tracer = tracer.with_deadline(Duration::from_secs(config.tracer.deadline_secs));
        }
        Self { config, tracer }
    }

    /// Build state backed by the configured block explorer.
    pub fn from_config(config: ServiceConfig) -> Result<Self, ProviderError> {
        let client = ExplorerClient::from_config(&config)?;
        tracing::debug!(client = ?client, "Explorer client ready");
        Ok(Self::new(config, Arc::new(client)))
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<InnerState>>,
    pub history: Arc<TraceHistory>,
}

impl AppState {
    pub fn new(inner: InnerState) -> Self {
        let history = Arc::new(TraceHistory::new(inner.config.history.capacity));
        Self {
            inner: Arc::new(ArcSwap::from_pointee(inner)),
            history,
        }
    }

    /// Swap in a new configuration. The current state is kept if the new
    /// explorer client cannot be built.
    pub fn apply_config(&self, config: ServiceConfig) {
        {
            let current = self.inner.load();
            if current.config.listener.bind_address != config.listener.bind_address
                || current.config.timeouts.request_secs != config.timeouts.request_secs
                || current.config.security.max_body_size != config.security.max_body_size
                || current.config.history.capacity != config.history.capacity
            {
                tracing::warn!("Listener, timeout, body limit and history changes take effect after restart");
            }
        }

        match InnerState::from_config(config) {
            Ok(inner) => {
                self.inner.store(Arc::new(inner));
                tracing::info!("Configuration reloaded");
            }
            Err(e) => {
                tracing::error!(error = %e, "Rejected reloaded configuration, keeping current");
            }
        }
    }
}

/// HTTP server for the flow tracing service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server that fetches history from the configured explorer.
    pub fn new(config: ServiceConfig) -> Result<Self, ProviderError> {
        let inner = InnerState::from_config(config)?;
        Ok(Self::from_state(AppState::new(inner)))
    }

    /// Create a server over an arbitrary history provider.
    pub fn with_provider(config: ServiceConfig, provider: Arc<dyn TransactionHistoryProvider>) -> Self {
        Self::from_state(AppState::new(InnerState::new(config, provider)))
    }

    fn from_state(state: AppState) -> Self {
        let config = state.inner.load().config.clone();
        let router = Self::build_router(&config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/api/trace/flow", post(trace_flow))
            .route("/api/trace/recent", get(recent_traces))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id,
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    // Must stay outside the timeout layer.
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until the shutdown broadcast fires, applying config updates as
    /// they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reload_state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                reload_state.apply_config(config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
