//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with the single handler
//! - Wire up middleware (request timeout, server spans)
//! - Serve on a caller-supplied listener
//! - Drain in-flight requests on shutdown

use std::time::Duration;

use axum::{routing::any, Router};
use opentelemetry_sdk::trace::SdkTracer;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServiceConfig;
use crate::http::client::InstrumentedClient;
use crate::http::handler::hello;
use crate::telemetry::{Telemetry, TraceContextLayer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tracer: SdkTracer,
    pub client: InstrumentedClient,
    pub downstream_url: String,
}

/// HTTP server for the demo service.
pub struct Server {
    router: Router,
}

impl Server {
    /// Create a new server wired to the given trace pipeline.
    pub fn new(config: ServiceConfig, telemetry: &Telemetry) -> Result<Self, reqwest::Error> {
        let client = InstrumentedClient::new(telemetry.propagator(), &config.timeouts)?;

        let state = AppState {
            tracer: telemetry.tracer().clone(),
            client,
            downstream_url: config.downstream.url.clone(),
        };

        let router = Self::build_router(&config, telemetry, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, telemetry: &Telemetry, state: AppState) -> Router {
        Router::new()
            .route("/", any(hello))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceContextLayer::new(
                telemetry.tracer().clone(),
                telemetry.propagator(),
            ))
    }

    /// Run the server until the shutdown signal fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
