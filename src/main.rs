//! Traced Demo HTTP Service
//!
//! A minimal HTTP service demonstrating distributed tracing with Tokio and
//! Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 DEMO SERVICE                  │
//!                      │                                               │
//!     Client Request   │  ┌──────────┐    ┌───────────┐               │
//!     ─────────────────┼─▶│   http   │───▶│ telemetry │               │
//!     (any method /)   │  │  server  │    │middleware │               │
//!                      │  └──────────┘    └─────┬─────┘               │
//!                      │                        │ server span         │
//!                      │                        ▼                     │
//!                      │                  ┌───────────┐   GET         │
//!                      │                  │downstream │──────────────▶│──── Resources
//!     "Hello, World!"  │                  │   fetch   │◀──────────────│     API :8080
//!     ◀────────────────┼──────────────────┴───────────┘   JSON        │
//!                      │                   getResources span          │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │          Cross-Cutting Concerns          │ │
//!                      │  │  ┌────────┐ ┌───────────┐ ┌───────────┐ │ │
//!                      │  │  │ config │ │ telemetry │ │ lifecycle │ │ │
//!                      │  │  │        │ │ pipeline  │ │ shutdown  │ │ │
//!                      │  │  └────────┘ └─────┬─────┘ └───────────┘ │ │
//!                      │  └──────────────────│──────────────────────┘ │
//!                      └─────────────────────│────────────────────────┘
//!                                            │ OTLP/gRPC
//!                                            ▼
//!                                    Collector :4317
//! ```

// Core subsystems
pub mod config;
pub mod downstream;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod telemetry;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServiceConfig;
use crate::http::Server;
use crate::lifecycle::{signals, Shutdown};
use crate::telemetry::Telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("demo-service v0.1.0 starting");

    let config = ServiceConfig::default();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        downstream_url = %config.downstream.url,
        otlp_endpoint = %config.telemetry.otlp_endpoint,
        "Configuration loaded"
    );

    // Trace pipeline comes up before the listener; a broken exporter
    // configuration aborts startup.
    let telemetry = Telemetry::start(&config.telemetry)?;

    let shutdown = Shutdown::new();
    signals::spawn_listener(&shutdown);

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = Server::new(config, &telemetry)?;
    server.run(listener, shutdown.subscribe()).await?;

    // In-flight requests have drained; flush what the batch worker holds.
    telemetry.shutdown()?;

    tracing::info!("Shutdown complete");
    Ok(())
}
