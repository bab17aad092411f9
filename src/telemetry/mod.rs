//! Distributed tracing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (pipeline.rs):
//!     OTLP gRPC exporter → batch processor → SdkTracerProvider
//!     → Telemetry handle (tracer + propagator), injected where needed
//!
//! Per request (middleware.rs):
//!     inbound headers → propagation.rs extract → server span
//!     → span context into request extensions → handler children
//!
//! Outbound (http/client.rs):
//!     span context → propagation.rs inject → traceparent header
//!
//! Teardown:
//!     server drained → force_flush → provider shutdown
//! ```
//!
//! # Design Decisions
//! - No globals: tracer and propagator travel by handle, not by
//!   `opentelemetry::global`
//! - Batch export with library defaults; sampling is always-on
//! - The handle owns the provider; shutdown consumes the handle

pub mod middleware;
pub mod pipeline;
pub mod propagation;

pub use middleware::TraceContextLayer;
pub use pipeline::Telemetry;
pub use pipeline::TelemetryError;
