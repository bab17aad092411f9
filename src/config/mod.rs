//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceConfig::default()
//!     → fixed endpoints and timeouts (no file, no env, no flags)
//!     → cloned into the server, client and telemetry at startup
//! ```
//!
//! # Design Decisions
//! - Configuration is immutable for the life of the process
//! - Defaults are the contract: 8070 in, 8080 downstream, 4317 OTLP
//! - Tests override individual fields through the public structs

pub mod schema;

pub use schema::DownstreamConfig;
pub use schema::ListenerConfig;
pub use schema::ServiceConfig;
pub use schema::TelemetryConfig;
pub use schema::TimeoutConfig;
