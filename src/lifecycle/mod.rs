//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → broadcast to subscribers
//!     → server stops accepting, drains connections
//!     → telemetry flushes and shuts down
//!     → process exits
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accept, drain, flush telemetry, exit
//! - Telemetry goes down last so the final requests' spans still export

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
