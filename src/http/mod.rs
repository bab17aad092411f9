//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout + trace layers)
//!     → handler.rs (log, fetch downstream, reply "Hello, World!")
//!     → client.rs (instrumented outbound GET)
//! ```

pub mod client;
pub mod handler;
pub mod server;

pub use client::InstrumentedClient;
pub use server::{AppState, Server};
