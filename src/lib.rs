//! Traced Demo HTTP Service Library

pub mod config;
pub mod downstream;
pub mod http;
pub mod lifecycle;
pub mod telemetry;

pub use config::schema::ServiceConfig;
pub use http::Server;
pub use lifecycle::Shutdown;
pub use telemetry::Telemetry;
