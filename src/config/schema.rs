//! Configuration schema definitions.
//!
//! Every value here is a hard-coded default. The service takes no flags, no
//! environment overrides and no config file; the structs give the constants
//! one home and let tests substitute their own endpoints.

/// Root configuration for the service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream resources API.
    pub downstream: DownstreamConfig,

    /// Trace pipeline settings.
    pub telemetry: TelemetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8070").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8070".to_string(),
        }
    }
}

/// Downstream resources API configuration.
#[derive(Debug, Clone)]
pub struct DownstreamConfig {
    /// Full URL of the resources endpoint.
    pub url: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/api/v1/resources".to_string(),
        }
    }
}

/// Trace pipeline settings.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// OTLP gRPC collector endpoint. A plain http scheme means an
    /// unencrypted channel.
    pub otlp_endpoint: String,

    /// Reported as the `service.name` resource attribute.
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: "demoservice".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Deadline for handling one inbound request.
    pub request_secs: u64,

    /// Deadline for one downstream request, connect included.
    pub downstream_secs: u64,

    /// TCP connect deadline for downstream requests.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            downstream_secs: 10,
            connect_secs: 5,
        }
    }
}
