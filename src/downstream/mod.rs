//! Downstream resources API subsystem.
//!
//! # Data Flow
//! ```text
//! handler context
//!     → getResources span (client kind, child of the server span)
//!     → instrumented GET http://localhost:8080/api/v1/resources
//!     → JSON object decode
//!     → log status line + decoded map
//! ```
//!
//! # Design Decisions
//! - The span ends on every exit path; the handle owns it and drop ends it
//! - Build and transport failures are recorded on the span; decode failures
//!   are logged only and leave the span status untouched
//! - The body is decoded whatever the HTTP status code says

use opentelemetry::trace::{Span, SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::Context;
use opentelemetry_sdk::trace::SdkTracer;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::http::client::InstrumentedClient;

/// Name of the span wrapping one downstream fetch.
pub const FETCH_SPAN_NAME: &str = "getResources";

/// Errors that can occur while fetching resources.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The outbound request could not be constructed.
    #[error("Failed to build resources request: {0}")]
    Build(#[source] reqwest::Error),

    /// The outbound request could not be delivered.
    #[error("Failed to get resources: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body was not a JSON object.
    #[error("Failed to decode resources response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Fetch the resources document from the downstream API.
///
/// Opens a client-kind `getResources` span under `parent`; the outbound
/// request carries that span's context in its `traceparent` header. On
/// success the response status line and the decoded object are logged and
/// the payload is discarded; this service only proves the call happened.
pub async fn fetch_resources(
    client: &InstrumentedClient,
    tracer: &SdkTracer,
    url: &str,
    parent: &Context,
) -> Result<(), FetchError> {
    let mut span = tracer
        .span_builder(FETCH_SPAN_NAME)
        .with_kind(SpanKind::Client)
        .start_with_context(tracer, parent);

    tracing::info!("Getting resources");

    let request = match client.get(url) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build resources request");
            span.record_error(&e);
            span.set_status(Status::error("failed to build resources request"));
            return Err(FetchError::Build(e));
        }
    };

    let cx = parent.with_remote_span_context(span.span_context().clone());
    let response = match client.execute(request, &cx).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get resources");
            span.record_error(&e);
            span.set_status(Status::error("failed to get resources"));
            return Err(FetchError::Request(e));
        }
    };

    let status = response.status();
    let body: Map<String, Value> = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            // Logged but never recorded on the span; a trace of this
            // request reads as clean while the log carries the failure.
            tracing::error!(error = %e, "Failed to decode resources response");
            return Err(FetchError::Decode(e));
        }
    };

    tracing::info!(status = %status, body = ?body, "Response");
    Ok(())
}
