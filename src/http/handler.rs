//! The single request handler.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::Response;
use opentelemetry::Context;

use crate::downstream;
use crate::http::server::AppState;

/// Body of a successful response.
pub const HELLO_BODY: &str = "Hello, World!";

/// Handle one inbound request: log it, fetch the resources document, reply.
///
/// A failed fetch is logged and swallowed; the caller still gets a 200, just
/// with an empty body. Neither arm sets an explicit content type.
pub async fn hello(State(state): State<AppState>, request: Request<Body>) -> Response {
    tracing::info!(path = %request.uri().path(), "Received request");

    let cx = request
        .extensions()
        .get::<Context>()
        .cloned()
        .unwrap_or_default();

    let fetched = downstream::fetch_resources(
        &state.client,
        &state.tracer,
        &state.downstream_url,
        &cx,
    )
    .await;

    match fetched {
        Ok(()) => Response::new(Body::from(HELLO_BODY)),
        Err(e) => {
            tracing::error!(error = %e, "Resources fetch failed");
            Response::new(Body::empty())
        }
    }
}
