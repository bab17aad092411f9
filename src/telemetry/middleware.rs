//! Server span middleware.
//!
//! Starts one server-kind span per inbound request, parented on whatever
//! trace context the caller sent. The span's context rides in the request
//! extensions so the handler can hang child spans off it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::{Span, SpanKind, TraceContextExt, Tracer};
use opentelemetry::KeyValue;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracer;
use opentelemetry_semantic_conventions::attribute::{
    HTTP_REQUEST_METHOD, HTTP_RESPONSE_STATUS_CODE, URL_PATH,
};
use tower::{Layer, Service};

use crate::telemetry::propagation::HeaderExtractor;

/// Layer that wraps the router with per-request server spans.
#[derive(Clone)]
pub struct TraceContextLayer {
    tracer: SdkTracer,
    propagator: Arc<TraceContextPropagator>,
}

impl TraceContextLayer {
    pub fn new(tracer: SdkTracer, propagator: Arc<TraceContextPropagator>) -> Self {
        Self { tracer, propagator }
    }
}

impl<S> Layer<S> for TraceContextLayer {
    type Service = TraceContextService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceContextService {
            inner,
            tracer: self.tracer.clone(),
            propagator: self.propagator.clone(),
        }
    }
}

/// The service that opens a server span around each request.
#[derive(Clone)]
pub struct TraceContextService<S> {
    inner: S,
    tracer: SdkTracer,
    propagator: Arc<TraceContextPropagator>,
}

impl<S> Service<Request<Body>> for TraceContextService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        // A request without (or with a malformed) traceparent yields an
        // invalid remote context and the span starts a new trace.
        let parent = self.propagator.extract(&HeaderExtractor(request.headers()));

        let mut span = self
            .tracer
            .span_builder(format!("{} {}", request.method(), request.uri().path()))
            .with_kind(SpanKind::Server)
            .with_attributes([
                KeyValue::new(HTTP_REQUEST_METHOD, request.method().to_string()),
                KeyValue::new(URL_PATH, request.uri().path().to_string()),
            ])
            .start_with_context(&self.tracer, &parent);

        let cx = parent.with_remote_span_context(span.span_context().clone());
        request.extensions_mut().insert(cx);

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(request).await?;
            span.set_attribute(KeyValue::new(
                HTTP_RESPONSE_STATUS_CODE,
                response.status().as_u16() as i64,
            ));
            span.end();
            Ok(response)
        })
    }
}
