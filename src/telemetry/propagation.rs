//! W3C trace context carriers for HTTP header maps.

use axum::http::header::{HeaderName, HeaderValue};
use axum::http::HeaderMap;
use opentelemetry::propagation::{Extractor, Injector};

/// Wrapper for `HeaderMap` to implement the `Injector` trait.
/// Used for injecting trace context into outgoing HTTP requests.
pub struct HeaderInjector<'a>(pub &'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let Ok(key) = HeaderName::from_bytes(key.as_bytes()) {
            if let Ok(value) = HeaderValue::from_str(&value) {
                self.0.insert(key, value);
            }
        }
    }
}

/// Wrapper for `HeaderMap` to implement the `Extractor` trait.
/// Used for extracting trace context from incoming HTTP requests.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        // W3C Trace Context only uses "traceparent" and optionally
        // "tracestate". Only return the keys actually present.
        ["traceparent", "tracestate"]
            .into_iter()
            .filter(|k| self.0.get(*k).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::propagation::TextMapPropagator;
    use opentelemetry::trace::{
        SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
    };
    use opentelemetry::Context;
    use opentelemetry_sdk::propagation::TraceContextPropagator;

    fn remote_context() -> Context {
        let span_context = SpanContext::new(
            TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap(),
            SpanId::from_hex("b7ad6b7169203331").unwrap(),
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );
        Context::new().with_remote_span_context(span_context)
    }

    #[test]
    fn test_inject_writes_traceparent() {
        let propagator = TraceContextPropagator::new();
        let mut headers = HeaderMap::new();
        propagator.inject_context(&remote_context(), &mut HeaderInjector(&mut headers));

        let traceparent = headers.get("traceparent").unwrap().to_str().unwrap();
        assert_eq!(
            traceparent,
            "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01"
        );
    }

    #[test]
    fn test_extract_roundtrip() {
        let propagator = TraceContextPropagator::new();
        let mut headers = HeaderMap::new();
        propagator.inject_context(&remote_context(), &mut HeaderInjector(&mut headers));

        let extracted = propagator.extract(&HeaderExtractor(&headers));
        let span_context = extracted.span().span_context().clone();
        assert_eq!(
            span_context.trace_id(),
            TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap()
        );
        assert_eq!(
            span_context.span_id(),
            SpanId::from_hex("b7ad6b7169203331").unwrap()
        );
        assert!(span_context.is_sampled());
    }

    #[test]
    fn test_extract_without_headers_is_invalid() {
        let propagator = TraceContextPropagator::new();
        let headers = HeaderMap::new();
        let extracted = propagator.extract(&HeaderExtractor(&headers));
        assert!(!extracted.span().span_context().is_valid());
    }

    #[test]
    fn test_extract_malformed_traceparent_is_invalid() {
        let propagator = TraceContextPropagator::new();
        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static("garbage"));
        let extracted = propagator.extract(&HeaderExtractor(&headers));
        assert!(!extracted.span().span_context().is_valid());
    }

    #[test]
    fn test_extractor_keys_reports_present_headers_only() {
        let mut headers = HeaderMap::new();
        assert!(HeaderExtractor(&headers).keys().is_empty());

        headers.insert(
            "traceparent",
            HeaderValue::from_static("00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01"),
        );
        assert_eq!(HeaderExtractor(&headers).keys(), vec!["traceparent"]);
    }
}
