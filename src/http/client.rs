//! Instrumented outbound HTTP transport.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;

use crate::config::TimeoutConfig;
use crate::telemetry::propagation::HeaderInjector;

/// A `reqwest::Client` that stamps W3C trace context onto every request it
/// sends.
///
/// Requests and connects carry explicit deadlines, so a stuck downstream
/// cannot pin a handler forever.
#[derive(Clone)]
pub struct InstrumentedClient {
    inner: reqwest::Client,
    propagator: Arc<TraceContextPropagator>,
}

impl InstrumentedClient {
    pub fn new(
        propagator: Arc<TraceContextPropagator>,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.downstream_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()?;
        Ok(Self { inner, propagator })
    }

    /// Build a GET request for the given URL.
    pub fn get(&self, url: &str) -> Result<reqwest::Request, reqwest::Error> {
        self.inner.get(url).build()
    }

    /// Send a request with the trace context injected into its headers.
    pub async fn execute(
        &self,
        mut request: reqwest::Request,
        cx: &Context,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.propagator
            .inject_context(cx, &mut HeaderInjector(request.headers_mut()));
        self.inner.execute(request).await
    }
}
