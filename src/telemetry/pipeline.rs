//! Trace pipeline construction and teardown.

use std::sync::Arc;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::error::OTelSdkError;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Sampler, SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, TELEMETRY_SDK_LANGUAGE};
use thiserror::Error;

use crate::config::TelemetryConfig;

/// Errors that can occur in the trace pipeline.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// OTLP exporter could not be constructed.
    #[error("Failed to build OTLP span exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// Queued spans could not be flushed.
    #[error("Failed to flush spans: {0}")]
    Flush(#[source] OTelSdkError),

    /// Tracer provider refused to shut down.
    #[error("Failed to shut down tracer provider: {0}")]
    Shutdown(#[source] OTelSdkError),
}

/// Handle owning the trace pipeline.
///
/// Holds the tracer provider, the service tracer and the W3C propagator.
/// Nothing is installed globally; components that trace receive the tracer
/// and propagator from this handle, and the handle is the only place the
/// provider can be shut down.
pub struct Telemetry {
    provider: Option<SdkTracerProvider>,
    tracer: SdkTracer,
    propagator: Arc<TraceContextPropagator>,
}

impl Telemetry {
    /// Build the pipeline: OTLP gRPC exporter against the configured
    /// endpoint, batch processor with library defaults, always-on sampling
    /// and the fixed service resource.
    ///
    /// Construction failure is fatal to startup; the service never runs
    /// without its exporter.
    pub fn start(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&config.otlp_endpoint)
            .build()?;

        let provider = SdkTracerProvider::builder()
            .with_sampler(Sampler::AlwaysOn)
            .with_resource(service_resource(config))
            .with_batch_exporter(exporter)
            .build();

        Ok(Self::from_provider(provider))
    }

    /// Build the pipeline around a caller-supplied exporter with a simple
    /// (synchronous) processor. Lets tests capture finished spans in memory.
    pub fn with_exporter<E>(exporter: E, config: &TelemetryConfig) -> Self
    where
        E: opentelemetry_sdk::trace::SpanExporter + 'static,
    {
        let provider = SdkTracerProvider::builder()
            .with_sampler(Sampler::AlwaysOn)
            .with_resource(service_resource(config))
            .with_simple_exporter(exporter)
            .build();

        Self::from_provider(provider)
    }

    fn from_provider(provider: SdkTracerProvider) -> Self {
        let tracer = provider.tracer(env!("CARGO_PKG_NAME"));
        Self {
            provider: Some(provider),
            tracer,
            propagator: Arc::new(TraceContextPropagator::new()),
        }
    }

    /// The service tracer.
    pub fn tracer(&self) -> &SdkTracer {
        &self.tracer
    }

    /// The W3C trace context propagator.
    pub fn propagator(&self) -> Arc<TraceContextPropagator> {
        self.propagator.clone()
    }

    /// Flush queued spans without shutting down.
    pub fn force_flush(&self) -> Result<(), TelemetryError> {
        match &self.provider {
            Some(provider) => provider.force_flush().map_err(TelemetryError::Flush),
            None => Ok(()),
        }
    }

    /// Flush queued spans and shut the provider down.
    ///
    /// Consumes the handle; double shutdown is unrepresentable. A handle
    /// whose provider is already gone is a no-op.
    pub fn shutdown(mut self) -> Result<(), TelemetryError> {
        if let Some(provider) = self.provider.take() {
            provider.force_flush().map_err(TelemetryError::Flush)?;
            provider.shutdown().map_err(TelemetryError::Shutdown)?;
        }
        Ok(())
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            let _ = provider.force_flush();
            if let Err(e) = provider.shutdown() {
                eprintln!("Error shutting down tracer provider: {e}");
            }
        }
    }
}

fn service_resource(config: &TelemetryConfig) -> Resource {
    Resource::builder()
        .with_attributes([
            KeyValue::new(SERVICE_NAME, config.service_name.clone()),
            KeyValue::new(TELEMETRY_SDK_LANGUAGE, "rust"),
        ])
        .build()
}
