//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::trace::{SpanData, SpanExporter};
use opentelemetry_sdk::Resource;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use demo_service::config::ServiceConfig;
use demo_service::lifecycle::Shutdown;
use demo_service::telemetry::Telemetry;
use demo_service::Server;

/// Span exporter that appends finished spans to a shared sink.
#[derive(Debug)]
pub struct CapturingExporter {
    spans: Arc<Mutex<Vec<SpanData>>>,
    resource: Arc<Mutex<Option<Resource>>>,
}

/// Reader side of a [`CapturingExporter`].
#[derive(Clone)]
pub struct SpanSink {
    spans: Arc<Mutex<Vec<SpanData>>>,
    resource: Arc<Mutex<Option<Resource>>>,
}

impl CapturingExporter {
    pub fn new() -> (Self, SpanSink) {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let resource = Arc::new(Mutex::new(None));
        (
            Self {
                spans: Arc::clone(&spans),
                resource: Arc::clone(&resource),
            },
            SpanSink { spans, resource },
        )
    }
}

impl SpanExporter for CapturingExporter {
    fn export(&self, batch: Vec<SpanData>) -> impl Future<Output = OTelSdkResult> + Send {
        let spans = Arc::clone(&self.spans);
        async move {
            spans.lock().unwrap().extend(batch);
            Ok(())
        }
    }

    fn set_resource(&mut self, resource: &Resource) {
        *self.resource.lock().unwrap() = Some(resource.clone());
    }
}

impl SpanSink {
    /// All spans exported so far.
    pub fn spans(&self) -> Vec<SpanData> {
        self.spans.lock().unwrap().clone()
    }

    /// The first exported span with the given name.
    pub fn span_named(&self, name: &str) -> Option<SpanData> {
        self.spans().into_iter().find(|s| s.name == name)
    }

    /// The resource the pipeline was built with.
    #[allow(dead_code)]
    pub fn resource(&self) -> Option<Resource> {
        self.resource.lock().unwrap().clone()
    }
}

/// A demo service running on an ephemeral port with an in-memory span sink.
pub struct TestService {
    pub base_url: String,
    pub sink: SpanSink,
    pub shutdown: Shutdown,
    pub telemetry: Telemetry,
    #[allow(dead_code)]
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

/// Spin up the full service (router, middleware, telemetry) for one test.
pub async fn spawn_service(config: ServiceConfig) -> TestService {
    let (exporter, sink) = CapturingExporter::new();
    let telemetry = Telemetry::with_exporter(exporter, &config.telemetry);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = Server::new(config, &telemetry).unwrap();
    let shutdown = Shutdown::new();
    let rx: broadcast::Receiver<()> = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, rx).await });

    TestService {
        base_url: format!("http://{}", addr),
        sink,
        shutdown,
        telemetry,
        handle,
    }
}

/// Start a mock resources backend returning the given JSON payload.
/// Returns the URL the service should be pointed at.
pub async fn spawn_resources_backend(payload: Value) -> String {
    let app = Router::new().route(
        "/api/v1/resources",
        get(move || {
            let payload = payload.clone();
            async move { Json(payload) }
        }),
    );
    spawn_backend(app).await
}

/// Start a mock backend answering 200 with a body that is not JSON.
#[allow(dead_code)]
pub async fn spawn_text_backend(body: &'static str) -> String {
    let app = Router::new().route("/api/v1/resources", get(move || async move { body }));
    spawn_backend(app).await
}

/// Start a mock resources backend answering with the given status code and
/// JSON payload.
#[allow(dead_code)]
pub async fn spawn_status_backend(status: u16, payload: Value) -> String {
    let status = StatusCode::from_u16(status).unwrap();
    let app = Router::new().route(
        "/api/v1/resources",
        get(move || {
            let payload = payload.clone();
            async move { (status, Json(payload)) }
        }),
    );
    spawn_backend(app).await
}

/// Start a mock resources backend that records the headers of every request
/// it receives.
#[allow(dead_code)]
pub async fn spawn_recording_backend(payload: Value) -> (String, Arc<Mutex<Vec<HeaderMap>>>) {
    let seen: Arc<Mutex<Vec<HeaderMap>>> = Arc::new(Mutex::new(Vec::new()));

    async fn record(
        State((seen, payload)): State<(Arc<Mutex<Vec<HeaderMap>>>, Value)>,
        headers: HeaderMap,
    ) -> Json<Value> {
        seen.lock().unwrap().push(headers);
        Json(payload)
    }

    let app = Router::new()
        .route("/api/v1/resources", get(record))
        .with_state((Arc::clone(&seen), payload));

    (spawn_backend(app).await, seen)
}

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}/api/v1/resources", addr)
}

/// A reqwest client that ignores any ambient proxy configuration.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
