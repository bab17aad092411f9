//! Stand-in for the downstream resources API.
//!
//! Serves a canned JSON object on the port the demo service calls, so the
//! whole flow can be exercised locally:
//!
//! ```text
//! cargo run --bin resources-backend
//! cargo run --bin demo-service
//! curl http://localhost:8070/
//! ```

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demo_service::lifecycle::{signals, Shutdown};

async fn resources() -> Json<Value> {
    tracing::info!("Serving resources");
    Json(json!({
        "resources": ["alpha", "beta", "gamma"],
        "count": 3,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resources_backend=info,demo_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = Router::new().route("/api/v1/resources", get(resources));

    let listener = TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!(address = %listener.local_addr()?, "Resources backend listening");

    let shutdown = Shutdown::new();
    signals::spawn_listener(&shutdown);

    let drain = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { drain.wait().await })
        .await?;

    tracing::info!("Resources backend stopped");
    Ok(())
}
