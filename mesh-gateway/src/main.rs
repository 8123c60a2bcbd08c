//! meshgw daemon entry point
//!
//! Wires the settings store, event bus, feedback store, dispatcher, and the
//! REST surface. The in-memory registry stands in for the mesh driver;
//! deployments replace it behind the `DeviceRegistry` trait.

use std::net::SocketAddr;
use std::sync::Arc;

use mesh_config::{ConfigService, JsonFileStore};
use mesh_gateway::{server, wiring, GatewayContext, GatewayError, ShellRestart};
use mesh_registry::{EventBus, MemoryRegistry};

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = match std::env::var("MESHGW_SETTINGS") {
        Ok(path) => JsonFileStore::new(path),
        Err(_) => JsonFileStore::at_default_location(),
    };
    tracing::info!(path = %store.path().display(), "Settings file");
    let config = ConfigService::new(Arc::new(store));

    let bus = EventBus::default();
    let registry = Arc::new(MemoryRegistry::new());

    let context = GatewayContext::new(
        registry,
        config,
        bus,
        Arc::new(ShellRestart::default()),
    )?;

    wiring::start(context.clone()).await?;

    let port = std::env::var("MESHGW_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8099);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    server::run(context, addr).await;
    Ok(())
}
