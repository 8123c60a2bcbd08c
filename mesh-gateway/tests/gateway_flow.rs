//! End-to-end flows across the wiring, store, and REST surface.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use mesh_config::{ConfigService, MemoryStore, Settings};
use mesh_gateway::{server, wiring, GatewayContext, NoopRestart};
use mesh_registry::{
    DeviceAddress, DeviceInfo, DeviceRegistry, EventBus, GatewayEvent, MemoryRegistry,
    RegistryError,
};

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.gateway.auth_token = "secret".to_string();
    settings.gateway.meter_models = vec!["TO-Q-SY1-JZT".to_string()];
    settings
        .gateway
        .tracked_properties
        .push("branchId".to_string());
    settings
}

fn context_with(registry: Arc<dyn DeviceRegistry>) -> GatewayContext {
    GatewayContext::new(
        registry,
        ConfigService::new(Arc::new(MemoryStore::with_settings(settings()))),
        EventBus::new(32),
        Arc::new(NoopRestart::new()),
    )
    .unwrap()
}

#[tokio::test]
async fn join_event_and_config_change_flow() {
    let registry = Arc::new(MemoryRegistry::new());
    let context = context_with(registry.clone());
    wiring::start(context.clone()).await.unwrap();

    let addr = DeviceAddress::new("0x01");
    context.bus.publish(GatewayEvent::DeviceJoined {
        address: addr.clone(),
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Defaulted record
    let record = context.feedback.verify(&addr).unwrap();
    assert_eq!(record["source"], "manual");
    assert_eq!(record["branchId"], "0");

    // Config update over HTTP adds a tracked property
    let response = warp::test::request()
        .method("POST")
        .path("/config")
        .json(&json!({
            "password": "secret",
            "tracked_properties": ["branchId", "note"]
        }))
        .reply(&server::routes(context.clone()))
        .await;
    assert_eq!(response.body(), "OK");

    // The existing record self-heals to the new property set on read
    let record = context.feedback.verify(&addr).unwrap();
    assert_eq!(record.len(), 5);
    assert_eq!(record["note"], "");
}

#[tokio::test]
async fn config_merge_via_http_leaves_other_fields_untouched() {
    let context = context_with(Arc::new(MemoryRegistry::new()));
    let filter = server::routes(context.clone());

    let response = warp::test::request()
        .method("POST")
        .path("/config")
        .json(&json!({"password": "secret", "callbacks": ["http://a"]}))
        .reply(&filter)
        .await;
    assert_eq!(response.body(), "OK");

    let response = warp::test::request()
        .method("GET")
        .path("/config")
        .reply(&filter)
        .await;
    let body: Value = serde_json::from_slice(response.body()).unwrap();

    assert_eq!(body["callbacks"][0], "http://a");
    // Untouched by the patch
    assert_eq!(body["meter_models"][0], "TO-Q-SY1-JZT");
    assert_eq!(body["tracked_properties"][0], "ieeeAddr");
    assert_eq!(body["tracked_properties"][3], "branchId");
}

#[tokio::test]
async fn devices_by_name_maps_energy() {
    let registry = Arc::new(MemoryRegistry::new());
    let addr = DeviceAddress::new("0x01");
    let mut plug = DeviceInfo::new("0x01", "plug");
    plug.model = "TO-Q-SY1-JZT".to_string();
    registry.insert(plug);
    registry.set_cluster_attribute(&addr, "seMetering", "currentSummDelivered", "0,12345");
    registry.insert(DeviceInfo::new("0x02", "sensor"));

    let context = context_with(registry);

    let response = warp::test::request()
        .method("GET")
        .path("/devices-by-name")
        .reply(&server::routes(context))
        .await;

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["plug"], 123.45);
    assert!(body.get("sensor").is_none());
}

/// Registry whose attribute reads always fail, to exercise per-device
/// omission in the listing.
struct FaultyRegistry {
    inner: MemoryRegistry,
}

impl DeviceRegistry for FaultyRegistry {
    fn devices(&self) -> mesh_registry::Result<Vec<DeviceInfo>> {
        self.inner.devices()
    }

    fn device(&self, address: &DeviceAddress) -> mesh_registry::Result<Option<DeviceInfo>> {
        self.inner.device(address)
    }

    fn cluster_attribute(
        &self,
        address: &DeviceAddress,
        _cluster: &str,
        _attribute: &str,
    ) -> mesh_registry::Result<Option<String>> {
        Err(RegistryError::AttributeRead {
            address: address.to_string(),
            reason: "device unreachable".to_string(),
        })
    }
}

#[tokio::test]
async fn failing_device_is_omitted_not_fatal() {
    let inner = MemoryRegistry::new();
    let mut plug = DeviceInfo::new("0x01", "plug");
    plug.model = "TO-Q-SY1-JZT".to_string();
    inner.insert(plug);
    inner.insert(DeviceInfo::new("0x02", "sensor"));

    let context = context_with(Arc::new(FaultyRegistry { inner }));

    let response = warp::test::request()
        .method("GET")
        .path("/devices")
        .reply(&server::routes(context))
        .await;

    assert_eq!(response.status(), 200);
    let body: Vec<Value> = serde_json::from_slice(response.body()).unwrap();
    // The meter plug's attribute read fails and it is omitted; the plain
    // sensor needs no attribute reads and survives.
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["name"], "sensor");
}
