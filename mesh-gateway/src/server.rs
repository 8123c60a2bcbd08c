//! REST surface for the gateway
//!
//! Thin warp filters over the core services. Authorization failures reply
//! with the `Invalid credential!` sentinel body at 200, matching the config
//! surface contract: rejection is an ordinary outcome, not an HTTP fault.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use mesh_config::{ConfigPatch, DeviceOptions, SetOutcome, Settings};
use mesh_registry::CommandEvent;

use crate::context::GatewayContext;
use crate::summaries::{device_summaries, energy_by_name, DeviceSummary};

/// Delay before the supervisor is asked to restart
const RESTART_DELAY: Duration = Duration::from_secs(1);

/// Maximum accepted request body
const BODY_LIMIT: u64 = 64 * 1024;

#[derive(Debug, Deserialize)]
struct NameQuery {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SetConfigRequest {
    password: String,
    #[serde(flatten)]
    patch: ConfigPatch,
}

#[derive(Debug, Deserialize)]
struct RestartRequest {
    password: String,
    key: String,
}

/// Config snapshot returned by `GET /config`; the shared secret is withheld
#[derive(Debug, Serialize)]
struct ConfigView {
    callbacks: Vec<String>,
    tracked_properties: Vec<String>,
    devices: HashMap<String, DeviceOptions>,
    alarm_models: Vec<String>,
    audit_models: Vec<String>,
    meter_models: Vec<String>,
}

impl From<Settings> for ConfigView {
    fn from(settings: Settings) -> Self {
        Self {
            callbacks: settings.gateway.callbacks,
            tracked_properties: settings.gateway.tracked_properties,
            devices: settings.devices,
            alarm_models: settings.gateway.alarm_models,
            audit_models: settings.gateway.audit_models,
            meter_models: settings.gateway.meter_models,
        }
    }
}

/// All gateway routes
pub fn routes(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let devices = warp::path("devices")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<NameQuery>())
        .and(with_context(context.clone()))
        .map(handle_devices);

    let devices_by_name = warp::path("devices-by-name")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<NameQuery>())
        .and(with_context(context.clone()))
        .map(handle_devices_by_name);

    let mute_all_sirens = warp::path("mute-all-sirens")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(context.clone()))
        .map(handle_mute_all_sirens);

    let get_config = warp::path("config")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(context.clone()))
        .map(handle_get_config);

    let set_config = warp::path("config")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_context(context.clone()))
        .map(handle_set_config);

    let restart = warp::path("restart")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_context(context.clone()))
        .map(handle_restart);

    let device = warp::path("device")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_context(context))
        .map(handle_device);

    devices
        .or(devices_by_name)
        .or(mute_all_sirens)
        .or(get_config)
        .or(set_config)
        .or(restart)
        .or(device)
}

/// Serve the routes until the process exits
pub async fn run(context: GatewayContext, addr: SocketAddr) {
    tracing::info!(%addr, "Gateway API listening");
    warp::serve(routes(context)).run(addr).await;
}

fn with_context(
    context: GatewayContext,
) -> impl Filter<Extract = (GatewayContext,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || context.clone())
}

fn meter_models(context: &GatewayContext) -> Vec<String> {
    context
        .config
        .get()
        .map(|settings| settings.gateway.meter_models)
        .unwrap_or_default()
}

fn handle_devices(query: NameQuery, context: GatewayContext) -> warp::reply::Json {
    let summaries: Vec<DeviceSummary> = device_summaries(
        context.registry.as_ref(),
        &context.availability,
        &meter_models(&context),
        &query.name,
    );
    warp::reply::json(&summaries)
}

fn handle_devices_by_name(query: NameQuery, context: GatewayContext) -> warp::reply::Json {
    let mapping = energy_by_name(
        context.registry.as_ref(),
        &context.availability,
        &meter_models(&context),
        &query.name,
    );
    warp::reply::json(&mapping)
}

fn handle_mute_all_sirens(context: GatewayContext) -> &'static str {
    let alarm_models = context
        .config
        .get()
        .map(|settings| settings.gateway.alarm_models)
        .unwrap_or_default();

    match context.registry.devices() {
        Ok(devices) => {
            for device in devices {
                if alarm_models.contains(&device.model) {
                    context.bus.publish_command(CommandEvent {
                        topic: format!("{}/{}/set", mesh_notify::TOPIC_NAMESPACE, device.name),
                        message: serde_json::json!({"alarm": "OFF"}).to_string(),
                    });
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Device enumeration failed while muting sirens");
        }
    }
    "OK"
}

fn handle_get_config(context: GatewayContext) -> warp::reply::WithStatus<warp::reply::Json> {
    match context.config.get() {
        Ok(settings) => warp::reply::with_status(
            warp::reply::json(&ConfigView::from(settings)),
            StatusCode::OK,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Settings read failed");
            warp::reply::with_status(
                warp::reply::json(&Value::Null),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

fn handle_set_config(
    request: SetConfigRequest,
    context: GatewayContext,
) -> warp::reply::WithStatus<String> {
    match context.config.set(&request.password, &request.patch) {
        Ok(SetOutcome::Applied) => warp::reply::with_status("OK".to_string(), StatusCode::OK),
        Ok(SetOutcome::Rejected) => {
            warp::reply::with_status("Invalid credential!".to_string(), StatusCode::OK)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Settings write failed");
            warp::reply::with_status(
                "Internal error".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

fn handle_restart(
    request: RestartRequest,
    context: GatewayContext,
) -> warp::reply::WithStatus<String> {
    let token = match context.config.get() {
        Ok(settings) => settings.gateway.auth_token,
        Err(e) => {
            tracing::warn!(error = %e, "Settings read failed");
            return warp::reply::with_status(
                "Internal error".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            );
        }
    };

    if request.password != token {
        return warp::reply::with_status("Invalid credential!".to_string(), StatusCode::OK);
    }

    let process = context.process.clone();
    let key = request.key;
    tokio::spawn(async move {
        tokio::time::sleep(RESTART_DELAY).await;
        process.restart(&key);
    });
    warp::reply::with_status("Restart in 1 sec".to_string(), StatusCode::OK)
}

fn handle_device(body: Value, context: GatewayContext) -> warp::reply::WithStatus<String> {
    let Some(topic) = body["topic"].as_str().filter(|t| !t.is_empty()) else {
        return warp::reply::with_status(
            "Missing topic".to_string(),
            StatusCode::BAD_REQUEST,
        );
    };

    let tracked = context.config.tracked_properties().unwrap_or_default();

    // Tracked extras found in the request body win over the supplied payload
    let mut merged = body["payload"].as_object().cloned().unwrap_or_default();
    for property in &tracked {
        if let Some(value) = body.get(property) {
            merged.insert(property.clone(), value.clone());
        }
    }

    context.bus.publish_command(CommandEvent {
        topic: topic.to_string(),
        message: Value::Object(merged).to_string(),
    });
    warp::reply::with_status("OK".to_string(), StatusCode::OK)
}
