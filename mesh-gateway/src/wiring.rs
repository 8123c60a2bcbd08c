//! Event loop: feeds driver events into the store and the dispatcher
//!
//! One task consumes the bus and applies events in arrival order, which
//! keeps the feedback store single-writer. Dispatch itself only spawns
//! delivery tasks, so a slow callback consumer never backs up this loop.

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use mesh_registry::{DeviceAddress, GatewayEvent};

use crate::context::GatewayContext;
use crate::error::Result;

/// Synchronize the feedback store and start the event loop
pub async fn start(context: GatewayContext) -> Result<JoinHandle<()>> {
    context.feedback.sync(context.registry.as_ref())?;
    Ok(tokio::spawn(run_event_loop(context)))
}

/// Consume bus events until the bus closes
pub async fn run_event_loop(context: GatewayContext) {
    let mut events = context.bus.subscribe();
    tracing::info!("Gateway event loop started");

    loop {
        match events.recv().await {
            Ok(event) => handle_event(&context, event),
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Event loop lagged, events dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }

    tracing::info!("Gateway event loop stopped");
}

fn handle_event(context: &GatewayContext, event: GatewayEvent) {
    match event {
        GatewayEvent::DeviceJoined { address } => {
            if let Err(e) = context.feedback.on_device_joined(&address) {
                tracing::warn!(%address, error = %e, "Failed to default joined device");
            }
        }
        GatewayEvent::DeviceLeft { address, name } => {
            context.feedback.on_device_left(&address);
            tracing::debug!(%address, name, "Device left, record removed");
        }
        GatewayEvent::SystemFeedback { fields } => {
            let Some(address) = fields.get("ieeeAddr").and_then(|v| v.as_str()) else {
                tracing::warn!("Feedback event without ieeeAddr, ignored");
                return;
            };
            let address = DeviceAddress::new(address);
            if let Err(e) = context.feedback.on_state_event(&address, &fields) {
                tracing::warn!(%address, error = %e, "Failed to store feedback event");
            }
        }
        GatewayEvent::DeviceState(state) => {
            context.dispatcher.dispatch(&state);
        }
    }
}
