//! Event bus between the mesh driver and the gateway core
//!
//! Two broadcast channels: inbound [`GatewayEvent`]s flow from the driver to
//! the gateway (lifecycle, feedback, state changes), outbound
//! [`CommandEvent`]s flow from the gateway back to the driver for
//! republication onto the mesh. Broadcast semantics let multiple consumers
//! observe the same stream without coordination.

use serde_json::Value;
use tokio::sync::broadcast;

use crate::device::DeviceAddress;

/// A device state-change event destined for the notification dispatcher
///
/// `callback_url` may be empty; a non-empty value overrides the configured
/// callback list for this one event. `payload` carries the raw event body,
/// including the device model under `device.model` and an optional nested
/// `system` object.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEvent {
    /// Topic suffix (namespaced by the dispatcher)
    pub topic: String,
    /// Per-event callback target override, empty for none
    pub callback_url: String,
    /// Raw event payload
    pub payload: Value,
}

/// Events consumed by the gateway core from the mesh driver
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// A device joined (or re-joined) the mesh
    DeviceJoined { address: DeviceAddress },
    /// A device left the mesh
    DeviceLeft { address: DeviceAddress, name: String },
    /// A feedback snapshot for one device, keyed by raw field name
    SystemFeedback { fields: serde_json::Map<String, Value> },
    /// A state change to relay to external callback consumers
    DeviceState(StateEvent),
}

/// An outbound command for the driver to publish onto the mesh
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEvent {
    /// Full topic, e.g. `meshgw/kitchen_siren/set`
    pub topic: String,
    /// Serialized JSON message body
    pub message: String,
}

/// Broadcast-backed event bus shared by the driver and the gateway
#[derive(Clone)]
pub struct EventBus {
    events_tx: broadcast::Sender<GatewayEvent>,
    commands_tx: broadcast::Sender<CommandEvent>,
}

impl EventBus {
    /// Create a bus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (events_tx, _) = broadcast::channel(capacity);
        let (commands_tx, _) = broadcast::channel(capacity);
        Self {
            events_tx,
            commands_tx,
        }
    }

    /// Publish an inbound event; dropped when nobody listens
    pub fn publish(&self, event: GatewayEvent) {
        if self.events_tx.send(event).is_err() {
            tracing::debug!("Event dropped, no subscribers");
        }
    }

    /// Subscribe to inbound events
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.events_tx.subscribe()
    }

    /// Publish an outbound command for the mesh driver
    pub fn publish_command(&self, command: CommandEvent) {
        if self.commands_tx.send(command).is_err() {
            tracing::debug!("Command dropped, no driver subscribed");
        }
    }

    /// Subscribe to outbound commands (driver side)
    pub fn subscribe_commands(&self) -> broadcast::Receiver<CommandEvent> {
        self.commands_tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}
