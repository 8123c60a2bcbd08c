//! Outbound payload shaping, audit records, and routing rules
//!
//! All pure data transformation: given a state event and the gateway
//! settings, [`plan`] produces the wire body, the audit record, and the
//! delivery target list. The dispatcher only executes the plan.

use serde::Serialize;
use serde_json::{Map, Value};

use mesh_config::GatewaySettings;
use mesh_registry::StateEvent;

/// Namespace prefixed onto every outbound topic
pub const TOPIC_NAMESPACE: &str = "meshgw";

/// Fixed sub-path POSTed to on every callback target
pub const CALLBACK_PATH: &str = "/point_of_sales/deviceCallBackFn";

/// Structured audit record for one dispatched event
///
/// Never sent over the wire; serialized into the log when the device model
/// is in the audit-eligible set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    /// The per-event callback override (may be empty)
    pub callback: String,
    /// Namespaced topic
    pub topic: String,
    /// Event type tag from the payload
    #[serde(rename = "type")]
    pub event_type: Value,
    /// Control source field extracted from the payload
    #[serde(rename = "controlSource")]
    pub control_source: Value,
    /// The lifted `system` sub-object
    #[serde(rename = "userData")]
    pub user_data: Map<String, Value>,
}

/// Everything needed to execute one dispatch
#[derive(Debug, Clone)]
pub struct DeliveryPlan {
    /// Outbound JSON body
    pub body: Value,
    /// Audit record, always built
    pub audit: AuditRecord,
    /// Whether the audit record should be logged
    pub audit_eligible: bool,
    /// Whether delivery is suppressed (alarm-class model)
    pub suppressed: bool,
    /// Callback base URLs to POST to; empty when suppressed
    pub targets: Vec<String>,
}

/// Build the delivery plan for one state event
///
/// The outbound body prefixes the topic with [`TOPIC_NAMESPACE`], lifts
/// every key of the nested `system` sub-object to the top level, and strips
/// `system` from the inner payload. Routing: a non-empty per-event callback
/// URL overrides the configured callback list; alarm-class models get no
/// targets at all.
pub fn plan(event: &StateEvent, settings: &GatewaySettings) -> DeliveryPlan {
    let topic = format!("{}/{}", TOPIC_NAMESPACE, event.topic);
    let model = event.payload["device"]["model"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let system: Map<String, Value> = event.payload["system"]
        .as_object()
        .cloned()
        .unwrap_or_default();

    let mut inner = event.payload.as_object().cloned().unwrap_or_default();
    inner.remove("system");

    let mut body = Map::new();
    body.insert("topic".to_string(), Value::String(topic.clone()));
    body.insert("type".to_string(), event.payload["type"].clone());
    body.insert("payload".to_string(), Value::Object(inner.clone()));
    // System fields merge last, matching the original wire behavior
    for (key, value) in &system {
        body.insert(key.clone(), value.clone());
    }

    let audit = AuditRecord {
        callback: event.callback_url.clone(),
        topic,
        event_type: event.payload["type"].clone(),
        control_source: inner.get("controlSource").cloned().unwrap_or(Value::Null),
        user_data: system,
    };

    let audit_eligible = settings.audit_models.contains(&model);
    let suppressed = settings.alarm_models.contains(&model);

    let targets = if suppressed {
        Vec::new()
    } else if !event.callback_url.is_empty() {
        vec![event.callback_url.clone()]
    } else {
        settings.callbacks.clone()
    };

    DeliveryPlan {
        body: Value::Object(body),
        audit,
        audit_eligible,
        suppressed,
        targets,
    }
}
