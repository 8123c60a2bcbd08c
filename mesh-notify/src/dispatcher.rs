//! The dispatcher: executes delivery plans as independent spawned POSTs

use std::time::Duration;

use serde_json::Value;

use mesh_config::ConfigService;
use mesh_registry::StateEvent;

use crate::error::Result;
use crate::payload::{plan, CALLBACK_PATH};

/// Per-request timeout so one hung consumer cannot stall its task forever
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Fans device state-change events out to callback consumers
///
/// Config is consulted per event, so callback and suppression changes apply
/// to the very next dispatch. Deliveries run as one spawned task per target
/// with independent failure containment; `dispatch` returns before any
/// delivery confirmation.
#[derive(Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    config: ConfigService,
}

impl Dispatcher {
    /// Create a dispatcher with a bounded HTTP client
    pub fn new(config: ConfigService) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    /// Dispatch one event: audit, suppress, fan out
    ///
    /// Must be called within a tokio runtime. Never blocks on delivery and
    /// never fails the caller; config read errors are logged and the event
    /// is dropped.
    pub fn dispatch(&self, event: &StateEvent) {
        let settings = match self.config.get() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping event: settings unavailable");
                return;
            }
        };

        let plan = plan(event, &settings.gateway);

        // Suppressed events are still audited
        if plan.audit_eligible {
            match serde_json::to_string(&plan.audit) {
                Ok(record) => tracing::info!(audit = %record, "Device event"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize audit record"),
            }
        }

        if plan.suppressed {
            tracing::debug!(topic = %plan.audit.topic, "Delivery suppressed for alarm-class model");
            return;
        }

        for target in plan.targets {
            let client = self.client.clone();
            let body = plan.body.clone();
            tokio::spawn(async move {
                deliver(client, &target, &body).await;
            });
        }
    }
}

/// One best-effort POST; failures are logged and swallowed
async fn deliver(client: reqwest::Client, target: &str, body: &Value) {
    let url = format!("{}{}", target, CALLBACK_PATH);
    match client.post(&url).json(body).send().await {
        Ok(response) => {
            tracing::debug!(url = %url, status = %response.status(), "Callback delivered");
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Callback delivery failed");
        }
    }
}
