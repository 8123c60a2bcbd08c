//! Notification dispatch for meshgw.
//!
//! Device state-change events are transformed into an outbound payload,
//! checked against the audit and alarm-suppression model sets, and fanned
//! out to callback targets as independent fire-and-forget HTTP POSTs. A
//! slow or failing consumer can never block the event source or a sibling
//! delivery; there are no retries and no delivery confirmation.
//!
//! Payload shaping and routing live in [`payload`] as pure functions so the
//! suppression and routing rules are testable without a network.

pub mod dispatcher;
pub mod error;
pub mod payload;

pub use dispatcher::Dispatcher;
pub use error::{NotifyError, Result};
pub use payload::{plan, AuditRecord, DeliveryPlan, CALLBACK_PATH, TOPIC_NAMESPACE};
