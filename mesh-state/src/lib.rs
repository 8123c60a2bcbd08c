//! Per-device feedback tracking and availability evaluation for meshgw.
//!
//! [`FeedbackStore`] owns the latest feedback snapshot for every device on
//! the mesh: defaulting on join/resync, wholesale overwrite on qualifying
//! events, removal on leave, and a self-healing read projection that always
//! returns exactly the configured tracked-property set.
//!
//! [`AvailabilityEvaluator`] derives online/offline status from the driver's
//! last-seen timestamp and the per-device or role-based timeout policy. It
//! is pure and recomputed on every call.

pub mod availability;
pub mod error;
pub mod feedback;

pub use availability::AvailabilityEvaluator;
pub use error::{Result, StateError};
pub use feedback::{FeedbackRecord, FeedbackStore};
