//! HTTP surface and event wiring for meshgw.
//!
//! This crate is the thin outer shell over the gateway core: warp routes for
//! the REST endpoints, the device summary builder, the event loop that feeds
//! lifecycle/state events into the feedback store and the dispatcher, and
//! restart scheduling behind the [`ProcessController`] trait.
//!
//! # Architecture
//!
//! ```text
//! mesh driver ──EventBus──▶ wiring::run_event_loop
//!                             ├─ DeviceJoined/Left/Feedback ▶ FeedbackStore
//!                             └─ DeviceState ───────────────▶ Dispatcher ──▶ callbacks
//! HTTP client ──warp──▶ server::routes
//!                             ├─ summaries (registry + availability)
//!                             ├─ config surface
//!                             └─ command republish (EventBus)
//! ```

pub mod context;
pub mod error;
pub mod restart;
pub mod server;
pub mod summaries;
pub mod wiring;

pub use context::GatewayContext;
pub use error::{GatewayError, Result};
pub use restart::{NoopRestart, ProcessController, ShellRestart};
pub use summaries::DeviceSummary;
