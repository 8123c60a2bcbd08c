//! Device identity, registry access, and event plumbing for meshgw.
//!
//! This crate defines the boundary between the gateway core and the mesh
//! transport driver:
//!
//! - [`DeviceAddress`] / [`DeviceInfo`]: stable identity and metadata for a
//!   node on the mesh.
//! - [`DeviceRegistry`]: the read-side contract the driver implements
//!   (enumeration, lookup, raw cluster attribute reads).
//! - [`EventBus`]: broadcast channels carrying lifecycle/state events from
//!   the driver into the gateway, and command events back out.
//!
//! The crate ships a [`MemoryRegistry`] used by tests and the demo binary;
//! production deployments plug the real driver in behind the same trait.

pub mod device;
pub mod error;
pub mod events;
pub mod registry;

pub use device::{DeviceAddress, DeviceInfo, MeshRole, PowerSource};
pub use error::{RegistryError, Result};
pub use events::{CommandEvent, EventBus, GatewayEvent, StateEvent};
pub use registry::{DeviceRegistry, MemoryRegistry};
