//! Shared handles threaded through routes and the event loop

use std::sync::Arc;

use mesh_config::ConfigService;
use mesh_notify::Dispatcher;
use mesh_registry::{DeviceRegistry, EventBus};
use mesh_state::{AvailabilityEvaluator, FeedbackStore};

use crate::restart::ProcessController;

/// Everything a route handler or the event loop needs, cheaply cloneable
#[derive(Clone)]
pub struct GatewayContext {
    pub registry: Arc<dyn DeviceRegistry>,
    pub config: ConfigService,
    pub feedback: Arc<FeedbackStore>,
    pub availability: AvailabilityEvaluator,
    pub bus: EventBus,
    pub dispatcher: Dispatcher,
    pub process: Arc<dyn ProcessController>,
}

impl GatewayContext {
    /// Wire a context from its collaborators
    pub fn new(
        registry: Arc<dyn DeviceRegistry>,
        config: ConfigService,
        bus: EventBus,
        process: Arc<dyn ProcessController>,
    ) -> crate::Result<Self> {
        let feedback = Arc::new(FeedbackStore::new(config.clone()));
        let availability = AvailabilityEvaluator::new(config.clone());
        let dispatcher = Dispatcher::new(config.clone())?;
        Ok(Self {
            registry,
            config,
            feedback,
            availability,
            bus,
            dispatcher,
            process,
        })
    }
}
