use std::sync::Arc;
use crate::config::{LimitScope, LimiterConfig};
use crate::registry::ClientRegistry;
// app's shared state

pub struct AppState {
    pub registry: Arc<ClientRegistry>, // identity -> bucket, shared with the sweeper
    pub scope: LimitScope,
}

impl AppState {
    pub fn new(config: &LimiterConfig) -> Self {
        Self {
            registry: Arc::new(ClientRegistry::from_config(config)),
            scope: config.scope,
        }
    }
}
