//! Application state for the web layer.

use std::sync::Arc;

use crate::aggregate::Aggregator;
use crate::rtt::RttClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Lookups against the upstream API
    pub aggregator: Arc<Aggregator<RttClient>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(client: RttClient) -> Self {
        Self {
            aggregator: Arc::new(Aggregator::new(client)),
        }
    }
}
