// src/state.rs
use std::sync::Arc;

use crate::services::relay::ChatRelay;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub relay: ChatRelay,
}

impl AppState {
    pub fn new(relay: ChatRelay) -> Self {
        Self { relay }
    }

    pub fn shared(relay: ChatRelay) -> SharedState {
        Arc::new(Self::new(relay))
    }
}
