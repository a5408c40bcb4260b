use std::sync::Arc;

use crate::services::PlaybackService;

/// Shared application state
///
/// Holds the one long-lived resource in the process: the issuer with its
/// injected provider handles. Constructed once at startup and cloned per
/// request; all contents are concurrency-safe by construction (no mutable
/// per-call state lives here).
#[derive(Clone)]
pub struct AppState {
    pub playback: Arc<PlaybackService>,
}

impl AppState {
    pub fn new(playback: PlaybackService) -> Self {
        Self {
            playback: Arc::new(playback),
        }
    }
}
