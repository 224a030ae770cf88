//! Core configuration for kinetic-action-core.

use serde::{Deserialize, Serialize};

/// Configuration for the frame scheduler and the actions registered with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound on the frame duration handed to callbacks (ms). Long stalls
    /// (backgrounded tab, debugger) are clamped to this value.
    pub max_frame_duration_ms: f64,
    /// Nominal frame step used by `FrameScheduler::frame()` on a manual clock.
    pub frame_interval_ms: f64,
    /// Maximum events retained per action before the oldest are dropped.
    pub max_pending_events: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_frame_duration_ms: 100.0,
            frame_interval_ms: 1000.0 / 60.0,
            max_pending_events: 256,
        }
    }
}
