//! Discrete lifecycle signals emitted by an action.
//!
//! Events are queued on the action and drained by the host; they never
//! influence the action's own state.

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum ActionEvent {
    Started {
        mode: Mode,
    },
    Stopped,
    Resumed,
    /// A loop continuation reset the pass; `count` is the updated `loopCount`.
    Looped {
        count: u64,
    },
    /// A yoyo continuation reversed the pass; `count` is the updated `yoyoCount`.
    Reversed {
        count: u64,
    },
    PlaylistAdvanced {
        playhead: usize,
        preset: String,
    },
    /// No continuation applied after a completed pass.
    Ended,
}
