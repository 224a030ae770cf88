//! Processing modes as data.
//!
//! A mode is not a type: switching mode writes a descriptor into the action's
//! properties and the frame updater reads it back every frame.

use serde::{Deserialize, Serialize};

use crate::keys;
use crate::props::Props;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Duration ends the pass.
    Time,
    /// Runs until every value comes to rest.
    Run,
    /// Progress follows the tracked input.
    Input,
    /// Renders at a fixed progress.
    Fire,
}

/// Where progress comes from each frame.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProgressSource {
    Clock,
    /// Displacement of the tracked values along their `from -> to` range.
    Input,
    Fixed,
}

/// How each value's reading is computed each frame.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Calc {
    Tween,
    Velocity,
    Track,
}

/// When the current pass is reported complete.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Completion {
    Duration,
    Rest,
    Never,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModeDescriptor {
    pub mode: Mode,
    pub progress: ProgressSource,
    pub calc: Calc,
    pub completion: Completion,
}

impl ModeDescriptor {
    /// Read a stored descriptor (the `mode` property), falling back to TIME.
    pub fn from_prop(raw: Option<&serde_json::Value>) -> Self {
        match raw {
            Some(raw) => ModeDescriptor::deserialize(raw).unwrap_or_else(|err| {
                log::warn!("unreadable mode descriptor ({err}); using TIME");
                ModeTable::descriptor(Mode::Time)
            }),
            None => ModeTable::descriptor(Mode::Time),
        }
    }
}

/// Static mode key -> descriptor mapping.
pub struct ModeTable;

impl ModeTable {
    pub const fn descriptor(mode: Mode) -> ModeDescriptor {
        match mode {
            Mode::Time => ModeDescriptor {
                mode,
                progress: ProgressSource::Clock,
                calc: Calc::Tween,
                completion: Completion::Duration,
            },
            Mode::Run => ModeDescriptor {
                mode,
                progress: ProgressSource::Clock,
                calc: Calc::Velocity,
                completion: Completion::Rest,
            },
            Mode::Input => ModeDescriptor {
                mode,
                progress: ProgressSource::Input,
                calc: Calc::Track,
                completion: Completion::Never,
            },
            Mode::Fire => ModeDescriptor {
                mode,
                progress: ProgressSource::Fixed,
                calc: Calc::Tween,
                completion: Completion::Never,
            },
        }
    }

    /// Partial property set that reconfigures an action for `mode`.
    pub fn lookup(mode: Mode) -> Props {
        let mut props = Props::new();
        let descriptor = serde_json::to_value(Self::descriptor(mode))
            .unwrap_or(serde_json::Value::Null);
        props.insert(keys::MODE.into(), descriptor);
        props
    }
}
