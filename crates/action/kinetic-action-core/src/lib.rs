//! Kinetic Action Core (engine-agnostic)
//!
//! An [`Action`] drives named numeric values from an origin to a target over
//! time, until they come to rest, or in response to tracked input. Passes are
//! sequenced by looping, reversing ("yoyo") and playlists of presets.
//!
//! Hosts own a [`FrameScheduler`] and tick it once per display refresh; each
//! action registers a callback with it and the [`processor`] interprets the
//! action's current mode every frame.

pub mod action;
pub mod config;
pub mod ease;
pub mod error;
pub mod events;
pub mod input;
pub mod keys;
pub mod mode;
pub mod preset;
pub mod processor;
pub mod props;
pub mod scheduler;
pub mod store;
pub mod value;

// Re-exports for consumers (hosts)
pub use action::{Action, SharedAction, TrackConfig};
pub use config::Config;
pub use ease::Ease;
pub use error::ActionError;
pub use events::ActionEvent;
pub use input::{InputTracker, Point};
pub use mode::{Calc, Completion, Mode, ModeDescriptor, ModeTable, ProgressSource};
pub use preset::{Definition, PresetLibrary, PresetResolver};
pub use props::{Props, Repeat, DEFAULT_PROPS};
pub use scheduler::{FrameScheduler, ProcessId, Registration};
pub use store::KeyedStore;
pub use value::AnimatableValue;

/// Result alias for fallible action operations.
pub type Result<T> = core::result::Result<T, ActionError>;
