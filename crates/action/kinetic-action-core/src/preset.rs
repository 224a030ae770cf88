//! Preset resolution: turning a preset name, playlist or property object into merged base properties.

use hashbrown::HashMap;
use serde_json::{json, Value as JsonValue};

use crate::error::ActionError;
use crate::keys;
use crate::props::Props;
use crate::Result;

/// What an action is asked to become.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    /// A single preset name. Whitespace separated names form a playlist.
    Preset(String),
    /// Ordered preset names; the first is resolved immediately.
    Playlist(Vec<String>),
    /// Explicit properties, used as-is.
    Props(Props),
}

impl From<&str> for Definition {
    fn from(name: &str) -> Self {
        Definition::Preset(name.to_owned())
    }
}

impl From<String> for Definition {
    fn from(name: String) -> Self {
        Definition::Preset(name)
    }
}

impl From<Vec<String>> for Definition {
    fn from(names: Vec<String>) -> Self {
        Definition::Playlist(names)
    }
}

impl From<&[&str]> for Definition {
    fn from(names: &[&str]) -> Self {
        Definition::Playlist(names.iter().map(|n| (*n).to_owned()).collect())
    }
}

impl From<Props> for Definition {
    fn from(props: Props) -> Self {
        Definition::Props(props)
    }
}

/// Source of named presets.
pub trait PresetResolver {
    /// Resolve `defs` and merge `override_props` on top; override fields win.
    fn create_base(&self, defs: &Definition, override_props: Option<&Props>) -> Result<Props>;

    /// A copy of the named preset.
    fn get_defined(&self, name: &str) -> Result<Props>;
}

/// In-memory preset library keyed by name.
#[derive(Clone, Debug, Default)]
pub struct PresetLibrary {
    presets: HashMap<String, Props>,
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `{ "name": { ...props } }` document.
    pub fn from_json(text: &str) -> Result<Self> {
        let presets: HashMap<String, Props> = serde_json::from_str(text)?;
        Ok(Self { presets })
    }

    /// Register or replace a preset.
    pub fn insert(&mut self, name: impl Into<String>, props: Props) -> Option<Props> {
        self.presets.insert(name.into(), props)
    }

    pub fn with(mut self, name: impl Into<String>, props: Props) -> Self {
        self.insert(name, props);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    fn playlist_base<S: AsRef<str>>(&self, names: &[S]) -> Result<Props> {
        let first = names.first().ok_or(ActionError::EmptyPlaylist)?;
        let mut base = self.get_defined(first.as_ref())?;
        let playlist: Vec<JsonValue> = names.iter().map(|n| json!(n.as_ref())).collect();
        base.insert(keys::PLAYLIST.into(), JsonValue::Array(playlist));
        base.insert(keys::PLAYHEAD.into(), json!(0));
        Ok(base)
    }
}

impl PresetResolver for PresetLibrary {
    fn create_base(&self, defs: &Definition, override_props: Option<&Props>) -> Result<Props> {
        let mut base = match defs {
            Definition::Preset(name) => {
                let names: Vec<&str> = name.split_whitespace().collect();
                self.playlist_base(names.as_slice())?
            }
            Definition::Playlist(names) => self.playlist_base(names.as_slice())?,
            Definition::Props(props) => props.clone(),
        };
        if let Some(override_props) = override_props {
            merge_override(&mut base, override_props);
        }
        Ok(base)
    }

    fn get_defined(&self, name: &str) -> Result<Props> {
        self.presets
            .get(name)
            .cloned()
            .ok_or_else(|| ActionError::PresetNotFound {
                name: name.to_owned(),
            })
    }
}

/// Shallow merge of `over` into `base`, except `values`, which merges per key.
pub fn merge_override(base: &mut Props, over: &Props) {
    for (key, value) in over {
        if key == keys::VALUES {
            if let (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) =
                (base.get_mut(key), value)
            {
                for (k, v) in incoming {
                    existing.insert(k.clone(), v.clone());
                }
                continue;
            }
        }
        base.insert(key.clone(), value.clone());
    }
}
