//! Animatable values: a reading plus the endpoints and baselines an action drives it through.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::ease::Ease;
use crate::keys;
use crate::props::Props;

/// One named animatable scalar.
///
/// `from`/`to` are the endpoints of the current pass and are swapped by
/// [`reverse`](Self::reverse). `origin`, `target` and the start velocity are
/// captured by [`set`](Self::set) and restored by [`reset`](Self::reset).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimatableValue {
    pub current: f64,
    pub from: f64,
    pub to: f64,
    /// Units per second, used by velocity calculation.
    pub velocity: f64,
    /// Fraction of velocity lost per frame.
    pub friction: f64,
    /// Multiplier applied to input deltas while tracking.
    pub amp: f64,
    pub duration: Option<f64>,
    pub ease: Option<Ease>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Input axis tracked by this value; defaults to the value's own key.
    pub link: Option<String>,
    /// Fields without a dedicated slot, kept as given.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, JsonValue>,

    origin: f64,
    target: f64,
    origin_velocity: f64,
    /// Inheritable fields given by a definition; context no longer overrides them.
    #[serde(skip)]
    pinned: HashSet<&'static str>,
}

impl AnimatableValue {
    /// A value built from the library defaults.
    pub fn new() -> Self {
        Self {
            amp: 1.0,
            ..Self::default()
        }
    }

    /// Apply a definition.
    ///
    /// Inheritable context fields are applied first so explicit fields win. A
    /// field once given explicitly keeps its own setting on later calls; the
    /// others follow the context again. A bare number sets `to`; an object sets
    /// fields by name (`from` and `current` both set the reading). The reading
    /// at the end becomes the new baseline for `reset`.
    pub fn set(&mut self, def: Option<&JsonValue>, inherit: Option<&Props>) {
        if let Some(context) = inherit {
            for key in keys::INHERITABLE {
                if self.pinned.contains(&key) {
                    continue;
                }
                if let Some(v) = context.get(key) {
                    self.assign(key, v);
                }
            }
        }

        match def {
            Some(JsonValue::Number(n)) => {
                if let Some(to) = n.as_f64() {
                    self.to = to;
                }
            }
            Some(JsonValue::Object(fields)) => {
                for (key, v) in fields {
                    self.assign(key, v);
                    let inheritable = keys::INHERITABLE.iter().find(|k| **k == key.as_str());
                    if let Some(pinned) = inheritable {
                        self.pinned.insert(*pinned);
                    }
                }
            }
            Some(JsonValue::Null) | None => {}
            Some(other) => log::warn!("ignoring non-numeric value definition {other}"),
        }

        self.from = self.current;
        self.origin = self.current;
        self.target = self.to;
        self.origin_velocity = self.velocity;
    }

    fn assign(&mut self, key: &str, v: &JsonValue) {
        let num = v.as_f64();
        match key {
            "current" | "from" => {
                if let Some(n) = num {
                    self.current = n;
                }
            }
            "to" => {
                if let Some(n) = num {
                    self.to = n;
                }
            }
            "velocity" => {
                if let Some(n) = num {
                    self.velocity = n;
                }
            }
            "friction" => {
                if let Some(n) = num {
                    self.friction = n;
                }
            }
            "amp" => {
                if let Some(n) = num {
                    self.amp = n;
                }
            }
            "duration" => self.duration = num.or(self.duration),
            "min" => self.min = num,
            "max" => self.max = num,
            "ease" => match Ease::deserialize(v) {
                Ok(ease) => self.ease = Some(ease),
                Err(err) => log::warn!("ignoring ease {v}: {err}"),
            },
            "link" => self.link = v.as_str().map(str::to_owned),
            _ => {
                self.extra.insert(key.to_owned(), v.clone());
            }
        }
    }

    /// Read a field by name; unknown names fall through to `extra`.
    pub fn get(&self, field: &str) -> Option<JsonValue> {
        match field {
            "current" => Some(json!(self.current)),
            "from" => Some(json!(self.from)),
            "to" => Some(json!(self.to)),
            "velocity" => Some(json!(self.velocity)),
            "friction" => Some(json!(self.friction)),
            "amp" => Some(json!(self.amp)),
            "origin" => Some(json!(self.origin)),
            "duration" => self.duration.map(|d| json!(d)),
            "min" => self.min.map(|m| json!(m)),
            "max" => self.max.map(|m| json!(m)),
            "ease" => self.ease.and_then(|e| serde_json::to_value(e).ok()),
            "link" => self.link.as_ref().map(|l| json!(l)),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Baseline reading captured by the last `set`.
    #[inline]
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Return the reading, endpoints and velocity to the baselines captured by `set`.
    pub fn reset(&mut self) {
        self.current = self.origin;
        self.from = self.origin;
        self.to = self.target;
        self.velocity = self.origin_velocity;
    }

    /// Swap the endpoints of the current pass in place.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Clamp `current` into `[min, max]`, reporting whether it moved.
    pub fn clamp(&mut self) -> bool {
        let mut clamped = self.current;
        if let Some(min) = self.min {
            clamped = clamped.max(min);
        }
        if let Some(max) = self.max {
            clamped = clamped.min(max);
        }
        let moved = clamped != self.current;
        self.current = clamped;
        moved
    }
}
