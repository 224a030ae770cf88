//! Property objects and the default property template.

use once_cell::sync::Lazy;
use serde_json::{json, Value as JsonValue};

use crate::keys;
use crate::mode::{Mode, ModeTable};

/// Ordered, permissive property object. Unknown keys are carried along untouched.
pub type Props = serde_json::Map<String, JsonValue>;

/// Process-wide default properties. Never mutated; each action copies it on construction.
pub static DEFAULT_PROPS: Lazy<Props> = Lazy::new(|| {
    let mut props = Props::new();
    props.insert(keys::DURATION.into(), json!(400));
    props.insert(keys::DELAY.into(), json!(0));
    props.insert(keys::EASE.into(), json!("easeInOut"));
    props.insert(keys::AMP.into(), json!(1));
    props.insert(keys::FRICTION.into(), json!(0));
    props.insert(keys::LOOP.into(), json!(false));
    props.insert(keys::LOOP_COUNT.into(), json!(0));
    props.insert(keys::YOYO.into(), json!(false));
    props.insert(keys::YOYO_COUNT.into(), json!(0));
    props.insert(keys::PLAYLIST.into(), json!([]));
    props.insert(keys::PLAYHEAD.into(), json!(0));
    props.extend(ModeTable::lookup(Mode::Time));
    props
});

/// Repeat setting of `loop` / `yoyo`: `true` repeats forever, a number `N` repeats N times.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Repeat {
    Off,
    Times(f64),
    Forever,
}

impl Repeat {
    pub fn from_prop(value: Option<&JsonValue>) -> Self {
        match value {
            Some(JsonValue::Bool(true)) => Repeat::Forever,
            Some(JsonValue::Number(n)) => n.as_f64().map_or(Repeat::Off, Repeat::Times),
            _ => Repeat::Off,
        }
    }
}
