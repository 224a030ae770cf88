//! Property and value key names shared by the action, the preset library and the frame updater.

pub const DURATION: &str = "duration";
pub const DELAY: &str = "delay";
pub const EASE: &str = "ease";
pub const AMP: &str = "amp";
pub const FRICTION: &str = "friction";
pub const LOOP: &str = "loop";
pub const LOOP_COUNT: &str = "loopCount";
pub const YOYO: &str = "yoyo";
pub const YOYO_COUNT: &str = "yoyoCount";
pub const PLAYLIST: &str = "playlist";
pub const PLAYHEAD: &str = "playhead";
pub const MODE: &str = "mode";
pub const INPUT_ORIGIN: &str = "inputOrigin";
pub const SCOPE: &str = "scope";
pub const VALUES: &str = "values";

/// Context keys a value inherits from the merged properties on every `set`.
pub const INHERITABLE: [&str; 4] = [DURATION, EASE, AMP, FRICTION];

// Value keys with special handling.
pub const ANGLE: &str = "angle";
pub const DISTANCE: &str = "distance";
pub const X: &str = "x";
pub const Y: &str = "y";
