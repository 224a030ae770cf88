//! Action: the stateful controller driving one entity's progress and values.
//!
//! An action owns three keyed stores (`props`, `values`, `data`), its
//! scheduler registration, and the continuation logic (loop, yoyo, playlist)
//! run when a pass completes. Processing modes are data: switching mode writes
//! a descriptor into `props` that the frame processor reads back.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::{json, Value as JsonValue};

use crate::error::ActionError;
use crate::events::ActionEvent;
use crate::input::InputTracker;
use crate::keys;
use crate::mode::{Mode, ModeDescriptor, ModeTable};
use crate::preset::{Definition, PresetResolver};
use crate::processor;
use crate::props::{Props, Repeat, DEFAULT_PROPS};
use crate::scheduler::{FrameScheduler, ProcessId, Registration};
use crate::store::KeyedStore;
use crate::value::AnimatableValue;
use crate::Result;

/// Shared handle to an action; the scheduler only keeps a `Weak` to it.
pub type SharedAction = Rc<RefCell<Action>>;

/// Arguments of [`Action::track`]. The input source is mandatory.
#[derive(Clone, Debug)]
pub struct TrackConfig {
    pub definition: Option<Definition>,
    pub override_props: Option<Props>,
    pub input: InputTracker,
}

impl TrackConfig {
    pub fn new(input: impl Into<InputTracker>) -> Self {
        Self {
            definition: None,
            override_props: None,
            input: input.into(),
        }
    }

    pub fn definition(mut self, defs: impl Into<Definition>) -> Self {
        self.definition = Some(defs.into());
        self
    }

    pub fn override_props(mut self, props: Props) -> Self {
        self.override_props = Some(props);
        self
    }
}

pub struct Action {
    /// Fraction of the current pass, nominally `[0, 1]`.
    pub progress: f64,
    /// Milliseconds since the pass (re)started. Negative after some reversals.
    pub elapsed: f64,
    pub started: f64,
    pub framestamp: f64,
    pub first_frame: bool,
    active: bool,
    origin: IndexMap<String, f64>,
    pub(crate) props: KeyedStore<JsonValue>,
    pub(crate) values: KeyedStore<AnimatableValue>,
    data: KeyedStore<JsonValue>,
    pub(crate) input: Option<InputTracker>,
    presets: Rc<dyn PresetResolver>,
    events: VecDeque<ActionEvent>,
    max_pending_events: usize,
    process: Registration,
}

impl Action {
    /// Create an idle action registered (but not started) with `scheduler`.
    pub fn new(scheduler: &FrameScheduler, presets: Rc<dyn PresetResolver>) -> SharedAction {
        let now = scheduler.now();
        let max_pending_events = scheduler.config().max_pending_events;
        Rc::new_cyclic(|me: &Weak<RefCell<Action>>| {
            let me = me.clone();
            let process = scheduler.register(move |framestamp, frame_duration| {
                let Some(action) = me.upgrade() else {
                    return;
                };
                let Ok(mut action) = action.try_borrow_mut() else {
                    log::warn!("action busy during frame dispatch; frame skipped");
                    return;
                };
                // A stale dispatch after stop() must not touch state.
                if action.active {
                    processor::update(&mut action, framestamp, frame_duration);
                }
            });
            RefCell::new(Action {
                progress: 0.0,
                elapsed: 0.0,
                started: now,
                framestamp: now,
                first_frame: false,
                active: false,
                origin: IndexMap::new(),
                props: KeyedStore::with_defaults(DEFAULT_PROPS.iter()),
                values: KeyedStore::new(),
                data: KeyedStore::new(),
                input: None,
                presets,
                events: VecDeque::new(),
                max_pending_events,
                process,
            })
        })
    }

    /// Create an action and apply an initial definition.
    pub fn with_definition(
        scheduler: &FrameScheduler,
        presets: Rc<dyn PresetResolver>,
        defs: impl Into<Definition>,
        override_props: Option<Props>,
    ) -> Result<SharedAction> {
        let action = Self::new(scheduler, presets);
        {
            let mut inner = action.borrow_mut();
            inner.set(Some(defs.into()), override_props, None)?;
        }
        Ok(action)
    }

    // ---- lifecycle ----

    /// `set` then start in TIME mode: the configured duration ends the pass.
    pub fn play(
        &mut self,
        defs: impl Into<Definition>,
        override_props: Option<Props>,
    ) -> Result<&mut Self> {
        self.set(Some(defs.into()), override_props, None)?;
        Ok(self.start(Some(Mode::Time)))
    }

    /// `set` then start in RUN mode: the pass ends once every value is at rest.
    pub fn run(
        &mut self,
        defs: impl Into<Definition>,
        override_props: Option<Props>,
    ) -> Result<&mut Self> {
        self.set(Some(defs.into()), override_props, None)?;
        Ok(self.start(Some(Mode::Run)))
    }

    /// Attach an input source and start in INPUT mode.
    ///
    /// Without a definition the current properties are kept: an override is
    /// merged over them, otherwise only the input (and its origin) is attached.
    pub fn track(&mut self, config: TrackConfig) -> Result<&mut Self> {
        let TrackConfig {
            definition,
            override_props,
            input,
        } = config;
        match (definition, override_props) {
            (Some(defs), override_props) => {
                self.set(Some(defs), override_props, Some(input))?;
            }
            (None, Some(override_props)) => {
                self.set(Some(Definition::Props(override_props)), None, Some(input))?;
            }
            (None, None) => {
                let origin = serde_json::to_value(input.get())?;
                self.props.set(keys::INPUT_ORIGIN, origin);
                self.input = Some(input);
            }
        }
        Ok(self.start(Some(Mode::Input)))
    }

    /// Render one synchronous frame at a fixed `progress` in FIRE mode.
    ///
    /// Scheduler registration and the previous mode are left as they were.
    pub fn fire(&mut self, progress: Option<f64>) -> &mut Self {
        let previous = self.props.get(keys::MODE).cloned();
        if let Some(progress) = progress {
            self.progress = progress;
        }
        self.change_mode(Mode::Fire);
        if let Err(err) = processor::step(self, 0.0) {
            log::error!("fire failed ({}): {err}", err.category());
        }
        match previous {
            Some(mode) => {
                self.props.set(keys::MODE, mode);
            }
            None => {
                self.props.remove(keys::MODE);
            }
        }
        self
    }

    pub fn start(&mut self, mode: Option<Mode>) -> &mut Self {
        self.progress = 0.0;
        self.elapsed = 0.0;
        if let Some(mode) = mode {
            self.change_mode(mode);
        }
        let delay = self.props.number(keys::DELAY).unwrap_or(0.0).max(0.0);
        self.started = self.now() + delay;
        self.framestamp = self.started;
        self.first_frame = true;
        self.active = true;
        self.process.start();

        let mode = self.mode().mode;
        log::debug!("action {:?} started ({mode:?}, delay {delay}ms)", self.id());
        self.emit(ActionEvent::Started { mode });
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        self.active = false;
        self.process.stop();
        log::debug!("action {:?} stopped", self.id());
        self.emit(ActionEvent::Stopped);
        self
    }

    #[inline]
    pub fn pause(&mut self) -> &mut Self {
        self.stop()
    }

    /// Continue from the current progress; only the timestamps are re-stamped.
    pub fn resume(&mut self) -> &mut Self {
        self.started = self.now();
        self.framestamp = self.started;
        self.active = true;
        self.process.start();
        log::debug!("action {:?} resumed at {:.3}", self.id(), self.progress);
        self.emit(ActionEvent::Resumed);
        self
    }

    pub fn toggle(&mut self) -> &mut Self {
        if self.active {
            self.pause()
        } else {
            self.resume()
        }
    }

    /// Zero progress and elapsed, and return every value to its origin.
    pub fn reset(&mut self) -> &mut Self {
        self.progress = 0.0;
        self.elapsed = 0.0;
        self.started = self.now();
        for value in self.values.values_mut() {
            value.reset();
        }
        self
    }

    /// Flip progress and elapsed, and reverse every value in place. Not clamped.
    pub fn reverse(&mut self) -> &mut Self {
        let duration = self.props.number(keys::DURATION).unwrap_or(0.0);
        self.progress = 1.0 - self.progress;
        self.elapsed = duration - self.elapsed;
        for value in self.values.values_mut() {
            value.reverse();
        }
        self
    }

    // ---- continuation ----

    /// Pick the continuation for a completed pass: loop, then yoyo, then the
    /// playlist, otherwise stop.
    pub fn next(&mut self) -> Result<&mut Self> {
        if self.check_next_step(keys::LOOP, keys::LOOP_COUNT, Self::reset, |count| {
            ActionEvent::Looped { count }
        }) {
            return Ok(self);
        }
        if self.check_next_step(keys::YOYO, keys::YOYO_COUNT, Self::reverse, |count| {
            ActionEvent::Reversed { count }
        }) {
            return Ok(self);
        }
        if self.play_next()? {
            return Ok(self);
        }
        log::trace!("action {:?}: no continuation left", self.id());
        self.stop();
        self.emit(ActionEvent::Ended);
        Ok(self)
    }

    fn check_next_step(
        &mut self,
        key: &str,
        count_key: &str,
        step: fn(&mut Self) -> &mut Self,
        event: fn(u64) -> ActionEvent,
    ) -> bool {
        let repeat = Repeat::from_prop(self.props.get(key));
        if repeat == Repeat::Off {
            return false;
        }
        let count = self
            .props
            .number(count_key)
            .map_or(0, |c| c.max(0.0) as u64)
            + 1;
        self.props.set(count_key, json!(count));

        let taken = match repeat {
            Repeat::Forever => true,
            Repeat::Times(limit) => count as f64 <= limit,
            Repeat::Off => false,
        };
        log::trace!(
            "action {:?}: {key} #{count} {}",
            self.id(),
            if taken { "taken" } else { "exhausted" }
        );
        if taken {
            step(self);
            self.emit(event(count));
        }
        taken
    }

    /// Advance the playlist by one entry. Returns `false` when there is no
    /// playlist or the last entry has been played (no wrap).
    pub fn play_next(&mut self) -> Result<bool> {
        let Some(JsonValue::Array(playlist)) = self.props.get(keys::PLAYLIST) else {
            return Ok(false);
        };
        if playlist.len() <= 1 {
            return Ok(false);
        }
        let playhead = self
            .props
            .number(keys::PLAYHEAD)
            .map_or(0, |p| p.max(0.0) as usize)
            + 1;
        let Some(entry) = playlist.get(playhead) else {
            return Ok(false);
        };
        let name = match entry.as_str() {
            Some(name) => name.to_owned(),
            None => {
                return Err(ActionError::InvalidPreset {
                    name: entry.to_string(),
                    reason: "playlist entries must be preset names".into(),
                })
            }
        };

        let mut next = self.presets.get_defined(&name)?;
        next.insert(keys::PLAYHEAD.into(), json!(playhead));
        self.set(Some(Definition::Props(next)), None, None)?;
        self.reset();

        log::debug!(
            "action {:?}: playlist advanced to {name} ({playhead})",
            self.id()
        );
        self.emit(ActionEvent::PlaylistAdvanced {
            playhead,
            preset: name,
        });
        Ok(true)
    }

    // ---- definition merge ----

    /// Merge a definition into the action. A `None` definition is a no-op.
    pub fn set(
        &mut self,
        defs: Option<Definition>,
        override_props: Option<Props>,
        input: Option<InputTracker>,
    ) -> Result<&mut Self> {
        let Some(defs) = defs else {
            return Ok(self);
        };
        let mut base = self.presets.create_base(&defs, override_props.as_ref())?;

        if let Some(input) = input {
            base.insert(
                keys::INPUT_ORIGIN.into(),
                serde_json::to_value(input.get())?,
            );
            self.input = Some(input);
        }
        if let Some(scope) = self.data.get(keys::SCOPE) {
            base.insert(keys::SCOPE.into(), scope.clone());
        }

        let incoming = match base.get(keys::VALUES) {
            Some(JsonValue::Object(values)) => Some(values.clone()),
            Some(other) => {
                log::warn!("ignoring non-object values definition {other}");
                None
            }
            None => None,
        };
        self.props.extend(base);

        if let Some(incoming) = incoming {
            // Sibling properties merged by this call are visible to every value.
            let context = self.props.snapshot();
            for (key, def) in &incoming {
                self.set_value(key, Some(def), Some(&context));
            }
        }

        if self.values.contains(keys::ANGLE) && self.values.contains(keys::DISTANCE) {
            for key in [keys::X, keys::Y] {
                if !self.values.contains(key) {
                    self.set_value(key, None, None);
                }
            }
        }

        self.origin = self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), value.current))
            .collect();
        Ok(self)
    }

    /// Update the value under `key` in place, creating it from defaults if absent.
    pub fn set_value(
        &mut self,
        key: &str,
        def: Option<&JsonValue>,
        inherit: Option<&Props>,
    ) -> &mut Self {
        match self.values.get_mut(key) {
            Some(value) => value.set(def, inherit),
            None => {
                let mut value = AnimatableValue::new();
                value.set(def, inherit);
                self.values.set(key, value);
            }
        }
        self
    }

    pub fn get_value(&self, key: &str) -> Option<&AnimatableValue> {
        self.values.get(key)
    }

    pub fn set_prop(&mut self, key: impl Into<String>, value: JsonValue) -> &mut Self {
        self.props.set(key, value);
        self
    }

    pub fn get_prop(&self, key: &str) -> Option<&JsonValue> {
        self.props.get(key)
    }

    /// Switch processing mode by merging its descriptor into `props`.
    pub fn change_mode(&mut self, mode: Mode) -> &mut Self {
        self.props.extend(ModeTable::lookup(mode));
        log::debug!("action {:?} mode -> {mode:?}", self.id());
        self
    }

    // ---- accessors ----

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn id(&self) -> ProcessId {
        self.process.id()
    }

    /// Descriptor of the current processing mode.
    pub fn mode(&self) -> ModeDescriptor {
        ModeDescriptor::from_prop(self.props.get(keys::MODE))
    }

    /// Per-value readings captured by the last `set`.
    pub fn origin(&self) -> &IndexMap<String, f64> {
        &self.origin
    }

    pub fn props(&self) -> &KeyedStore<JsonValue> {
        &self.props
    }

    pub fn values(&self) -> &KeyedStore<AnimatableValue> {
        &self.values
    }

    pub fn data(&self) -> &KeyedStore<JsonValue> {
        &self.data
    }

    /// Auxiliary host state; `scope` is injected into merged properties on `set`.
    pub fn data_mut(&mut self) -> &mut KeyedStore<JsonValue> {
        &mut self.data
    }

    pub fn input(&self) -> Option<&InputTracker> {
        self.input.as_ref()
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<ActionEvent> {
        self.events.drain(..).collect()
    }

    /// Scheduler clock, or the last framestamp once the scheduler is gone.
    pub(crate) fn now(&self) -> f64 {
        self.process.now().unwrap_or(self.framestamp)
    }

    fn emit(&mut self, event: ActionEvent) {
        if self.max_pending_events == 0 {
            return;
        }
        while self.events.len() >= self.max_pending_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id())
            .field("active", &self.active)
            .field("progress", &self.progress)
            .field("elapsed", &self.elapsed)
            .field("started", &self.started)
            .field("framestamp", &self.framestamp)
            .field("props", &self.props)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}
