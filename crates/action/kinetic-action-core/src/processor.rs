//! Frame processor: interprets the mode descriptor stored on an action.
//!
//! Per frame: advance progress (clock-driven modes), recompute every value,
//! apply the derived `x`/`y` pair, follow input displacement into progress
//! (input-driven modes), then check completion and run the action's
//! continuation.

use crate::action::Action;
use crate::ease::{lerp, Ease};
use crate::input::Point;
use crate::keys;
use crate::mode::{Calc, Completion, ModeDescriptor, ProgressSource};
use crate::Result;

/// Smallest per-frame change still counted as motion by RUN completion.
pub const REST_THRESHOLD: f64 = 1e-4;

/// One scheduler frame. Nothing runs before `started` (delay); `framestamp`
/// is always recorded. A failing continuation is logged and stops the action.
pub fn update(action: &mut Action, framestamp: f64, frame_duration: f64) {
    if framestamp >= action.started {
        let dt = if action.first_frame {
            action.first_frame = false;
            frame_duration.min(framestamp - action.started)
        } else {
            frame_duration
        };
        if let Err(err) = step(action, dt) {
            log::error!(
                "action {:?}: continuation failed ({}): {err}",
                action.id(),
                err.category()
            );
            action.stop();
        }
    }
    action.framestamp = framestamp;
}

/// Advance by `dt` ms under the current mode and run completion.
pub(crate) fn step(action: &mut Action, dt: f64) -> Result<()> {
    let mode = action.mode();
    let duration = action.props.number(keys::DURATION).unwrap_or(0.0);

    if mode.progress == ProgressSource::Clock {
        action.elapsed += dt;
        action.progress = if duration > 0.0 {
            action.elapsed / duration
        } else {
            1.0
        };
    }

    let moved = calc_values(action, &mode, dt, duration);
    derive_pair(action);

    if mode.progress == ProgressSource::Input {
        if let Some(progress) = input_progress(action) {
            action.progress = progress;
        }
    }

    let complete = match mode.completion {
        Completion::Duration => action.progress >= 1.0,
        Completion::Rest => !moved,
        Completion::Never => false,
    };
    if complete {
        action.next()?;
    }
    Ok(())
}

/// Recompute every value; reports whether any reading moved.
fn calc_values(action: &mut Action, mode: &ModeDescriptor, dt: f64, duration: f64) -> bool {
    let pointer = action.input.as_ref().map(|input| input.current());
    let input_origin = action
        .props
        .get(keys::INPUT_ORIGIN)
        .and_then(|raw| serde_json::from_value::<Point>(raw.clone()).ok());
    let default_ease: Ease = action
        .props
        .get(keys::EASE)
        .and_then(|raw| serde_json::from_value(raw.clone()).ok())
        .unwrap_or_default();
    let (progress, elapsed) = (action.progress, action.elapsed);

    let mut moved = false;
    for (key, value) in action.values.iter_mut() {
        let next = match mode.calc {
            Calc::Tween => {
                let t = match mode.progress {
                    ProgressSource::Clock => {
                        let d = value.duration.unwrap_or(duration);
                        if d > 0.0 {
                            elapsed / d
                        } else {
                            1.0
                        }
                    }
                    _ => progress,
                };
                let eased = value.ease.unwrap_or(default_ease).apply(t.clamp(0.0, 1.0));
                lerp(value.from, value.to, eased)
            }
            Calc::Velocity => {
                value.velocity *= 1.0 - value.friction.clamp(0.0, 1.0);
                value.current + value.velocity * dt / 1000.0
            }
            Calc::Track => {
                let axis = value.link.as_deref().unwrap_or(key.as_str());
                match (
                    pointer.and_then(|p| p.axis(axis)),
                    input_origin.and_then(|p| p.axis(axis)),
                ) {
                    (Some(now), Some(origin)) => value.from + (now - origin) * value.amp,
                    _ => value.current,
                }
            }
        };

        let previous = value.current;
        value.current = next;
        if value.clamp() && mode.calc == Calc::Velocity {
            value.velocity = 0.0;
        }
        moved |= (value.current - previous).abs() > REST_THRESHOLD;
    }
    moved
}

/// Mean displacement of the ranged values along `from -> to`, unclamped.
/// Values with no range carry no progress; `None` when none has one.
fn input_progress(action: &Action) -> Option<f64> {
    let (sum, count) = action
        .values
        .iter()
        .filter(|(_, value)| (value.to - value.from).abs() > f64::EPSILON)
        .fold((0.0, 0usize), |(sum, count), (_, value)| {
            (sum + (value.current - value.from) / (value.to - value.from), count + 1)
        });
    (count > 0).then(|| sum / count as f64)
}

/// `x`/`y` follow `angle` (degrees) and `distance` when both are present.
fn derive_pair(action: &mut Action) {
    let (Some(angle), Some(distance)) = (
        action.values.get(keys::ANGLE).map(|v| v.current),
        action.values.get(keys::DISTANCE).map(|v| v.current),
    ) else {
        return;
    };
    let radians = angle.to_radians();
    if let Some(x) = action.values.get_mut(keys::X) {
        x.current = x.from + distance * radians.cos();
    }
    if let Some(y) = action.values.get_mut(keys::Y) {
        y.current = y.from + distance * radians.sin();
    }
}
