//! Easing curves applied to tween progress.

use serde::{Deserialize, Serialize};

const BACK_STRENGTH: f64 = 1.70158;

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    BackIn,
    BackOut,
}

impl Ease {
    /// Map linear progress `t` (expected in [0, 1]) onto the curve.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Ease::Linear => t,
            Ease::EaseIn => t * t,
            Ease::EaseOut => t * (2.0 - t),
            Ease::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Ease::BackIn => t * t * ((BACK_STRENGTH + 1.0) * t - BACK_STRENGTH),
            Ease::BackOut => {
                let u = t - 1.0;
                u * u * ((BACK_STRENGTH + 1.0) * u + BACK_STRENGTH) + 1.0
            }
        }
    }
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-9, "left={a} right={b}");
    }

    #[test]
    fn curves_hit_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::EaseIn,
            Ease::EaseOut,
            Ease::EaseInOut,
            Ease::BackIn,
            Ease::BackOut,
        ] {
            approx(ease.apply(0.0), 0.0);
            approx(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        approx(Ease::EaseInOut.apply(0.5), 0.5);
        approx(
            Ease::EaseInOut.apply(0.25),
            1.0 - Ease::EaseInOut.apply(0.75),
        );
    }

    #[test]
    fn parses_camel_case_names() {
        let ease: Ease = serde_json::from_value(serde_json::json!("backOut")).unwrap();
        assert_eq!(ease, Ease::BackOut);
        approx(lerp(10.0, 20.0, 0.25), 12.5);
    }
}
