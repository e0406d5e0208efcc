// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blend curves: named easing functions between keyframes.
//!
//! The curve set matches what the game's replay API accepts: `linear`,
//! `snap`, the two smoothstep variants, and the standard easing family
//! (see <https://easings.net>) in in/out/in-out forms.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

/// A named easing curve mapping a normalized time fraction to an eased
/// fraction. `EaseOut`/`EaseInOut` elastic and back curves overshoot
/// `[0, 1]` by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)] // Variant names mirror the wire names one to one.
pub enum BlendCurve {
    #[default]
    Linear,
    Snap,
    SmoothStep,
    SmootherStep,
    QuadraticEaseIn,
    QuadraticEaseOut,
    QuadraticEaseInOut,
    CubicEaseIn,
    CubicEaseOut,
    CubicEaseInOut,
    QuarticEaseIn,
    QuarticEaseOut,
    QuarticEaseInOut,
    QuinticEaseIn,
    QuinticEaseOut,
    QuinticEaseInOut,
    SineEaseIn,
    SineEaseOut,
    SineEaseInOut,
    CircularEaseIn,
    CircularEaseOut,
    CircularEaseInOut,
    ExponentialEaseIn,
    ExponentialEaseOut,
    ExponentialEaseInOut,
    ElasticEaseIn,
    ElasticEaseOut,
    ElasticEaseInOut,
    BackEaseIn,
    BackEaseOut,
    BackEaseInOut,
    BounceEaseIn,
    BounceEaseOut,
    BounceEaseInOut,
}

impl BlendCurve {
    /// Every curve, in the order the presentation layer lists them.
    pub const ALL: [BlendCurve; 34] = [
        Self::Linear,
        Self::Snap,
        Self::SmoothStep,
        Self::SmootherStep,
        Self::QuadraticEaseIn,
        Self::QuadraticEaseOut,
        Self::QuadraticEaseInOut,
        Self::CubicEaseIn,
        Self::CubicEaseOut,
        Self::CubicEaseInOut,
        Self::QuarticEaseIn,
        Self::QuarticEaseOut,
        Self::QuarticEaseInOut,
        Self::QuinticEaseIn,
        Self::QuinticEaseOut,
        Self::QuinticEaseInOut,
        Self::SineEaseIn,
        Self::SineEaseOut,
        Self::SineEaseInOut,
        Self::CircularEaseIn,
        Self::CircularEaseOut,
        Self::CircularEaseInOut,
        Self::ExponentialEaseIn,
        Self::ExponentialEaseOut,
        Self::ExponentialEaseInOut,
        Self::ElasticEaseIn,
        Self::ElasticEaseOut,
        Self::ElasticEaseInOut,
        Self::BackEaseIn,
        Self::BackEaseOut,
        Self::BackEaseInOut,
        Self::BounceEaseIn,
        Self::BounceEaseOut,
        Self::BounceEaseInOut,
    ];

    /// The wire name stored in keyframes and sequence documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Snap => "snap",
            Self::SmoothStep => "smoothStep",
            Self::SmootherStep => "smootherStep",
            Self::QuadraticEaseIn => "quadraticEaseIn",
            Self::QuadraticEaseOut => "quadraticEaseOut",
            Self::QuadraticEaseInOut => "quadraticEaseInOut",
            Self::CubicEaseIn => "cubicEaseIn",
            Self::CubicEaseOut => "cubicEaseOut",
            Self::CubicEaseInOut => "cubicEaseInOut",
            Self::QuarticEaseIn => "quarticEaseIn",
            Self::QuarticEaseOut => "quarticEaseOut",
            Self::QuarticEaseInOut => "quarticEaseInOut",
            Self::QuinticEaseIn => "quinticEaseIn",
            Self::QuinticEaseOut => "quinticEaseOut",
            Self::QuinticEaseInOut => "quinticEaseInOut",
            Self::SineEaseIn => "sineEaseIn",
            Self::SineEaseOut => "sineEaseOut",
            Self::SineEaseInOut => "sineEaseInOut",
            Self::CircularEaseIn => "circularEaseIn",
            Self::CircularEaseOut => "circularEaseOut",
            Self::CircularEaseInOut => "circularEaseInOut",
            Self::ExponentialEaseIn => "exponentialEaseIn",
            Self::ExponentialEaseOut => "exponentialEaseOut",
            Self::ExponentialEaseInOut => "exponentialEaseInOut",
            Self::ElasticEaseIn => "elasticEaseIn",
            Self::ElasticEaseOut => "elasticEaseOut",
            Self::ElasticEaseInOut => "elasticEaseInOut",
            Self::BackEaseIn => "backEaseIn",
            Self::BackEaseOut => "backEaseOut",
            Self::BackEaseInOut => "backEaseInOut",
            Self::BounceEaseIn => "bounceEaseIn",
            Self::BounceEaseOut => "bounceEaseOut",
            Self::BounceEaseInOut => "bounceEaseInOut",
        }
    }

    /// Look up a curve by its wire name.
    pub fn from_name(name: &str) -> Option<BlendCurve> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Apply the curve to a normalized fraction `t` in `[0, 1]`.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::Snap => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::SmootherStep => t * t * t * (t * (6.0 * t - 15.0) + 10.0),
            Self::QuadraticEaseIn => t * t,
            Self::QuadraticEaseOut => t * (2.0 - t),
            Self::QuadraticEaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -2.0 * t * t + 4.0 * t - 1.0
                }
            }
            Self::CubicEaseIn => t * t * t,
            Self::CubicEaseOut => {
                let f = t - 1.0;
                f * f * f + 1.0
            }
            Self::CubicEaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = 2.0 * t - 2.0;
                    0.5 * f * f * f + 1.0
                }
            }
            Self::QuarticEaseIn => t * t * t * t,
            Self::QuarticEaseOut => {
                let f = t - 1.0;
                1.0 - f * f * f * f
            }
            Self::QuarticEaseInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let f = t - 1.0;
                    1.0 - 8.0 * f * f * f * f
                }
            }
            Self::QuinticEaseIn => t * t * t * t * t,
            Self::QuinticEaseOut => {
                let f = t - 1.0;
                f * f * f * f * f + 1.0
            }
            Self::QuinticEaseInOut => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    let f = 2.0 * t - 2.0;
                    0.5 * f * f * f * f * f + 1.0
                }
            }
            Self::SineEaseIn => 1.0 - (t * FRAC_PI_2).cos(),
            Self::SineEaseOut => (t * FRAC_PI_2).sin(),
            Self::SineEaseInOut => 0.5 * (1.0 - (t * PI).cos()),
            Self::CircularEaseIn => 1.0 - (1.0 - t * t).sqrt(),
            Self::CircularEaseOut => ((2.0 - t) * t).sqrt(),
            Self::CircularEaseInOut => {
                if t < 0.5 {
                    0.5 * (1.0 - (1.0 - 4.0 * t * t).sqrt())
                } else {
                    0.5 * ((-(2.0 * t - 3.0) * (2.0 * t - 1.0)).sqrt() + 1.0)
                }
            }
            Self::ExponentialEaseIn => {
                if t <= 0.0 {
                    0.0
                } else {
                    (10.0 * (t - 1.0)).exp2()
                }
            }
            Self::ExponentialEaseOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - (-10.0 * t).exp2()
                }
            }
            Self::ExponentialEaseInOut => {
                if t <= 0.0 || t >= 1.0 {
                    t.clamp(0.0, 1.0)
                } else if t < 0.5 {
                    0.5 * (20.0 * t - 10.0).exp2()
                } else {
                    1.0 - 0.5 * (-20.0 * t + 10.0).exp2()
                }
            }
            Self::ElasticEaseIn => (13.0 * FRAC_PI_2 * t).sin() * (10.0 * (t - 1.0)).exp2(),
            Self::ElasticEaseOut => (-13.0 * FRAC_PI_2 * (t + 1.0)).sin() * (-10.0 * t).exp2() + 1.0,
            Self::ElasticEaseInOut => {
                if t < 0.5 {
                    0.5 * (13.0 * FRAC_PI_2 * 2.0 * t).sin() * (10.0 * (2.0 * t - 1.0)).exp2()
                } else {
                    let f = 2.0 * t - 1.0;
                    0.5 * ((-13.0 * FRAC_PI_2 * (f + 1.0)).sin() * (-10.0 * f).exp2() + 2.0)
                }
            }
            Self::BackEaseIn => t * t * t - t * (t * PI).sin(),
            Self::BackEaseOut => {
                let f = 1.0 - t;
                1.0 - (f * f * f - f * (f * PI).sin())
            }
            Self::BackEaseInOut => {
                if t < 0.5 {
                    let f = 2.0 * t;
                    0.5 * (f * f * f - f * (f * PI).sin())
                } else {
                    let f = 1.0 - (2.0 * t - 1.0);
                    0.5 * (1.0 - (f * f * f - f * (f * PI).sin())) + 0.5
                }
            }
            Self::BounceEaseIn => 1.0 - bounce_out(1.0 - t),
            Self::BounceEaseOut => bounce_out(t),
            Self::BounceEaseInOut => {
                if t < 0.5 {
                    0.5 * (1.0 - bounce_out(1.0 - 2.0 * t))
                } else {
                    0.5 * bounce_out(2.0 * t - 1.0) + 0.5
                }
            }
        }
    }
}

impl fmt::Display for BlendCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Piecewise four-segment bounce, the building block of the bounce family.
fn bounce_out(t: f32) -> f32 {
    if t < 4.0 / 11.0 {
        (121.0 * t * t) / 16.0
    } else if t < 8.0 / 11.0 {
        (363.0 / 40.0) * t * t - (99.0 / 10.0) * t + 17.0 / 5.0
    } else if t < 9.0 / 10.0 {
        (4356.0 / 361.0) * t * t - (35442.0 / 1805.0) * t + 16061.0 / 1805.0
    } else {
        (54.0 / 5.0) * t * t - (513.0 / 25.0) * t + 268.0 / 25.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-4;

    #[test]
    fn test_name_round_trip() {
        for curve in BlendCurve::ALL {
            assert_eq!(BlendCurve::from_name(curve.name()), Some(curve));
        }
        assert_eq!(BlendCurve::from_name("wobble"), None);
    }

    #[test]
    fn test_endpoints() {
        // Every curve maps 0 -> 0 and 1 -> 1.
        for curve in BlendCurve::ALL {
            assert!(curve.apply(0.0).abs() < TOLERANCE, "{curve} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < TOLERANCE, "{curve} at 1");
        }
    }

    #[test]
    fn test_linear_is_identity() {
        assert_eq!(BlendCurve::Linear.apply(0.25), 0.25);
        assert_eq!(BlendCurve::Linear.apply(0.75), 0.75);
    }

    #[test]
    fn test_snap_holds_until_end() {
        assert_eq!(BlendCurve::Snap.apply(0.0), 0.0);
        assert_eq!(BlendCurve::Snap.apply(0.999), 0.0);
        assert_eq!(BlendCurve::Snap.apply(1.0), 1.0);
    }

    #[test]
    fn test_quadratic_midpoints() {
        assert!((BlendCurve::QuadraticEaseIn.apply(0.5) - 0.25).abs() < TOLERANCE);
        assert!((BlendCurve::QuadraticEaseOut.apply(0.5) - 0.75).abs() < TOLERANCE);
        assert!((BlendCurve::QuadraticEaseInOut.apply(0.5) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_smooth_step_midpoint() {
        assert!((BlendCurve::SmoothStep.apply(0.5) - 0.5).abs() < TOLERANCE);
        assert!((BlendCurve::SmootherStep.apply(0.5) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_in_out_symmetry() {
        // EaseInOut curves are point-symmetric around (0.5, 0.5).
        for curve in [
            BlendCurve::CubicEaseInOut,
            BlendCurve::QuarticEaseInOut,
            BlendCurve::SineEaseInOut,
            BlendCurve::CircularEaseInOut,
        ] {
            for t in [0.1_f32, 0.3, 0.45] {
                let lo = curve.apply(t);
                let hi = curve.apply(1.0 - t);
                assert!((lo + hi - 1.0).abs() < TOLERANCE, "{curve} at {t}");
            }
        }
    }

    #[test]
    fn test_bounce_out_monotone_segments_stay_in_range() {
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let v = BlendCurve::BounceEaseOut.apply(t);
            assert!((-TOLERANCE..=1.0 + TOLERANCE).contains(&v), "t={t} v={v}");
        }
    }
}
