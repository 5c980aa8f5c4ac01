//! Easing functions
//!
//! Maps linear progress (0.0 to 1.0) onto an eased progress. Curves can be
//! looked up by the short names timeline libraries use (`"power2.out"`,
//! `"sine.inOut"`, `"back.out(2)"`, `"none"`) as well as the CSS keywords
//! (`"ease"`, `"ease-in-out"`, …).

use std::f32::consts::PI;

/// Overshoot used by `back` curves when no amount is given
pub const DEFAULT_BACK_OVERSHOOT: f32 = 1.70158;

/// Easing curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    /// No easing (`"none"`, `"linear"`)
    Linear,
    /// CSS `ease`
    Ease,
    /// CSS `ease-in`
    EaseIn,
    /// CSS `ease-out`
    EaseOut,
    /// CSS `ease-in-out`
    EaseInOut,
    /// Polynomial ease-in; `PowerIn(2)` is `power2.in` (cubic)
    PowerIn(u8),
    /// Polynomial ease-out
    PowerOut(u8),
    /// Polynomial ease-in-out
    PowerInOut(u8),
    SineIn,
    SineOut,
    SineInOut,
    /// Anticipation with the given overshoot
    BackIn(f32),
    /// Overshoot past the end, then settle
    BackOut(f32),
    BackInOut(f32),
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    /// Custom cubic bezier with control points (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl Default for Easing {
    /// `power1.out`, the usual default for decorative tweens
    fn default() -> Self {
        Easing::PowerOut(1)
    }
}

impl Easing {
    /// Apply the curve to a progress value
    ///
    /// Input is clamped to 0..=1. Output may leave that range for overshooting
    /// curves such as `BackOut`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match *self {
            Easing::Linear => t,
            Easing::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::PowerIn(n) => t.powi(exponent(n)),
            Easing::PowerOut(n) => 1.0 - (1.0 - t).powi(exponent(n)),
            Easing::PowerInOut(n) => {
                let p = exponent(n);
                if t < 0.5 {
                    0.5 * (2.0 * t).powi(p)
                } else {
                    1.0 - 0.5 * (2.0 * (1.0 - t)).powi(p)
                }
            }
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackIn(s) => {
                let c3 = s + 1.0;
                c3 * t * t * t - s * t * t
            }
            Easing::BackOut(s) => {
                let c3 = s + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + s * u * u
            }
            Easing::BackInOut(s) => {
                let c2 = s * 1.525;
                if t < 0.5 {
                    let u = 2.0 * t;
                    (u * u * ((c2 + 1.0) * u - c2)) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    (u * u * ((c2 + 1.0) * u + c2) + 2.0) / 2.0
                }
            }
            Easing::ExpoIn => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * t - 10.0)
                }
            }
            Easing::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::ExpoInOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }

    /// Look up a curve by name
    ///
    /// Returns `None` for names that are not recognised.
    pub fn from_name(name: &str) -> Option<Easing> {
        let name = name.trim();
        let (base, param) = split_param(name)?;
        let lower = base.to_ascii_lowercase();

        match lower.as_str() {
            "none" | "linear" | "power0" | "power0.in" | "power0.out" | "power0.inout" => {
                return Some(Easing::Linear)
            }
            "ease" => return Some(Easing::Ease),
            "ease-in" => return Some(Easing::EaseIn),
            "ease-out" => return Some(Easing::EaseOut),
            "ease-in-out" => return Some(Easing::EaseInOut),
            _ => {}
        }

        let (family, direction) = match lower.split_once('.') {
            Some((family, direction)) => (family, direction),
            None => (lower.as_str(), "out"),
        };

        let power = match family {
            "power1" | "quad" => Some(1),
            "power2" | "cubic" => Some(2),
            "power3" | "quart" => Some(3),
            "power4" | "quint" | "strong" => Some(4),
            _ => None,
        };

        if let Some(n) = power {
            return match direction {
                "in" => Some(Easing::PowerIn(n)),
                "out" => Some(Easing::PowerOut(n)),
                "inout" => Some(Easing::PowerInOut(n)),
                _ => None,
            };
        }

        match (family, direction) {
            ("sine", "in") => Some(Easing::SineIn),
            ("sine", "out") => Some(Easing::SineOut),
            ("sine", "inout") => Some(Easing::SineInOut),
            ("expo", "in") => Some(Easing::ExpoIn),
            ("expo", "out") => Some(Easing::ExpoOut),
            ("expo", "inout") => Some(Easing::ExpoInOut),
            ("back", dir) => {
                let s = param.unwrap_or(DEFAULT_BACK_OVERSHOOT);
                match dir {
                    "in" => Some(Easing::BackIn(s)),
                    "out" => Some(Easing::BackOut(s)),
                    "inout" => Some(Easing::BackInOut(s)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Look up a curve by name, falling back to the default curve
    pub fn resolve(name: &str) -> Easing {
        Easing::from_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown easing '{}', using power1.out", name);
            Easing::default()
        })
    }
}

/// Power curves: power1 is quadratic, power4 is quintic
fn exponent(n: u8) -> i32 {
    i32::from(n.min(8)) + 1
}

/// Split `back.out(2)` into `("back.out", Some(2.0))`
fn split_param(name: &str) -> Option<(&str, Option<f32>)> {
    match name.find('(') {
        None => Some((name, None)),
        Some(open) => {
            let close = name.rfind(')')?;
            if close < open {
                return None;
            }
            let inner = name[open + 1..close].trim();
            let param = if inner.is_empty() {
                None
            } else {
                Some(inner.parse::<f32>().ok().filter(|v| v.is_finite())?)
            };
            Some((&name[..open], param))
        }
    }
}

/// Evaluate a CSS-style cubic bezier timing curve at progress `t`
///
/// Solves x(s) = t for the curve parameter with Newton iterations, falling
/// back to bisection when the slope is too flat.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    // Polynomial coefficients for one axis
    let coeffs = |p1: f32, p2: f32| {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    };
    let (ax, bx, cx) = coeffs(x1, x2);
    let (ay, by, cy) = coeffs(y1, y2);

    let sample_x = |s: f32| ((ax * s + bx) * s + cx) * s;
    let sample_y = |s: f32| ((ay * s + by) * s + cy) * s;
    let slope_x = |s: f32| (3.0 * ax * s + 2.0 * bx) * s + cx;

    let mut s = t;
    for _ in 0..8 {
        let err = sample_x(s) - t;
        if err.abs() < 1e-6 {
            return sample_y(s);
        }
        let d = slope_x(s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = t;
    for _ in 0..32 {
        let x = sample_x(s);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }

    sample_y(s)
}
