//! Animatable value types
//!
//! Provides the values an element property can hold and the linear
//! interpolation the sequencer uses between a captured start value and a
//! resolved end value.

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// Color
// ============================================================================

/// RGBA color with components in the 0.0 to 1.0 range
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Create an opaque color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

        match digits.len() {
            3 => {
                let mut out = [0.0; 3];
                for (slot, ch) in out.iter_mut().zip(digits.chars()) {
                    let v = ch.to_digit(16)? as f32;
                    *slot = (v * 16.0 + v) / 255.0;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => Some(Self::rgba(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => None,
        }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Color::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

// ============================================================================
// Property Values
// ============================================================================

/// A value held by an element property
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimValue {
    Float(f32),
    Color(Color),
}

impl AnimValue {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            AnimValue::Float(v) => Some(*v),
            AnimValue::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            AnimValue::Color(c) => Some(*c),
            AnimValue::Float(_) => None,
        }
    }

    /// Whether both values are the same variant
    pub fn same_kind(&self, other: &AnimValue) -> bool {
        matches!(
            (self, other),
            (AnimValue::Float(_), AnimValue::Float(_)) | (AnimValue::Color(_), AnimValue::Color(_))
        )
    }

    /// Resting value for a property the element never had
    ///
    /// Scale and opacity rest at 1, every other float at 0. Colors rest
    /// transparent.
    pub fn default_for(property: &str, like: &AnimValue) -> AnimValue {
        match like {
            AnimValue::Color(_) => AnimValue::Color(Color::TRANSPARENT),
            AnimValue::Float(_) => match property {
                "opacity" | "scale" | "scaleX" | "scaleY" => AnimValue::Float(1.0),
                _ => AnimValue::Float(0.0),
            },
        }
    }
}

impl From<f32> for AnimValue {
    fn from(value: f32) -> Self {
        AnimValue::Float(value)
    }
}

impl From<f64> for AnimValue {
    fn from(value: f64) -> Self {
        AnimValue::Float(value as f32)
    }
}

impl From<Color> for AnimValue {
    fn from(value: Color) -> Self {
        AnimValue::Color(value)
    }
}

impl Interpolate for AnimValue {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        match (self, other) {
            (AnimValue::Float(a), AnimValue::Float(b)) => AnimValue::Float(a.lerp(b, t)),
            (AnimValue::Color(a), AnimValue::Color(b)) => AnimValue::Color(a.lerp(b, t)),
            // Mismatched kinds cannot blend; hold the start until the end lands
            _ if t >= 1.0 => *other,
            _ => *self,
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        match (self, other) {
            (AnimValue::Float(a), AnimValue::Float(b)) => a.approx_eq(b, epsilon),
            (AnimValue::Color(a), AnimValue::Color(b)) => a.approx_eq(b, epsilon),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_color_interpolation() {
        let a = Color::rgb(0.0, 0.0, 0.0);
        let b = Color::rgb(1.0, 0.5, 0.25);
        let mid = a.lerp(&b, 0.5);

        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.25).abs() < 1e-6);
        assert!((mid.b - 0.125).abs() < 1e-6);
        assert!((mid.a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_hex() {
        let blue = Color::parse_hex("#3b82f6").unwrap();
        assert!(blue.approx_eq(&Color::from_hex(0x3b82f6), 1e-6));

        let short = Color::parse_hex("#fff").unwrap();
        assert!(short.approx_eq(&Color::WHITE, 1e-6));

        let translucent = Color::parse_hex("#00000080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);

        assert!(Color::parse_hex("3b82f6").is_none());
        assert!(Color::parse_hex("#12345").is_none());
        assert!(Color::parse_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_mismatched_kinds_snap_at_end() {
        let start = AnimValue::Float(0.0);
        let end = AnimValue::Color(Color::WHITE);

        assert_eq!(start.lerp(&end, 0.5), start);
        assert_eq!(start.lerp(&end, 1.0), end);
    }

    #[test]
    fn test_resting_defaults() {
        let float = AnimValue::Float(0.0);
        assert_eq!(AnimValue::default_for("opacity", &float), AnimValue::Float(1.0));
        assert_eq!(AnimValue::default_for("scale", &float), AnimValue::Float(1.0));
        assert_eq!(AnimValue::default_for("x", &float), AnimValue::Float(0.0));

        let color = AnimValue::Color(Color::WHITE);
        assert_eq!(
            AnimValue::default_for("color", &color),
            AnimValue::Color(Color::TRANSPARENT)
        );
    }
}
