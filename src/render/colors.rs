//! Color parsing utilities for grid rendering.
//!
//! Colors travel as CSS strings, which Canvas 2D accepts directly. Model
//! colors may arrive without a leading `#` or in the `#AARRGGBB` form used by
//! spreadsheet files, so they are normalized once before painting.

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS `rgba()` string with the given opacity.
    pub fn to_rgba(self, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// Normalize a model color for painting.
///
/// - "#RRGGBB" and "RRGGBB" become "#RRGGBB"
/// - "#AARRGGBB" becomes "#RRGGBB" when opaque, `rgba()` otherwise
/// - anything else (named colors, `rgb()`) passes through trimmed
pub fn normalize_color(s: &str) -> CssColor {
    let s = s.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);
    match hex.len() {
        6 => Rgb::from_hex(hex).map_or_else(|| s.to_string(), Rgb::to_hex),
        8 => parse_argb(hex).unwrap_or_else(|| s.to_string()),
        _ => s.to_string(),
    }
}

fn parse_argb(hex: &str) -> Option<CssColor> {
    let a = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let rgb = Rgb::from_hex(hex.get(2..8)?)?;
    if a == 255 {
        Some(rgb.to_hex())
    } else {
        Some(format!(
            "rgba({}, {}, {}, {:.2})",
            rgb.r,
            rgb.g,
            rgb.b,
            f64::from(a) / 255.0
        ))
    }
}

/// A translucent version of a hex color. Colors that are not plain hex are
/// returned unchanged.
pub fn with_alpha(color: &str, alpha: f64) -> CssColor {
    Rgb::from_hex(color).map_or_else(|| color.to_string(), |rgb| rgb.to_rgba(alpha))
}

/// Fixed colors used by the renderer.
pub mod palette {
    pub const WHITE: &str = "#FFFFFF";
    pub const BLACK: &str = "#000000";
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex_6() {
        assert_eq!(normalize_color("#ff0000"), "#FF0000");
        assert_eq!(normalize_color("FF0000"), "#FF0000");
    }

    #[test]
    fn test_normalize_hex_8() {
        assert_eq!(normalize_color("#FFFF0000"), "#FF0000");
        assert!(normalize_color("#80FF0000").starts_with("rgba(255, 0, 0,"));
    }

    #[test]
    fn test_named_colors_pass_through() {
        assert_eq!(normalize_color(" red "), "red");
        assert_eq!(normalize_color("rgb(1, 2, 3)"), "rgb(1, 2, 3)");
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha("#59B9BC", 0.1), "rgba(89, 185, 188, 0.1)");
        assert_eq!(with_alpha("red", 0.1), "red");
    }

    #[test]
    fn test_rgb_roundtrip() {
        let rgb = Rgb::from_hex("#3358B7").unwrap();
        assert_eq!(rgb, Rgb::new(0x33, 0x58, 0xB7));
        assert_eq!(rgb.to_hex(), "#3358B7");
    }
}
