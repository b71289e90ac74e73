//! RGBA colors used by the map layers.

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fill color of land polygons (`#eee`).
    pub const LAND: Color = Color::rgb(0xee, 0xee, 0xee);

    /// Stroke color of land and state borders (`#ddd`).
    pub const BORDER: Color = Color::rgb(0xdd, 0xdd, 0xdd);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();

        match s.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in s.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(Color::rgb(rgb[0], rgb[1], rgb[2]))
            }
            6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb` form, as written into SVG attributes.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hex_expands() {
        assert_eq!(Color::from_hex("#eee"), Some(Color::LAND));
        assert_eq!(Color::from_hex("#ddd"), Some(Color::BORDER));
    }

    #[test]
    fn test_hex_roundtrip() {
        let c = Color::rgb(252, 211, 127);
        assert_eq!(c.to_hex(), "#fcd37f");
        assert_eq!(Color::from_hex(&c.to_hex()), Some(c));
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }
}
