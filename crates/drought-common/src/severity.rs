//! US Drought Monitor severity categories and their display colors.
//!
//! Shapefiles published by the Drought Monitor carry the category in a
//! numeric `DM` attribute: 0 (abnormally dry) through 4 (exceptional
//! drought). The color table is fixed; every output image uses it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Color;

/// Name of the attribute holding the severity category.
pub const SEVERITY_FIELD: &str = "DM";

/// A drought severity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Abnormally dry
    D0,
    /// Moderate drought
    D1,
    /// Severe drought
    D2,
    /// Extreme drought
    D3,
    /// Exceptional drought
    D4,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::D0,
        Severity::D1,
        Severity::D2,
        Severity::D3,
        Severity::D4,
    ];

    /// Look up a category code. Anything outside 0..=4 has no category.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Severity::D0),
            1 => Some(Severity::D1),
            2 => Some(Severity::D2),
            3 => Some(Severity::D3),
            4 => Some(Severity::D4),
            _ => None,
        }
    }

    /// Interpret a floating point attribute value.
    ///
    /// dBase numeric fields come back as `f64`; only whole numbers map to a
    /// category.
    pub fn from_value(value: f64) -> Option<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        Self::from_code(value as i64)
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn color(&self) -> Color {
        match self {
            Severity::D0 => Color::rgb(255, 255, 0),
            Severity::D1 => Color::rgb(252, 211, 127),
            Severity::D2 => Color::rgb(255, 170, 0),
            Severity::D3 => Color::rgb(230, 0, 0),
            Severity::D4 => Color::rgb(115, 0, 0),
        }
    }

    /// CSS class used by the browser view (`DM-0` .. `DM-4`).
    pub fn class_name(&self) -> String {
        format!("DM-{}", self.code())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for severity in Severity::ALL {
            assert_eq!(Severity::from_code(severity.code() as i64), Some(severity));
        }
    }

    #[test]
    fn test_out_of_range_codes() {
        assert_eq!(Severity::from_code(-1), None);
        assert_eq!(Severity::from_code(5), None);
        assert_eq!(Severity::from_value(2.5), None);
        assert_eq!(Severity::from_value(f64::NAN), None);
        assert_eq!(Severity::from_value(3.0), Some(Severity::D3));
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::D2.to_string(), "D2");
        assert_eq!(Severity::D4.class_name(), "DM-4");
    }
}
