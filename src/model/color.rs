//! Hex color values for region fills.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegionError;

/// An RGB color written as `#RRGGBB`.
///
/// Parsing is case-insensitive; the canonical text form is uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const fn from_rgb(rgb: [u8; 3]) -> Self {
        Self(rgb)
    }

    /// Parse `#RRGGBB` (any letter case).
    pub fn parse(input: &str) -> Result<Self, RegionError> {
        let invalid = || RegionError::InvalidColor(input.to_string());

        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl FromStr for HexColor {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive_and_canonical_uppercase() {
        let lower = HexColor::parse("#8b4513").unwrap();
        let upper = HexColor::parse("#8B4513").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.rgb(), [0x8B, 0x45, 0x13]);
        assert_eq!(lower.to_string(), "#8B4513");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["#ZZZZZZ", "8B4513", "#8B451", "#8B45133", "", "#", "#8B 513", "#ÄÄÄÄÄÄ"] {
            assert_eq!(
                HexColor::parse(bad),
                Err(RegionError::InvalidColor(bad.to_string())),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let color: HexColor = serde_json::from_str("\"#f5f5dc\"").unwrap();
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#F5F5DC\"");
        assert!(serde_json::from_str::<HexColor>("\"#GGGGGG\"").is_err());
    }
}
