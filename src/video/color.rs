//! `#RRGGBB` color parsing

use std::fmt;
use std::str::FromStr;

use image::Rgb;

use crate::error::GenerationError;

/// A validated 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const BLACK: Self = Self([0, 0, 0]);
    pub const WHITE: Self = Self([255, 255, 255]);

    #[must_use]
    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

impl FromStr for HexColor {
    type Err = GenerationError;

    /// Exactly six hex digits, with one optional leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GenerationError::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').unwrap_or(s);

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}
