// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Class color strings.
//!
//! Classes carry their color as the string the management screens stored
//! (`#rrggbb`, `#rgb`, `#aarrggbb` or a named color). This module turns
//! those strings into RGBA values for drawing.

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
];

impl Rgba {
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Parse a color string. Returns `None` for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }

        let lower = value.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b])| Self::rgb(*r, *g, *b))
    }

    /// Parse a color string, falling back to opaque black.
    pub fn parse_or_black(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::BLACK)
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }

    pub fn a(self) -> u8 {
        self.0[3]
    }

    /// HSL lightness (average of the largest and smallest channel).
    pub fn lightness(self) -> u8 {
        let max = self.r().max(self.g()).max(self.b()) as u16;
        let min = self.r().min(self.g()).min(self.b()) as u16;
        ((max + min) / 2) as u8
    }

    /// Text color readable on top of this color.
    pub fn contrasting_text(self) -> Self {
        if self.lightness() > 127 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        // Alpha comes first, as in Qt color names.
        8 => Some(Rgba([byte(2)?, byte(4)?, byte(6)?, byte(0)?])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgba::parse("#ff8000"), Some(Rgba([255, 128, 0, 255])));
        assert_eq!(Rgba::parse("#f80"), Some(Rgba([255, 136, 0, 255])));
        assert_eq!(Rgba::parse("#80ff0000"), Some(Rgba([255, 0, 0, 128])));
        assert_eq!(Rgba::parse(" #00FF00 "), Some(Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Rgba::parse("Red"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(Rgba::parse("white"), Some(Rgba::WHITE));
    }

    #[test]
    fn test_invalid_falls_back_to_black() {
        assert_eq!(Rgba::parse("#12345"), None);
        assert_eq!(Rgba::parse("#gggggg"), None);
        assert_eq!(Rgba::parse("not-a-color"), None);
        assert_eq!(Rgba::parse_or_black("??"), Rgba::BLACK);
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(Rgba::rgb(255, 255, 200).contrasting_text(), Rgba::BLACK);
        assert_eq!(Rgba::rgb(0, 0, 128).contrasting_text(), Rgba::WHITE);
        // Pure yellow has lightness 127, which is not above the threshold.
        assert_eq!(Rgba::rgb(255, 255, 0).lightness(), 127);
        assert_eq!(Rgba::rgb(255, 255, 0).contrasting_text(), Rgba::WHITE);
    }
}
