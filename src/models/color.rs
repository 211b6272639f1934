// src/models/color.rs
//
// 8-bit RGB colors used by palettes, CC overrides and image scenes

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorTriple {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorTriple {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB` (leading `#` optional).
    /// Anything else yields black.
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);

        match hex.len() {
            3 if hex.is_ascii() => {
                let doubled: Vec<String> = hex.chars().map(|c| format!("{c}{c}")).collect();
                Self::new(
                    channel(&doubled[0]),
                    channel(&doubled[1]),
                    channel(&doubled[2]),
                )
            }
            6 if hex.is_ascii() => Self::new(
                channel(&hex[0..2]),
                channel(&hex[2..4]),
                channel(&hex[4..6]),
            ),
            _ => Self::default(),
        }
    }

    /// Overwrites one channel, 0 = red, 1 = green, 2 = blue.
    pub fn set_channel(&mut self, channel: usize, value: u8) {
        match channel {
            0 => self.r = value,
            1 => self.g = value,
            2 => self.b = value,
            _ => {}
        }
    }

    pub fn to_f32(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl fmt::Display for ColorTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let tests = vec![
            ("#516AAE", ColorTriple::new(0x51, 0x6A, 0xAE)),
            ("CF4A35", ColorTriple::new(0xCF, 0x4A, 0x35)),
            ("#fff", ColorTriple::new(255, 255, 255)),
            ("#1fa69b", ColorTriple::new(0x1F, 0xA6, 0x9B)),
            ("#12345", ColorTriple::default()),
            ("", ColorTriple::default()),
            ("#é1", ColorTriple::default()),
            ("#ééé", ColorTriple::default()),
        ];

        for (input, expected) in tests {
            assert_eq!(ColorTriple::from_hex(input), expected, "Failed for {}", input);
        }
    }

    #[test]
    fn test_set_channel() {
        let mut color = ColorTriple::new(1, 2, 3);
        color.set_channel(1, 200);
        color.set_channel(7, 99);
        assert_eq!(color, ColorTriple::new(1, 200, 3));
        assert_eq!(color.to_string(), "rgb(1,200,3)");
    }
}
