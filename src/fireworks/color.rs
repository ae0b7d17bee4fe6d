use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// RGB color with continuous channels.
///
/// Channels are not clamped while the simulation interpolates them; they are
/// only floored when projected for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(255.0, 255.0, 255.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Channel-wise linear interpolation. Exact at both ends of `progress`.
    pub fn lerp(&self, to: &Color, progress: f32) -> Color {
        let mix = |from: f32, to: f32| from * (1.0 - progress) + to * progress;
        Color::new(
            mix(self.red, to.red),
            mix(self.green, to.green),
            mix(self.blue, to.blue),
        )
    }

    /// Floors and clamps every channel into a terminal color triple.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |c: f32| c.floor().clamp(0.0, 255.0) as u8;
        (channel(self.red), channel(self.green), channel(self.blue))
    }
}

/// `rgb(r, g, b)` with each channel floored to an integer.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgb({}, {}, {})",
            self.red.floor() as i64,
            self.green.floor() as i64,
            self.blue.floor() as i64
        )
    }
}

/// Parses `RRGGBB`, with or without a leading `#`.
impl FromStr for Color {
    type Err = Error;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(f32::from)
                .map_err(|_| Error::InvalidColor(hex.to_string()))
        };

        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_floors_channels() {
        let color = Color::new(254.9, 0.5, 17.0);
        assert_eq!(color.to_string(), "rgb(254, 0, 17)");
    }

    #[test]
    fn display_tolerates_out_of_range() {
        let color = Color::new(300.7, -0.5, 12.0);
        assert_eq!(color.to_string(), "rgb(300, -1, 12)");
    }

    #[test]
    fn clone_is_independent() {
        let original = Color::new(10.0, 20.0, 30.0);
        let mut copy = original;
        copy.red = 99.0;
        assert_eq!(original.red, 10.0);
    }

    #[test]
    fn lerp_hits_endpoints_exactly() {
        let from = Color::new(255.0, 211.0, 51.0);
        let to = Color::new(28.0, 28.0, 28.0);
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0), to);

        let mid = from.lerp(&to, 0.5);
        assert!((mid.red - 141.5).abs() < 1e-4);
    }

    #[test]
    fn to_rgb8_clamps() {
        assert_eq!(Color::new(300.0, -5.0, 127.9).to_rgb8(), (255, 0, 127));
    }

    #[test]
    fn parses_hex() {
        let color: Color = "1a1b26".parse().unwrap();
        assert_eq!(color, Color::new(26.0, 27.0, 38.0));
        let hashed: Color = "#ffffff".parse().unwrap();
        assert_eq!(hashed, Color::WHITE);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!("12345".parse::<Color>().is_err());
        assert!("gg0000".parse::<Color>().is_err());
        assert!(matches!(
            "zz".parse::<Color>(),
            Err(Error::InvalidColor(s)) if s == "zz"
        ));
    }
}
