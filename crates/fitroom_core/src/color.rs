use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("'{0}' is not a hex colour (expected #rrggbb or #rgb)")]
    InvalidHex(String),
}

/// 8-bit sRGB colour, as typed into the colour field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const LIGHT_BLUE: Rgb = Rgb::new(0xad, 0xd8, 0xe6);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear-space RGBA, the space glTF base colour factors live in.
    pub fn to_linear_rgba(&self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            1.0,
        ]
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidHex(s.to_owned());
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());

        match digits.len() {
            6 => Ok(Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // #rgb shorthand doubles every digit
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 0x11);
                Ok(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!("#ff0000".parse::<Rgb>(), Ok(Rgb::new(255, 0, 0)));
        assert_eq!("#FFF".parse::<Rgb>(), Ok(Rgb::WHITE));
        assert_eq!("add8e6".parse::<Rgb>(), Ok(Rgb::LIGHT_BLUE));
    }

    #[test]
    fn rejects_garbage() {
        assert!("#ff00".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
        assert!("#+f0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(Rgb::new(0x0a, 0xBC, 0).to_hex(), "#0abc00");
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        let [r, g, b, a] = Rgb::new(255, 0, 0).to_linear_rgba();
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!((g, b, a), (0.0, 0.0, 1.0));
    }
}
