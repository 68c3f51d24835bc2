// Colour with a base opacity, written and read as CSS colour strings so the
// config can be passed straight from the page's JavaScript.

use crate::errors::{InvalidColorSnafu, ParticleError};
use snafu::OptionExt as _;
use std::convert::TryFrom;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub opacity: f64,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, opacity: f64) -> Color {
        Color { r, g, b, opacity }
    }

    // Packed as RRGGBBAA
    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color::rgba(r, g, b, f64::from(a) / 255.0)
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }

    fn parse(value: &str) -> Option<Color> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let (args, has_alpha) = if let Some(rest) = value.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = value.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };

        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }

        let opacity = if has_alpha {
            let alpha = parts[3].parse::<f64>().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            alpha
        } else {
            1.0
        };

        Some(Color::rgba(
            parts[0].parse().ok()?,
            parts[1].parse().ok()?,
            parts[2].parse().ok()?,
            opacity,
        ))
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let num = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Color::from_u32(num << 8 | 0xff)),
            8 => Some(Color::from_u32(num)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r, self.g, self.b, self.opacity
        )
    }
}

impl TryFrom<String> for Color {
    type Error = ParticleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).context(InvalidColorSnafu { value })
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.to_css()
    }
}
