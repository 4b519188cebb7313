use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::CartaError;

/// RGBA color of the palette entries and the map background.
///
/// In render options a color is written as a `#RRGGBB` or `#RRGGBBAA` string.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color([u8; 4]);

impl Color {
    /// `#FF0000`
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    /// `#0000FF`
    pub const BLUE: Color = Color::rgba(0, 0, 255, 255);
    /// `#FFFFFF`
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// `#000000`
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    /// Creates a color from its channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Channels in RGBA order, as stored in image pixels.
    pub fn to_u8_array(&self) -> [u8; 4] {
        self.0
    }

    /// Formats the color as `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }

    /// Parses `#RRGGBB` (opaque) or `#RRGGBBAA`. Both letter cases are accepted.
    pub fn try_from_hex(hex: &str) -> Option<Self> {
        parse_hex(hex.as_bytes()).map(Self)
    }

    /// Same as [`Color::try_from_hex`], for palette constants.
    ///
    /// # Panics
    ///
    /// Panics if the string is not a valid color.
    pub const fn from_hex(hex: &'static str) -> Self {
        match parse_hex(hex.as_bytes()) {
            Some(channels) => Self(channels),
            None => panic!("invalid color hex string"),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = CartaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_hex(&value).ok_or(CartaError::InvalidColor(value))
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

impl From<Color> for Rgba<u8> {
    fn from(value: Color) -> Self {
        Rgba(value.0)
    }
}

const fn parse_hex(hex: &[u8]) -> Option<[u8; 4]> {
    if !matches!(hex.len(), 7 | 9) || hex[0] != b'#' {
        return None;
    }

    let mut channels = [0, 0, 0, u8::MAX];
    let mut i = 0;
    while 2 * i + 1 < hex.len() {
        let (Some(high), Some(low)) = (hex_digit(hex[2 * i + 1]), hex_digit(hex[2 * i + 2])) else {
            return None;
        };
        channels[i] = high * 16 + low;
        i += 1;
    }

    Some(channels)
}

const fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
