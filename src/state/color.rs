//! Color model used to paint puzzle swatches.

use std::fmt;

/// A color expressed in the hue/saturation/value space.
///
/// Hue is in degrees in `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    /// Convert to an 8-bit RGB color. See [`hsv_to_color`].
    pub fn to_color(self) -> Color {
        hsv_to_color(self.h, self.s, self.v)
    }
}

/// An RGB color with 8-bit channels, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    /// Build a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Convert an HSV triple to an RGB color.
///
/// The hue is expected to be already wrapped into `[0, 360)`. Saturation and value outside
/// `[0, 1]` are not rejected: the resulting channels are clamped instead.
pub fn hsv_to_color(h: f64, s: f64, v: f64) -> Color {
    let chroma = v * s;
    let hh = h / 60.0;
    let m = v - chroma;
    let x = chroma * (1.0 - (hh % 2.0 - 1.0).abs()) + m;
    let c = chroma + m;

    #[allow(clippy::cast_possible_truncation)]
    let sector = (hh.floor() as i64).rem_euclid(6);
    let (r, g, b) = match sector {
        0 => (c, x, m),
        1 => (x, c, m),
        2 => (m, c, x),
        3 => (m, x, c),
        4 => (x, m, c),
        _ => (c, m, x),
    };

    Color::new(channel(r), channel(g), channel(b))
}

/// Scale a `[0, 1]` channel to a byte, clamping and truncating toward zero.
fn channel(scale: f64) -> u8 {
    let scaled = scale * 256.0;
    if scaled > 255.0 {
        u8::MAX
    } else if scaled < 0.0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let byte = scaled as u8;
        byte
    }
}
