//! Hue wheel shared by the twinkle, rainbow and cycle modes.

use super::Rgb;

const BAND: u8 = 85;

/// Map a wheel position to a fully saturated colour.
///
/// The range is split into three 85-wide bands giving a
/// red → green → blue → red cycle. Position 0 is pure red.
#[inline]
pub const fn wheel(position: u8) -> Rgb {
    let pos = 255 - position;
    if pos < BAND {
        Rgb {
            r: 255 - pos * 3,
            g: 0,
            b: pos * 3,
        }
    } else if pos < BAND * 2 {
        let pos = pos - BAND;
        Rgb {
            r: 0,
            g: pos * 3,
            b: 255 - pos * 3,
        }
    } else {
        let pos = pos - BAND * 2;
        Rgb {
            r: pos * 3,
            g: 255 - pos * 3,
            b: 0,
        }
    }
}

/// Pack a colour into a wheel position seed.
///
/// Keeps the top 3 bits of blue, top 3 bits of green and top 2 bits of red.
/// This is a cheap hash, not an inverse of [`wheel`].
#[inline]
pub const fn rgb_to_wheel(color: Rgb) -> u8 {
    (color.b & 0xE0) | ((color.g & 0xE0) >> 3) | (color.r >> 6)
}
