//! Textual colour forms used on the messaging boundary

use core::fmt::Write;

use heapless::String;

use super::Rgb;

/// Format a colour as `#RRGGBB` (upper-case hex)
pub fn format_hex(color: Rgb) -> String<7> {
    let mut out = String::new();
    // 7 bytes always fit
    let _ = write!(out, "#{:02X}{:02X}{:02X}", color.r, color.g, color.b);
    out
}

/// Parse `#RRGGBB` or `rgb(r, g, b)`.
///
/// Returns `None` for anything else, including out-of-range channels.
pub fn parse_colour(input: &str) -> Option<Rgb> {
    let input = input.trim();
    if let Some(hex) = input.strip_prefix('#') {
        return parse_hex(hex);
    }
    parse_rgb_function(input)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Rgb {
        r: ((value >> 16) & 0xFF) as u8,
        g: ((value >> 8) & 0xFF) as u8,
        b: (value & 0xFF) as u8,
    })
}

fn parse_rgb_function(input: &str) -> Option<Rgb> {
    let args = input
        .strip_prefix("rgb")?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;

    let mut channels = args.split(',').map(|part| part.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some(Rgb { r, g, b })
}
