mod text;
mod wheel;

use smart_leds::RGB8;
pub use text::{format_hex, parse_colour};
pub use wheel::{rgb_to_wheel, wheel};

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
