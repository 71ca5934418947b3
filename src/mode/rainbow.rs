//! Rainbow sweep

use super::{Mode, Surface};
use crate::color::wheel;

/// Spreads the hue wheel across the strip and shifts it by one position
/// per step.
#[derive(Debug, Clone, Default)]
pub struct RainbowMode {
    offset: u8,
}

impl RainbowMode {
    pub const fn offset(&self) -> u8 {
        self.offset
    }
}

impl Mode for RainbowMode {
    #[allow(clippy::cast_possible_truncation)]
    fn step(&mut self, surface: &mut Surface<'_>) -> bool {
        let len = surface.leds.len();
        if len == 0 {
            return false;
        }

        let spacing = 256 / len;
        for (i, led) in surface.leds.iter_mut().enumerate() {
            let position = (i * spacing + usize::from(self.offset)) & 0xFF;
            *led = wheel(position as u8);
        }

        self.offset = self.offset.wrapping_add(1);
        true
    }
}
