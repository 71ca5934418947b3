//! Twinkle mode
//!
//! Each step picks one random pixel and either lights it with a hue near
//! the target colour or turns it off.

use super::{Mode, Surface};
use crate::color::{BLACK, rgb_to_wheel, wheel};

/// Hue jitter span around the target hue, `[-15, 14]`
const HUE_JITTER: u32 = 30;

#[derive(Debug, Clone)]
pub struct TwinkleMode {
    rng: SplitMix64,
}

impl TwinkleMode {
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: SplitMix64::new(seed),
        }
    }
}

impl Mode for TwinkleMode {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn step(&mut self, surface: &mut Surface<'_>) -> bool {
        let len = surface.leds.len();
        if len == 0 {
            return false;
        }

        let jitter = self.rng.below(HUE_JITTER) as i8 - (HUE_JITTER / 2) as i8;
        let pixel = self.rng.below(u32::try_from(len).unwrap_or(u32::MAX)) as usize;
        let lit = self.rng.below(2) == 0;

        let hue = rgb_to_wheel(surface.target).wrapping_add_signed(jitter);
        surface.leds[pixel] = if lit { wheel(hue) } else { BLACK };
        true
    }
}

/// SplitMix64 pseudo-random generator
#[derive(Debug, Clone)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        #[allow(clippy::cast_possible_truncation)]
        {
            ((z ^ (z >> 31)) >> 32) as u32
        }
    }

    /// Uniform value in `0..bound`
    #[allow(clippy::cast_possible_truncation)]
    fn below(&mut self, bound: u32) -> u32 {
        ((u64::from(self.next_u32()) * u64::from(bound)) >> 32) as u32
    }
}
