//! Scanning stripe, the fallback pattern

use super::{Mode, Surface};
use crate::color::Rgb;

const STRIPE_COLOR: Rgb = Rgb {
    r: 50,
    g: 50,
    b: 50,
};

const STRIPE_ROWS: usize = 7;
const STRIPE_COLUMNS: usize = 7;

/// Row-major 8x8 index plane laid over the strip
const PLANE: [[u8; 8]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7],
    [8, 9, 10, 11, 12, 13, 14, 15],
    [16, 17, 18, 19, 20, 21, 22, 23],
    [24, 25, 26, 27, 28, 29, 30, 31],
    [32, 33, 34, 35, 36, 37, 38, 39],
    [40, 41, 42, 43, 44, 45, 46, 47],
    [48, 49, 50, 51, 52, 53, 54, 55],
    [56, 57, 58, 59, 60, 61, 62, 63],
];

/// Lights one plane column per step in grey, everything else off
#[derive(Debug, Clone, Default)]
pub struct StripeMode {
    column: usize,
}

impl StripeMode {
    pub const fn column(&self) -> usize {
        self.column
    }
}

impl Mode for StripeMode {
    fn step(&mut self, surface: &mut Surface<'_>) -> bool {
        surface.clear();
        for row in PLANE.iter().take(STRIPE_ROWS) {
            if let Some(led) = surface.leds.get_mut(usize::from(row[self.column])) {
                *led = STRIPE_COLOR;
            }
        }

        self.column = (self.column + 1) % STRIPE_COLUMNS;
        true
    }
}
