//! Solid colour with stepped fades

use super::{Mode, Surface};
use crate::color::Rgb;
use crate::transition::ColourTransition;

/// Solid colour mode.
///
/// Walks the active transition one waypoint per step and goes quiet once
/// the target is reached.
#[derive(Debug, Clone, Default)]
pub struct ColourMode {
    transition: ColourTransition,
}

impl ColourMode {
    /// Begin a fade from `from` to `to`
    pub fn start(&mut self, from: Rgb, to: Rgb) {
        self.transition.start(from, to);
    }

    pub const fn transition(&self) -> &ColourTransition {
        &self.transition
    }
}

impl Mode for ColourMode {
    fn step(&mut self, surface: &mut Surface<'_>) -> bool {
        let Some(waypoint) = self.transition.advance() else {
            return false;
        };
        surface.fill(waypoint);
        true
    }
}
