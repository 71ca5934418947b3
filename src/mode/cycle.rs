use super::{Mode, Surface};
use crate::color::wheel;

/// Whole strip walks the hue wheel, one position per step
#[derive(Debug, Clone, Default)]
pub struct CycleMode {
    position: u8,
}

impl CycleMode {
    pub const fn position(&self) -> u8 {
        self.position
    }
}

impl Mode for CycleMode {
    fn step(&mut self, surface: &mut Surface<'_>) -> bool {
        surface.fill(wheel(self.position));
        self.position = self.position.wrapping_add(1);
        true
    }
}
