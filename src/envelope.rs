//! Brightness envelope
//!
//! Turns the configured brightness into the scalar handed to the pixel bus.
//! While a pulse is active the brightness breathes between 50% and 100%;
//! after the pulse stops it ramps back up to 100% and then only reports
//! changes of the configured brightness.

/// Coefficient scale (1000 = 100%)
const COEFFICIENT_FULL: u16 = 1000;
/// Lowest pulse coefficient (50%)
const COEFFICIENT_FLOOR: u16 = 500;
/// Coefficient change per envelope step (2.5%)
const COEFFICIENT_STEP: u16 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PulseDirection {
    Up,
    Down,
}

/// Brightness to apply after an envelope step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeOutput {
    /// Scalar for the pixel bus
    pub brightness: u8,
    /// Whether a static frame must be re-shown for the change to appear
    pub reshow: bool,
}

#[derive(Debug, Clone)]
pub struct BrightnessEnvelope {
    /// Pulse coefficient in permille, `COEFFICIENT_FLOOR..=COEFFICIENT_FULL`
    coefficient: u16,
    direction: PulseDirection,
    pulse_active: bool,
    last_applied: Option<u8>,
}

impl Default for BrightnessEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl BrightnessEnvelope {
    pub const fn new() -> Self {
        Self {
            coefficient: COEFFICIENT_FULL,
            direction: PulseDirection::Down,
            pulse_active: false,
            last_applied: None,
        }
    }

    pub fn start_pulse(&mut self) {
        self.pulse_active = true;
    }

    pub fn stop_pulse(&mut self) {
        self.pulse_active = false;
    }

    pub const fn is_pulsing(&self) -> bool {
        self.pulse_active
    }

    /// Current coefficient in permille
    pub const fn coefficient(&self) -> u16 {
        self.coefficient
    }

    /// Advance the envelope by one step.
    ///
    /// `static_frame` tells whether the active mode leaves the frame
    /// untouched between steps; a brightness change then needs a reshow.
    /// Returns `None` when the output brightness did not change.
    pub fn step(&mut self, brightness: u8, static_frame: bool) -> Option<EnvelopeOutput> {
        if self.pulse_active {
            let output = scale(brightness, self.coefficient);

            if self.coefficient >= COEFFICIENT_FULL {
                self.direction = PulseDirection::Down;
            }
            if self.coefficient <= COEFFICIENT_FLOOR {
                self.direction = PulseDirection::Up;
            }
            self.coefficient = match self.direction {
                PulseDirection::Up => self.coefficient + COEFFICIENT_STEP,
                PulseDirection::Down => self.coefficient - COEFFICIENT_STEP,
            };

            self.last_applied = Some(output);
            return Some(EnvelopeOutput {
                brightness: output,
                reshow: static_frame,
            });
        }

        if self.coefficient < COEFFICIENT_FULL {
            self.coefficient = (self.coefficient + COEFFICIENT_STEP).min(COEFFICIENT_FULL);
            let output = scale(brightness, self.coefficient);
            self.last_applied = Some(output);
            return Some(EnvelopeOutput {
                brightness: output,
                reshow: false,
            });
        }

        if self.last_applied == Some(brightness) {
            return None;
        }
        self.last_applied = Some(brightness);
        Some(EnvelopeOutput {
            brightness,
            reshow: static_frame,
        })
    }
}

/// Scale brightness by a permille coefficient
#[allow(clippy::cast_possible_truncation)]
fn scale(brightness: u8, coefficient: u16) -> u8 {
    (u32::from(brightness) * u32::from(coefficient) / u32::from(COEFFICIENT_FULL)) as u8
}
