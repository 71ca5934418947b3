//! Animation modes
//!
//! Every mode keeps its own state for the lifetime of the engine, so
//! switching away and back resumes where it left off. Modes render into a
//! [`Surface`] and report whether the strip needs to be shown.

mod colour;
mod cycle;
mod rainbow;
mod stripe;
mod twinkle;

use embassy_time::Duration;

pub use colour::ColourMode;
pub use cycle::CycleMode;
pub use rainbow::RainbowMode;
pub use stripe::StripeMode;
pub use twinkle::TwinkleMode;

use crate::color::{BLACK, Rgb};
use crate::timer::{Interval, TimerMark};

const MODE_NAME_COLOUR: &str = "Colour";
const MODE_NAME_TWINKLE: &str = "Twinkle";
const MODE_NAME_RAINBOW: &str = "Rainbow";
const MODE_NAME_CYCLE: &str = "Cycle";
const MODE_NAME_STRIPE: &str = "Stripe";

const MODE_ID_COLOUR: u8 = 0;
const MODE_ID_TWINKLE: u8 = 1;
const MODE_ID_RAINBOW: u8 = 2;
const MODE_ID_CYCLE: u8 = 3;
const MODE_ID_STRIPE: u8 = 4;

/// Known animation modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ModeId {
    /// Solid colour with fades between targets
    Colour = MODE_ID_COLOUR,
    /// Random single-pixel flicker around the target hue
    Twinkle = MODE_ID_TWINKLE,
    /// Spectrum swept across the strip
    Rainbow = MODE_ID_RAINBOW,
    /// Whole strip stepping through the hue wheel
    Cycle = MODE_ID_CYCLE,
    /// Scanning grey stripe, the fallback pattern
    Stripe = MODE_ID_STRIPE,
}

impl ModeId {
    /// Decode a stored mode byte
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_COLOUR => Self::Colour,
            MODE_ID_TWINKLE => Self::Twinkle,
            MODE_ID_RAINBOW => Self::Rainbow,
            MODE_ID_CYCLE => Self::Cycle,
            MODE_ID_STRIPE => Self::Stripe,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Colour => MODE_NAME_COLOUR,
            Self::Twinkle => MODE_NAME_TWINKLE,
            Self::Rainbow => MODE_NAME_RAINBOW,
            Self::Cycle => MODE_NAME_CYCLE,
            Self::Stripe => MODE_NAME_STRIPE,
        }
    }

    /// Whether a remote controller can select this mode by name
    pub const fn is_selectable(self) -> bool {
        !matches!(self, Self::Stripe)
    }

    /// Parse a mode name as sent by a remote controller.
    ///
    /// Case-sensitive. The stripe fallback is not remotely selectable.
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_COLOUR => Some(Self::Colour),
            MODE_NAME_TWINKLE => Some(Self::Twinkle),
            MODE_NAME_RAINBOW => Some(Self::Rainbow),
            MODE_NAME_CYCLE => Some(Self::Cycle),
            _ => None,
        }
    }
}

/// Render target handed to a mode for one step
pub struct Surface<'a> {
    /// Frame buffer
    pub leds: &'a mut [Rgb],
    /// Colour currently shown by whole-strip modes
    pub colour: &'a mut Rgb,
    /// Configured target colour
    pub target: Rgb,
}

impl Surface<'_> {
    /// Set the whole strip to one colour and remember it as current
    pub fn fill(&mut self, colour: Rgb) {
        *self.colour = colour;
        self.leds.fill(colour);
    }

    /// Turn every pixel off without touching the current colour
    pub fn clear(&mut self) {
        self.leds.fill(BLACK);
    }
}

pub trait Mode {
    /// Render a single step.
    ///
    /// Returns `true` if the frame changed and must be shown.
    fn step(&mut self, surface: &mut Surface<'_>) -> bool;
}

/// A mode together with its update period
#[derive(Debug, Clone)]
pub struct Timed<M: Mode> {
    mode: M,
    interval: Interval,
}

impl<M: Mode> Timed<M> {
    pub const fn new(mode: M, period: Duration) -> Self {
        Self {
            mode,
            interval: Interval::new(period),
        }
    }

    /// Step the mode if its period has elapsed
    pub fn poll(&mut self, now: TimerMark, surface: &mut Surface<'_>) -> bool {
        if !self.interval.poll(now) {
            return false;
        }
        self.mode.step(surface)
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut M {
        &mut self.mode
    }
}

/// Update periods of every mode
#[derive(Debug, Clone, Copy)]
pub struct ModeTimings {
    pub colour: Duration,
    pub twinkle: Duration,
    pub rainbow: Duration,
    pub cycle: Duration,
    pub stripe: Duration,
}

impl Default for ModeTimings {
    fn default() -> Self {
        Self {
            colour: Duration::from_millis(20),
            twinkle: Duration::from_millis(50),
            rainbow: Duration::from_millis(30),
            cycle: Duration::from_millis(40),
            stripe: Duration::from_millis(50),
        }
    }
}

/// All modes with their own timers
#[derive(Debug, Clone)]
pub struct ModeSet {
    pub colour: Timed<ColourMode>,
    pub twinkle: Timed<TwinkleMode>,
    pub rainbow: Timed<RainbowMode>,
    pub cycle: Timed<CycleMode>,
    pub stripe: Timed<StripeMode>,
}

impl ModeSet {
    pub fn new(timings: &ModeTimings, seed: u64) -> Self {
        Self {
            colour: Timed::new(ColourMode::default(), timings.colour),
            twinkle: Timed::new(TwinkleMode::new(seed), timings.twinkle),
            rainbow: Timed::new(RainbowMode::default(), timings.rainbow),
            cycle: Timed::new(CycleMode::default(), timings.cycle),
            stripe: Timed::new(StripeMode::default(), timings.stripe),
        }
    }

    /// Poll only the active mode's timer, stepping it when due
    pub fn poll(&mut self, id: ModeId, now: TimerMark, surface: &mut Surface<'_>) -> bool {
        match id {
            ModeId::Colour => self.colour.poll(now, surface),
            ModeId::Twinkle => self.twinkle.poll(now, surface),
            ModeId::Rainbow => self.rainbow.poll(now, surface),
            ModeId::Cycle => self.cycle.poll(now, surface),
            ModeId::Stripe => self.stripe.poll(now, surface),
        }
    }
}
