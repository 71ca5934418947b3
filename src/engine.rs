use embassy_time::Duration;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::LedDriver;
use crate::color::{BLACK, Rgb};
use crate::config::LampSettings;
use crate::envelope::BrightnessEnvelope;
use crate::mode::{ModeId, ModeSet, ModeTimings, Surface};
use crate::timer::{Interval, TimerMark};

const DEFAULT_BRIGHTNESS_PERIOD: Duration = Duration::from_millis(50);
const DEFAULT_TWINKLE_SEED: u64 = 0x5EED_1A3F_0C0F_FEE5;

/// Update periods of the engine
#[derive(Debug, Clone, Copy)]
pub struct EngineTimings {
    /// Per-mode render periods
    pub modes: ModeTimings,
    /// Brightness envelope period
    pub brightness: Duration,
}

impl Default for EngineTimings {
    fn default() -> Self {
        Self {
            modes: ModeTimings::default(),
            brightness: DEFAULT_BRIGHTNESS_PERIOD,
        }
    }
}

/// Configuration for the light engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub timings: EngineTimings,
    /// Seed of the twinkle pseudo-random generator
    pub twinkle_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timings: EngineTimings::default(),
            twinkle_seed: DEFAULT_TWINKLE_SEED,
        }
    }
}

/// Transient animation state, never persisted
#[derive(Debug, Clone, Default)]
pub struct AnimationState {
    /// `None` until the first configuration has been observed
    current_mode: Option<ModeId>,
    /// Colour actually being rendered by whole-strip modes
    current_colour: Rgb,
    /// Colour the fade converges toward
    target_colour: Rgb,
    standby: bool,
    brightness: u8,
}

impl AnimationState {
    pub const fn current_mode(&self) -> Option<ModeId> {
        self.current_mode
    }

    pub const fn current_colour(&self) -> Rgb {
        self.current_colour
    }

    pub const fn target_colour(&self) -> Rgb {
        self.target_colour
    }

    pub const fn standby(&self) -> bool {
        self.standby
    }
}

/// Animation engine
///
/// Follows the configuration each tick and drives the pixel bus: fades in
/// colour mode, the animated modes, standby blackout and the brightness
/// envelope.
pub struct LightEngine<D: LedDriver, const N: usize> {
    driver: D,
    state: AnimationState,
    frame: [Rgb; N],
    modes: ModeSet,
    envelope: BrightnessEnvelope,
    brightness_interval: Interval,
}

impl<D: LedDriver, const N: usize> LightEngine<D, N> {
    pub fn new(driver: D, config: &EngineConfig) -> Self {
        Self {
            driver,
            state: AnimationState::default(),
            frame: [BLACK; N],
            modes: ModeSet::new(&config.timings.modes, config.twinkle_seed),
            envelope: BrightnessEnvelope::new(),
            brightness_interval: Interval::new(config.timings.brightness),
        }
    }

    /// Process one control loop iteration
    pub fn tick(&mut self, now: TimerMark, settings: &LampSettings) {
        self.observe(settings);

        if self.state.standby {
            self.frame.fill(BLACK);
            self.show();
            return;
        }

        if self.brightness_interval.poll(now) {
            self.update_brightness();
        }

        let Some(mode) = self.state.current_mode else {
            return;
        };
        let mut surface = Surface {
            leds: &mut self.frame,
            colour: &mut self.state.current_colour,
            target: self.state.target_colour,
        };
        if self.modes.poll(mode, now, &mut surface) {
            self.show();
        }
    }

    /// Start the brightness pulse
    pub fn start_pulse(&mut self) {
        self.envelope.start_pulse();
    }

    /// Stop the pulse and re-run the fade toward the current target
    pub fn stop_pulse(&mut self) {
        self.envelope.stop_pulse();
        self.start_colour_transition();
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Last rendered frame
    pub fn frame(&self) -> &[Rgb; N] {
        &self.frame
    }

    pub fn modes(&self) -> &ModeSet {
        &self.modes
    }

    pub fn envelope(&self) -> &BrightnessEnvelope {
        &self.envelope
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Pick up configuration changes
    fn observe(&mut self, settings: &LampSettings) {
        self.state.brightness = settings.brightness;

        if settings.colour != self.state.target_colour {
            self.state.target_colour = settings.colour;
            self.start_colour_transition();
        }

        if self.state.current_mode != Some(settings.mode) {
            self.enter_mode(settings.mode);
        }

        // Queue a fade so the colour is redrawn when standby ends
        if !self.state.standby
            && settings.standby
            && self.state.current_mode == Some(ModeId::Colour)
        {
            self.start_colour_transition();
        }

        self.state.standby = settings.standby;
    }

    fn enter_mode(&mut self, mode: ModeId) {
        #[cfg(feature = "esp32-log")]
        println!("[LightEngine.enter_mode] mode set to {}", mode.as_str());

        self.state.current_mode = Some(mode);
        if mode == ModeId::Colour {
            self.start_colour_transition();
            return;
        }

        self.state.current_colour = BLACK;
        self.frame.fill(BLACK);
        if !self.state.standby {
            self.show();
        }
    }

    fn start_colour_transition(&mut self) {
        self.modes
            .colour
            .mode_mut()
            .start(self.state.current_colour, self.state.target_colour);
    }

    fn update_brightness(&mut self) {
        let static_frame = self.state.current_mode == Some(ModeId::Colour);
        let Some(output) = self.envelope.step(self.state.brightness, static_frame) else {
            return;
        };
        self.driver.set_brightness(output.brightness);
        if output.reshow {
            self.show();
        }
    }

    fn show(&mut self) {
        self.driver.write(&self.frame);
    }
}
