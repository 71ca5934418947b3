//! Button gesture classification.
//!
//! Raw pin levels are turned into one of three gestures:
//!
//! | Gesture      | Condition                                    |
//! |--------------|----------------------------------------------|
//! | `ShortPress` | Released before the hold threshold           |
//! | `Held`       | Still pressed when the hold threshold passes |
//! | `Released`   | Released after `Held` was reported           |
//!
//! The level is trusted as sampled; debouncing comes from the sampling
//! period of [`PinButton`] (50 ms by default).
//!
//! A remote controller can emulate a hold with
//! [`ButtonClassifier::set_remote_held`].

use embassy_time::Duration;
use embedded_hal::digital::InputPin;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::timer::{Interval, TimerMark};

const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_millis(50);
const DEFAULT_HOLD_THRESHOLD: Duration = Duration::from_millis(1000);

/// Classified button outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    ShortPress,
    Held,
    Released,
}

/// Single-slot gesture queue.
///
/// A new gesture overwrites an unread one; reading empties the slot.
#[derive(Debug, Clone, Default)]
pub struct GestureMailbox {
    slot: Option<Gesture>,
}

impl GestureMailbox {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    pub fn post(&mut self, gesture: Gesture) {
        self.slot = Some(gesture);
    }

    /// Take the pending gesture, leaving the slot empty
    pub fn take(&mut self) -> Option<Gesture> {
        self.slot.take()
    }

    pub const fn peek(&self) -> Option<Gesture> {
        self.slot
    }
}

/// Button timing configuration
#[derive(Debug, Clone)]
pub struct ButtonConfig {
    /// Pin sampling period
    pub sample_period: Duration,
    /// Press duration after which a press counts as held
    pub hold_threshold: Duration,
    /// Pin level that means "pressed"
    pub active_high: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            sample_period: DEFAULT_SAMPLE_PERIOD,
            hold_threshold: DEFAULT_HOLD_THRESHOLD,
            active_high: true,
        }
    }
}

/// Edge-detecting gesture state machine
#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    hold_threshold: Duration,
    last_level: bool,
    /// Set on press, cleared once the press is classified as held or released
    short_press_candidate: bool,
    hold_start: TimerMark,
    /// The physical button is past the hold threshold and still pressed
    local_held: bool,
    remote_held: bool,
    mailbox: GestureMailbox,
}

impl ButtonClassifier {
    pub const fn new(hold_threshold: Duration) -> Self {
        Self {
            hold_threshold,
            last_level: false,
            short_press_candidate: false,
            hold_start: TimerMark::from_millis(0),
            local_held: false,
            remote_held: false,
            mailbox: GestureMailbox::new(),
        }
    }

    /// Feed one sampled level, `true` meaning pressed
    pub fn sample(&mut self, pressed: bool, now: TimerMark) {
        if pressed && !self.last_level {
            self.hold_start = now;
            self.short_press_candidate = true;
        }

        if self.short_press_candidate && self.hold_start.is_expired_at(now, self.hold_threshold) {
            #[cfg(feature = "esp32-log")]
            println!("[ButtonClassifier] held");
            self.short_press_candidate = false;
            self.local_held = true;
            self.mailbox.post(Gesture::Held);
        }

        if !pressed && self.last_level {
            let gesture = if self.short_press_candidate {
                Gesture::ShortPress
            } else {
                Gesture::Released
            };
            #[cfg(feature = "esp32-log")]
            println!("[ButtonClassifier] released: {:?}", gesture);
            self.short_press_candidate = false;
            self.local_held = false;
            self.mailbox.post(gesture);
        }

        self.last_level = pressed;
    }

    /// Assert or clear the remote hold.
    ///
    /// While asserted every read reports `Held`. Clearing it queues a single
    /// `Released`. Repeating the same call has no further effect.
    ///
    /// An assertion arriving during a physical hold is dropped: it is the
    /// broker returning this device's own `Press`.
    pub fn set_remote_held(&mut self, held: bool) {
        if self.remote_held == held {
            return;
        }
        if held && self.local_held {
            #[cfg(feature = "esp32-log")]
            println!("[ButtonClassifier] remote hold ignored during local hold");
            return;
        }
        self.remote_held = held;
        if !held {
            self.mailbox.post(Gesture::Released);
        }
    }

    pub const fn is_locally_held(&self) -> bool {
        self.local_held
    }

    pub const fn is_remote_held(&self) -> bool {
        self.remote_held
    }

    /// Read the pending gesture.
    ///
    /// Under remote hold this is always `Held` and nothing is consumed;
    /// otherwise the mailbox is emptied.
    pub fn pending_gesture(&mut self) -> Option<Gesture> {
        if self.remote_held {
            return Some(Gesture::Held);
        }
        self.mailbox.take()
    }
}

/// Samples a button pin at a fixed period into a [`ButtonClassifier`]
pub struct PinButton<P: InputPin> {
    pin: P,
    active_high: bool,
    interval: Interval,
    classifier: ButtonClassifier,
}

impl<P: InputPin> PinButton<P> {
    pub fn new(pin: P, config: &ButtonConfig) -> Self {
        Self {
            pin,
            active_high: config.active_high,
            interval: Interval::new(config.sample_period),
            classifier: ButtonClassifier::new(config.hold_threshold),
        }
    }

    /// Sample the pin if the sampling period has elapsed.
    ///
    /// A failed pin read skips the sample.
    pub fn poll(&mut self, now: TimerMark) -> Result<(), P::Error> {
        if !self.interval.poll(now) {
            return Ok(());
        }
        let high = self.pin.is_high()?;
        self.classifier.sample(high == self.active_high, now);
        Ok(())
    }

    pub fn classifier(&self) -> &ButtonClassifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut ButtonClassifier {
        &mut self.classifier
    }
}
