#![no_std]

pub mod button;
pub mod channel;
pub mod color;
pub mod config;
pub mod controller;
pub mod engine;
pub mod envelope;
pub mod intent_processor;
pub mod messaging;
pub mod mode;
pub mod output;
pub mod timer;
pub mod transition;

pub use button::{ButtonClassifier, ButtonConfig, Gesture, GestureMailbox, PinButton};
pub use config::{
    ConfigRecord, ConfigStore, LampSettings, MAX_BRIGHTNESS, Repairs, StoreConfig, StoreError,
};
pub use controller::{ControllerConfig, HoldSource, LampController};
pub use engine::{AnimationState, EngineConfig, EngineTimings, LightEngine};
pub use envelope::BrightnessEnvelope;
pub use intent_processor::{
    IntentChannel, IntentEffects, IntentProcessor, IntentReceiver, IntentSender, SubmitError,
    submit_message,
};
pub use messaging::{LampIntent, ParseError, Publisher, Topic};
pub use mode::{ModeId, ModeTimings};
pub use output::SmartLedsOutput;
pub use timer::{Clock, EmbassyClock, ManualClock, MonotonicTimer, TimerMark};
pub use transition::ColourTransition;

pub use color::Rgb;
pub use embassy_time::Duration;

/// Abstract LED driver trait
///
/// Implement this trait to support different pixel buses.
/// The light engine is generic over this trait.
pub trait LedDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);

    /// Set the global brightness applied to subsequent writes
    fn set_brightness(&mut self, brightness: u8);
}
