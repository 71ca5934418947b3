//! Intent processing module
//!
//! Applies intents queued by the network task to the configuration store
//! and the button classifier.

use embedded_storage::Storage;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::button::ButtonClassifier;
use crate::channel::{Channel, Receiver, Sender, TrySendError};
use crate::config::{ConfigStore, StoreError};
use crate::messaging::{LampIntent, ParseError, percent_to_brightness};

/// Type alias for intent sender
pub type IntentSender<'a, const SIZE: usize> = Sender<'a, LampIntent, SIZE>;

/// Type alias for intent receiver
pub type IntentReceiver<'a, const SIZE: usize> = Receiver<'a, LampIntent, SIZE>;

/// Type alias for the intent channel
pub type IntentChannel<const SIZE: usize> = Channel<LampIntent, SIZE>;

/// Error returned when an inbound message could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The message was rejected by the parser
    Parse(ParseError),
    /// The intent queue is full; the message was dropped
    QueueFull(LampIntent),
}

impl From<ParseError> for SubmitError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<TrySendError<LampIntent>> for SubmitError {
    fn from(error: TrySendError<LampIntent>) -> Self {
        Self::QueueFull(error.0)
    }
}

/// Parse an inbound message and queue the resulting intent.
///
/// Meant to be called from the messaging client's receive callback.
pub fn submit_message<const SIZE: usize>(
    intents: &IntentSender<'_, SIZE>,
    device: &str,
    topic: &str,
    payload: &[u8],
) -> Result<(), SubmitError> {
    let intent = LampIntent::parse(device, topic, payload).inspect_err(|_error| {
        #[cfg(feature = "esp32-log")]
        println!("[submit_message] rejected {}: {:?}", topic, _error);
    })?;
    intents.try_send(intent)?;
    Ok(())
}

/// Side effects the controller must carry out after processing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentEffects {
    /// A state snapshot was requested
    pub announce: bool,
    /// Number of intents that could not be persisted
    pub failed: usize,
}

/// Drains the intent queue into the configuration store
pub struct IntentProcessor<'a, const SIZE: usize> {
    intents: IntentReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> IntentProcessor<'a, SIZE> {
    pub const fn new(intents: IntentReceiver<'a, SIZE>) -> Self {
        Self { intents }
    }

    /// Apply all pending intents (non-blocking)
    pub fn process_pending<S: Storage>(
        &mut self,
        store: &mut ConfigStore<S>,
        button: &mut ButtonClassifier,
    ) -> IntentEffects {
        let mut effects = IntentEffects::default();

        while let Ok(intent) = self.intents.try_receive() {
            match Self::apply(intent, store, button) {
                Ok(true) => effects.announce = true,
                Ok(false) => {}
                Err(_) => {
                    #[cfg(feature = "esp32-log")]
                    println!("[IntentProcessor] failed to apply {:?}", intent);
                    effects.failed += 1;
                }
            }
        }

        effects
    }

    /// Apply one intent; `Ok(true)` means an announcement was requested
    fn apply<S: Storage>(
        intent: LampIntent,
        store: &mut ConfigStore<S>,
        button: &mut ButtonClassifier,
    ) -> Result<bool, StoreError<S::Error>> {
        match intent {
            LampIntent::SetColour(colour) => store.set_colour(colour)?,
            LampIntent::SetMode(mode) => store.set_mode(mode)?,
            LampIntent::SetPower(on) => store.set_standby(!on)?,
            LampIntent::SetBrightness(percent) => {
                store.set_brightness(percent_to_brightness(percent))?;
            }
            LampIntent::RemoteHold(held) => button.set_remote_held(held),
            LampIntent::Announce => return Ok(true),
        }
        Ok(false)
    }
}
