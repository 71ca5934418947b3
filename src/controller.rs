//! Control loop step
//!
//! [`LampController::poll`] runs one iteration of the superloop:
//!
//! 1. apply intents queued by the network task
//! 2. sample the button
//! 3. relay the pending gesture
//! 4. tick the light engine
//!
//! Nothing in here blocks. Storage, pin and publish errors are logged and
//! the loop keeps running on the RAM shadow of the configuration.

use embedded_hal::digital::InputPin;
use embedded_storage::Storage;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::LedDriver;
use crate::button::{ButtonConfig, Gesture, PinButton};
use crate::config::{ConfigStore, Repairs, StoreConfig};
use crate::engine::{EngineConfig, LightEngine};
use crate::intent_processor::{IntentEffects, IntentProcessor, IntentReceiver};
use crate::messaging::{
    Announcement, DEFAULT_DEVICE_NAME, DeviceNameTooLong, Publisher, check_device_name,
    publish_hold,
};
use crate::timer::{Clock, MonotonicTimer};

/// Controller configuration
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Topic prefix of this device
    pub device_name: &'static str,
    pub engine: EngineConfig,
    pub button: ButtonConfig,
    pub store: StoreConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME,
            engine: EngineConfig::default(),
            button: ButtonConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Use `device_name` as the topic prefix, rejecting names too long for a topic path
    pub fn with_device_name(
        mut self,
        device_name: &'static str,
    ) -> Result<Self, DeviceNameTooLong> {
        check_device_name(device_name)?;
        self.device_name = device_name;
        Ok(self)
    }
}

/// Where the active hold came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldSource {
    /// The physical button
    Local,
    /// A `Press` received on the comms topic
    Remote,
}

/// Owns every core component and wires them together
pub struct LampController<'a, S, D, P, C, const N: usize, const Q: usize>
where
    S: Storage,
    D: LedDriver,
    P: InputPin,
    C: Clock,
{
    device_name: &'static str,
    timer: MonotonicTimer<C>,
    store: ConfigStore<S>,
    button: PinButton<P>,
    engine: LightEngine<D, N>,
    intents: IntentProcessor<'a, Q>,
    holding: Option<HoldSource>,
}

impl<'a, S, D, P, C, const N: usize, const Q: usize> LampController<'a, S, D, P, C, N, Q>
where
    S: Storage,
    D: LedDriver,
    P: InputPin,
    C: Clock,
{
    pub fn new(
        storage: S,
        driver: D,
        pin: P,
        clock: C,
        intents: IntentReceiver<'a, Q>,
        config: &ControllerConfig,
    ) -> Self {
        #[cfg(feature = "esp32-log")]
        if check_device_name(config.device_name).is_err() {
            println!(
                "[LampController.new] device name too long: {}",
                config.device_name
            );
        }
        Self {
            device_name: config.device_name,
            timer: MonotonicTimer::new(clock),
            store: ConfigStore::new(storage, &config.store),
            button: PinButton::new(pin, &config.button),
            engine: LightEngine::new(driver, &config.engine),
            intents: IntentProcessor::new(intents),
            holding: None,
        }
    }

    /// Load and repair the persisted configuration.
    ///
    /// On a storage error the controller keeps the default settings.
    pub fn init(&mut self) -> Result<Repairs, S::Error> {
        self.store.load().inspect_err(|_| {
            #[cfg(feature = "esp32-log")]
            println!("[LampController.init] storage read failed, using defaults");
        })
    }

    /// Run one loop iteration
    pub fn poll<B: Publisher>(&mut self, publisher: &mut B) {
        let now = self.timer.mark();

        let effects = self
            .intents
            .process_pending(&mut self.store, self.button.classifier_mut());
        self.apply_effects(effects, publisher);

        if self.button.poll(now).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[LampController.poll] button read failed");
        }
        if let Some(gesture) = self.button.classifier_mut().pending_gesture() {
            self.handle_gesture(gesture, publisher);
        }

        self.engine.tick(now, self.store.settings());
    }

    /// Publish a snapshot of the current settings
    pub fn announce<B: Publisher>(&self, publisher: &mut B) {
        let announcement = Announcement::from_settings(self.store.settings());
        if announcement.publish(self.device_name, publisher).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[LampController.announce] publish failed");
        }
    }

    pub const fn device_name(&self) -> &'static str {
        self.device_name
    }

    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore<S> {
        &mut self.store
    }

    pub fn engine(&self) -> &LightEngine<D, N> {
        &self.engine
    }

    pub fn button(&self) -> &PinButton<P> {
        &self.button
    }

    pub fn timer(&self) -> &MonotonicTimer<C> {
        &self.timer
    }

    /// Source of the hold in progress, if any
    pub const fn holding(&self) -> Option<HoldSource> {
        self.holding
    }

    fn apply_effects<B: Publisher>(&self, effects: IntentEffects, publisher: &mut B) {
        #[cfg(feature = "esp32-log")]
        if effects.failed > 0 {
            println!(
                "[LampController] {} intents could not be persisted",
                effects.failed
            );
        }
        if effects.announce {
            self.announce(publisher);
        }
    }

    fn handle_gesture<B: Publisher>(&mut self, gesture: Gesture, publisher: &mut B) {
        let standby = self.store.settings().standby;

        match gesture {
            Gesture::ShortPress => {
                #[cfg(feature = "esp32-log")]
                println!("[LampController] standby -> {}", !standby);
                if self.store.set_standby(!standby).is_err() {
                    #[cfg(feature = "esp32-log")]
                    println!("[LampController] failed to persist standby");
                }
            }
            Gesture::Held => {
                // Remote hold reports Held on every read
                if self.holding.is_some() {
                    return;
                }
                let source = if self.button.classifier().is_remote_held() {
                    HoldSource::Remote
                } else {
                    HoldSource::Local
                };
                if source == HoldSource::Local && standby {
                    return;
                }
                self.holding = Some(source);
                self.engine.start_pulse();
                if source == HoldSource::Local {
                    self.relay_hold(publisher, true);
                }
            }
            Gesture::Released => {
                let Some(source) = self.holding.take() else {
                    return;
                };
                self.engine.stop_pulse();
                if source == HoldSource::Local && !standby {
                    self.relay_hold(publisher, false);
                }
            }
        }
    }

    fn relay_hold<B: Publisher>(&self, publisher: &mut B, pressed: bool) {
        if publish_hold(publisher, self.device_name, pressed).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[LampController] comms publish failed");
        }
    }
}
