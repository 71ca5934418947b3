//! Publish/subscribe message contracts
//!
//! All topics live under `<device>/`:
//!
//! | Topic           | Inbound payload                 | Effect                      |
//! |-----------------|---------------------------------|-----------------------------|
//! | `Colour`        | `#RRGGBB` or `rgb(r,g,b)`       | set target colour           |
//! | `Mode`          | `Colour`/`Twinkle`/`Rainbow`/`Cycle` | set mode               |
//! | `Power`         | `On`/`Off`                      | leave/enter standby         |
//! | `Brightness`    | `0`..`100` percent              | set brightness              |
//! | `Comms`         | `Press`/`Release`               | assert/clear remote hold    |
//! | `Announcements` | `Update`                        | publish a state snapshot    |
//!
//! Payloads are parsed and range-checked here, before anything reaches the
//! configuration store.

use core::fmt::Write;

use heapless::String;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{Rgb, format_hex, parse_colour};
use crate::config::{LampSettings, MAX_BRIGHTNESS};
use crate::mode::ModeId;

pub const DEFAULT_DEVICE_NAME: &str = "LampNode01";

/// Longest topic path that can be built
pub const TOPIC_MAX_LEN: usize = 64;

/// Longest device name whose every topic path fits in [`TOPIC_MAX_LEN`]
pub const DEVICE_NAME_MAX_LEN: usize = TOPIC_MAX_LEN - 1 - TOPIC_ANNOUNCEMENTS.len();

/// The device name cannot prefix every topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceNameTooLong;

/// Check that `device` is usable as a topic prefix
pub const fn check_device_name(device: &str) -> Result<(), DeviceNameTooLong> {
    if device.len() > DEVICE_NAME_MAX_LEN {
        return Err(DeviceNameTooLong);
    }
    Ok(())
}

const TOPIC_MODE: &str = "Mode";
const TOPIC_POWER: &str = "Power";
const TOPIC_COLOUR: &str = "Colour";
const TOPIC_BRIGHTNESS: &str = "Brightness";
const TOPIC_ANNOUNCEMENTS: &str = "Announcements";
const TOPIC_COMMS: &str = "Comms";

const PAYLOAD_ON: &str = "On";
const PAYLOAD_OFF: &str = "Off";
const PAYLOAD_PRESS: &str = "Press";
const PAYLOAD_RELEASE: &str = "Release";
const PAYLOAD_UPDATE: &str = "Update";

/// Topic under the device prefix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
    Mode,
    Power,
    Colour,
    Brightness,
    Announcements,
    Comms,
}

impl Topic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mode => TOPIC_MODE,
            Self::Power => TOPIC_POWER,
            Self::Colour => TOPIC_COLOUR,
            Self::Brightness => TOPIC_BRIGHTNESS,
            Self::Announcements => TOPIC_ANNOUNCEMENTS,
            Self::Comms => TOPIC_COMMS,
        }
    }

    /// Match a full topic path against `<device>/<topic>`
    pub fn parse(device: &str, path: &str) -> Option<Self> {
        let name = path.strip_prefix(device)?.strip_prefix('/')?;
        match name {
            TOPIC_MODE => Some(Self::Mode),
            TOPIC_POWER => Some(Self::Power),
            TOPIC_COLOUR => Some(Self::Colour),
            TOPIC_BRIGHTNESS => Some(Self::Brightness),
            TOPIC_ANNOUNCEMENTS => Some(Self::Announcements),
            TOPIC_COMMS => Some(Self::Comms),
            _ => None,
        }
    }

    /// Build the full topic path for `device`.
    ///
    /// Names rejected by [`check_device_name`] produce a truncated path.
    pub fn path(self, device: &str) -> String<TOPIC_MAX_LEN> {
        let mut path = String::new();
        let _written = write!(path, "{}/{}", device, self.as_str());
        #[cfg(feature = "esp32-log")]
        if _written.is_err() {
            println!("[Topic.path] truncated: {}", path);
        }
        path
    }
}

/// Error returned when an inbound message cannot be turned into an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The topic is not one this device listens to
    UnknownTopic,
    /// The payload is malformed or out of range
    InvalidPayload,
}

/// Validated request received from the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampIntent {
    SetColour(Rgb),
    SetMode(ModeId),
    /// `true` turns the lamp on (leaves standby)
    SetPower(bool),
    /// Brightness in percent, `0..=100`
    SetBrightness(u8),
    /// Assert or clear the remote hold
    RemoteHold(bool),
    /// Publish a snapshot of the current state
    Announce,
}

impl LampIntent {
    /// Parse an inbound message addressed to `device`
    pub fn parse(device: &str, topic: &str, payload: &[u8]) -> Result<Self, ParseError> {
        let topic = Topic::parse(device, topic).ok_or(ParseError::UnknownTopic)?;
        let payload = core::str::from_utf8(payload).map_err(|_| ParseError::InvalidPayload)?;

        let intent = match topic {
            Topic::Colour => parse_colour(payload).map(Self::SetColour),
            Topic::Mode => ModeId::parse_from_str(payload).map(Self::SetMode),
            Topic::Power => match payload {
                PAYLOAD_ON => Some(Self::SetPower(true)),
                PAYLOAD_OFF => Some(Self::SetPower(false)),
                _ => None,
            },
            Topic::Brightness => parse_percent(payload).map(Self::SetBrightness),
            Topic::Comms => match payload {
                PAYLOAD_PRESS => Some(Self::RemoteHold(true)),
                PAYLOAD_RELEASE => Some(Self::RemoteHold(false)),
                _ => None,
            },
            Topic::Announcements => (payload == PAYLOAD_UPDATE).then_some(Self::Announce),
        };
        intent.ok_or(ParseError::InvalidPayload)
    }
}

/// Parse a whole-number percentage, clamping values above 100
fn parse_percent(payload: &str) -> Option<u8> {
    let value = payload.trim().parse::<u32>().ok()?;
    u8::try_from(value.min(100)).ok()
}

/// Scale a percentage to the stored brightness range
#[allow(clippy::cast_possible_truncation)]
pub const fn percent_to_brightness(percent: u8) -> u8 {
    let percent = if percent > 100 { 100 } else { percent };
    (percent as u16 * MAX_BRIGHTNESS as u16 / 100) as u8
}

/// Express a stored brightness as a percentage.
///
/// Rounds up, so `percent_to_brightness(brightness_to_percent(b))` is stable
/// for every value produced by [`percent_to_brightness`].
#[allow(clippy::cast_possible_truncation)]
pub const fn brightness_to_percent(brightness: u8) -> u8 {
    let max = MAX_BRIGHTNESS as u16;
    let brightness = if brightness > MAX_BRIGHTNESS {
        MAX_BRIGHTNESS
    } else {
        brightness
    };
    ((brightness as u16 * 100).div_ceil(max)) as u8
}

/// Outbound half of the messaging client
pub trait Publisher {
    type Error;

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), Self::Error>;
}

/// Publish a hold gesture on the comms topic
pub fn publish_hold<P: Publisher>(
    publisher: &mut P,
    device: &str,
    pressed: bool,
) -> Result<(), P::Error> {
    let payload = if pressed { PAYLOAD_PRESS } else { PAYLOAD_RELEASE };
    publisher.publish(&Topic::Comms.path(device), payload)
}

/// Snapshot of the lamp state as published on request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub brightness: String<3>,
    /// `None` for modes that cannot be selected remotely
    pub mode: Option<&'static str>,
    pub colour: String<7>,
    pub power: &'static str,
}

impl Announcement {
    pub fn from_settings(settings: &LampSettings) -> Self {
        let mut brightness = String::new();
        let _ = write!(brightness, "{}", brightness_to_percent(settings.brightness));
        Self {
            brightness,
            mode: settings
                .mode
                .is_selectable()
                .then(|| settings.mode.as_str()),
            colour: format_hex(settings.colour),
            power: if settings.standby {
                PAYLOAD_OFF
            } else {
                PAYLOAD_ON
            },
        }
    }

    /// Publish brightness, mode, colour and power, in that order.
    ///
    /// The mode is left out when it has no remote name.
    pub fn publish<P: Publisher>(&self, device: &str, publisher: &mut P) -> Result<(), P::Error> {
        publisher.publish(&Topic::Brightness.path(device), &self.brightness)?;
        if let Some(mode) = self.mode {
            publisher.publish(&Topic::Mode.path(device), mode)?;
        }
        publisher.publish(&Topic::Colour.path(device), &self.colour)?;
        publisher.publish(&Topic::Power.path(device), self.power)
    }
}
