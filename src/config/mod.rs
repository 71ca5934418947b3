//! Persisted lamp configuration
//!
//! The record is kept in RAM and mirrored to a fixed 14-byte region of
//! non-volatile storage. It is serialized field by field in a fixed order;
//! the trailing checksum is the wrapping sum of every byte before it.
//!
//! | Offset | Size | Field      |
//! |--------|------|------------|
//! | 0      | 4    | signature  |
//! | 4      | 1    | version    |
//! | 5      | 1    | standby    |
//! | 6      | 1    | brightness |
//! | 7      | 3    | colour RGB |
//! | 10     | 1    | mode       |
//! | 11     | 2    | reserved   |
//! | 13     | 1    | checksum   |

mod store;

use bitflags::bitflags;

pub use store::{ConfigStore, DEFAULT_STORE_OFFSET, StoreConfig, StoreError};

use crate::color::Rgb;
use crate::mode::ModeId;

/// Record signature ("LAMP")
pub const SIGNATURE: [u8; 4] = *b"LAMP";

/// Record format version
pub const FORMAT_VERSION: u8 = 1;

/// Brightness ceiling (~60% of the strip's range)
pub const MAX_BRIGHTNESS: u8 = 153;

/// Size of the persisted record in bytes
pub const RECORD_LEN: usize = 14;

pub const DEFAULT_STANDBY: bool = false;
pub const DEFAULT_BRIGHTNESS: u8 = MAX_BRIGHTNESS;
pub const DEFAULT_COLOUR: Rgb = Rgb {
    r: 0xFF,
    g: 0x93,
    b: 0x29,
};
pub const DEFAULT_MODE: ModeId = ModeId::Colour;

const OFFSET_SIGNATURE: usize = 0;
const OFFSET_VERSION: usize = 4;
const OFFSET_STANDBY: usize = 5;
const OFFSET_BRIGHTNESS: usize = 6;
const OFFSET_COLOUR: usize = 7;
const OFFSET_MODE: usize = 10;
const OFFSET_RESERVED: usize = 11;
const OFFSET_CHECKSUM: usize = 13;

bitflags! {
    /// Fields that were repaired while validating a loaded record
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Repairs: u8 {
        const SIGNATURE = 1 << 0;
        const VERSION = 1 << 1;
        const CHECKSUM = 1 << 2;
        const STANDBY = 1 << 3;
        const BRIGHTNESS = 1 << 4;
        const MODE = 1 << 5;
    }
}

/// User-facing lamp settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampSettings {
    pub standby: bool,
    /// Output brightness, `0..=MAX_BRIGHTNESS`
    pub brightness: u8,
    pub colour: Rgb,
    pub mode: ModeId,
}

impl Default for LampSettings {
    fn default() -> Self {
        Self {
            standby: DEFAULT_STANDBY,
            brightness: DEFAULT_BRIGHTNESS,
            colour: DEFAULT_COLOUR,
            mode: DEFAULT_MODE,
        }
    }
}

/// The persisted configuration record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRecord {
    pub signature: [u8; 4],
    pub version: u8,
    pub settings: LampSettings,
    pub reserved: [u8; 2],
    pub checksum: u8,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        let mut record = Self {
            signature: SIGNATURE,
            version: FORMAT_VERSION,
            settings: LampSettings::default(),
            reserved: [0; 2],
            checksum: 0,
        };
        record.checksum = record.compute_checksum();
        record
    }
}

impl ConfigRecord {
    /// Serialize in storage order
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let settings = &self.settings;
        let mut bytes = [0u8; RECORD_LEN];
        bytes[OFFSET_SIGNATURE..OFFSET_VERSION].copy_from_slice(&self.signature);
        bytes[OFFSET_VERSION] = self.version;
        bytes[OFFSET_STANDBY] = u8::from(settings.standby);
        bytes[OFFSET_BRIGHTNESS] = settings.brightness;
        bytes[OFFSET_COLOUR] = settings.colour.r;
        bytes[OFFSET_COLOUR + 1] = settings.colour.g;
        bytes[OFFSET_COLOUR + 2] = settings.colour.b;
        bytes[OFFSET_MODE] = settings.mode as u8;
        bytes[OFFSET_RESERVED..OFFSET_CHECKSUM].copy_from_slice(&self.reserved);
        bytes[OFFSET_CHECKSUM] = self.checksum;
        bytes
    }

    /// Sum of every serialized byte except the checksum, modulo 256
    pub fn compute_checksum(&self) -> u8 {
        checksum_of(&self.to_bytes())
    }

    /// Deserialize and validate a stored record.
    ///
    /// Each invalid field is replaced with its default and flagged; valid
    /// fields are kept as stored. The checksum is compared after the header
    /// has been repaired, so a record that only carries a foreign header is
    /// not also flagged as [`Repairs::CHECKSUM`]. It is recomputed whenever
    /// anything was repaired.
    pub fn decode(bytes: &[u8; RECORD_LEN]) -> (Self, Repairs) {
        let mut repairs = Repairs::empty();

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&bytes[OFFSET_SIGNATURE..OFFSET_VERSION]);
        if signature != SIGNATURE {
            signature = SIGNATURE;
            repairs |= Repairs::SIGNATURE;
        }

        let mut version = bytes[OFFSET_VERSION];
        if version != FORMAT_VERSION {
            version = FORMAT_VERSION;
            repairs |= Repairs::VERSION;
        }

        let mut header_fixed = *bytes;
        header_fixed[OFFSET_SIGNATURE..OFFSET_VERSION].copy_from_slice(&signature);
        header_fixed[OFFSET_VERSION] = version;
        if bytes[OFFSET_CHECKSUM] != checksum_of(&header_fixed) {
            repairs |= Repairs::CHECKSUM;
        }

        let standby = match bytes[OFFSET_STANDBY] {
            0 => false,
            1 => true,
            _ => {
                repairs |= Repairs::STANDBY;
                DEFAULT_STANDBY
            }
        };

        let mut brightness = bytes[OFFSET_BRIGHTNESS];
        if brightness > MAX_BRIGHTNESS {
            brightness = DEFAULT_BRIGHTNESS;
            repairs |= Repairs::BRIGHTNESS;
        }

        // Every channel value is legal
        let colour = Rgb {
            r: bytes[OFFSET_COLOUR],
            g: bytes[OFFSET_COLOUR + 1],
            b: bytes[OFFSET_COLOUR + 2],
        };

        let mode = ModeId::from_raw(bytes[OFFSET_MODE]).unwrap_or_else(|| {
            repairs |= Repairs::MODE;
            DEFAULT_MODE
        });

        let mut reserved = [0u8; 2];
        reserved.copy_from_slice(&bytes[OFFSET_RESERVED..OFFSET_CHECKSUM]);

        let mut record = Self {
            signature,
            version,
            settings: LampSettings {
                standby,
                brightness,
                colour,
                mode,
            },
            reserved,
            checksum: bytes[OFFSET_CHECKSUM],
        };
        if !repairs.is_empty() {
            record.checksum = record.compute_checksum();
        }

        (record, repairs)
    }
}

fn checksum_of(bytes: &[u8; RECORD_LEN]) -> u8 {
    bytes[..OFFSET_CHECKSUM]
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}
