use embedded_storage::Storage;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{ConfigRecord, LampSettings, MAX_BRIGHTNESS, RECORD_LEN, Repairs};
use crate::color::Rgb;
use crate::mode::ModeId;

/// Default storage offset of the record
pub const DEFAULT_STORE_OFFSET: u32 = 0x40;

/// Placement of the record in non-volatile storage
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Byte offset of the first record byte
    pub offset: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            offset: DEFAULT_STORE_OFFSET,
        }
    }
}

/// Error returned by configuration setters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError<E> {
    /// The underlying storage failed
    Storage(E),
    /// The value is outside the field's legal range
    OutOfRange,
}

/// RAM shadow of the configuration record, mirrored to storage
pub struct ConfigStore<S: Storage> {
    storage: S,
    offset: u32,
    record: ConfigRecord,
}

impl<S: Storage> ConfigStore<S> {
    /// Create a store holding the default record.
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    pub fn new(storage: S, config: &StoreConfig) -> Self {
        Self {
            storage,
            offset: config.offset,
            record: ConfigRecord::default(),
        }
    }

    /// Read the record from storage, validate it and repair it.
    ///
    /// Repaired records are written back immediately. Returns the set of
    /// repaired fields, empty for a healthy record.
    pub fn load(&mut self) -> Result<Repairs, S::Error> {
        let mut bytes = [0u8; RECORD_LEN];
        self.storage.read(self.offset, &mut bytes)?;

        let (record, repairs) = ConfigRecord::decode(&bytes);
        self.record = record;

        if !repairs.is_empty() {
            #[cfg(feature = "esp32-log")]
            println!("[ConfigStore.load] repaired fields: {:?}", repairs);
            self.save()?;
        }

        Ok(repairs)
    }

    /// Recompute the checksum and persist the record.
    ///
    /// Only bytes that differ from what is stored are rewritten.
    pub fn save(&mut self) -> Result<(), S::Error> {
        self.record.checksum = self.record.compute_checksum();
        let bytes = self.record.to_bytes();

        let mut stored = [0u8; RECORD_LEN];
        self.storage.read(self.offset, &mut stored)?;

        let mut index = 0;
        while index < RECORD_LEN {
            if bytes[index] == stored[index] {
                index += 1;
                continue;
            }
            let start = index;
            while index < RECORD_LEN && bytes[index] != stored[index] {
                index += 1;
            }
            #[allow(clippy::cast_possible_truncation)]
            let address = self.offset + start as u32;
            self.storage.write(address, &bytes[start..index])?;
        }

        #[cfg(feature = "esp32-log")]
        println!("[ConfigStore.save] {:?}", bytes);
        Ok(())
    }

    /// Read-only view of the settings
    pub fn settings(&self) -> &LampSettings {
        &self.record.settings
    }

    /// Writable view of the settings.
    ///
    /// Meant for calibration and setup paths. Changes are not persisted
    /// until [`save`](Self::save) is called.
    pub fn settings_mut(&mut self) -> &mut LampSettings {
        &mut self.record.settings
    }

    /// The full record, header included
    pub fn record(&self) -> &ConfigRecord {
        &self.record
    }

    /// Checksum of the current RAM shadow
    pub fn checksum(&self) -> u8 {
        self.record.compute_checksum()
    }

    pub fn set_standby(&mut self, standby: bool) -> Result<(), StoreError<S::Error>> {
        self.update(|settings| settings.standby = standby)
    }

    /// Set the brightness, `0..=MAX_BRIGHTNESS`
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), StoreError<S::Error>> {
        if brightness > MAX_BRIGHTNESS {
            return Err(StoreError::OutOfRange);
        }
        self.update(|settings| settings.brightness = brightness)
    }

    pub fn set_colour(&mut self, colour: Rgb) -> Result<(), StoreError<S::Error>> {
        self.update(|settings| settings.colour = colour)
    }

    pub fn set_mode(&mut self, mode: ModeId) -> Result<(), StoreError<S::Error>> {
        self.update(|settings| settings.mode = mode)
    }

    /// Borrow the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Apply a change and persist it if anything changed
    fn update(
        &mut self,
        change: impl FnOnce(&mut LampSettings),
    ) -> Result<(), StoreError<S::Error>> {
        let before = self.record.settings;
        change(&mut self.record.settings);
        if self.record.settings == before {
            return Ok(());
        }
        self.save().map_err(StoreError::Storage)
    }
}
