mod tests {
    use embedded_storage::{ReadStorage, Storage};
    use lamp_controller::color::Rgb;
    use lamp_controller::config::{
        ConfigRecord, ConfigStore, DEFAULT_BRIGHTNESS, DEFAULT_COLOUR, LampSettings,
        MAX_BRIGHTNESS, RECORD_LEN, Repairs, StoreConfig, StoreError,
    };
    use lamp_controller::mode::ModeId;

    const OFFSET: usize = 0x40;

    struct RamStorage {
        bytes: [u8; 256],
        writes: usize,
        written_bytes: usize,
    }

    impl RamStorage {
        fn blank() -> Self {
            Self {
                bytes: [0xFF; 256],
                writes: 0,
                written_bytes: 0,
            }
        }

        fn with_record(record: [u8; RECORD_LEN]) -> Self {
            let mut storage = Self::blank();
            storage.bytes[OFFSET..OFFSET + RECORD_LEN].copy_from_slice(&record);
            storage
        }

        fn record(&self) -> [u8; RECORD_LEN] {
            let mut record = [0u8; RECORD_LEN];
            record.copy_from_slice(&self.bytes[OFFSET..OFFSET + RECORD_LEN]);
            record
        }
    }

    impl ReadStorage for RamStorage {
        type Error = ();

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            bytes.copy_from_slice(&self.bytes[start..start + bytes.len()]);
            Ok(())
        }

        fn capacity(&self) -> usize {
            self.bytes.len()
        }
    }

    impl Storage for RamStorage {
        fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
            self.writes += 1;
            self.written_bytes += bytes.len();
            Ok(())
        }
    }

    struct BrokenStorage;

    impl ReadStorage for BrokenStorage {
        type Error = &'static str;

        fn read(&mut self, _offset: u32, _bytes: &mut [u8]) -> Result<(), Self::Error> {
            Err("read failed")
        }

        fn capacity(&self) -> usize {
            0
        }
    }

    impl Storage for BrokenStorage {
        fn write(&mut self, _offset: u32, _bytes: &[u8]) -> Result<(), Self::Error> {
            Err("write failed")
        }
    }

    fn sum(bytes: &[u8]) -> u8 {
        bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
    }

    /// Serialize settings with a correct header and checksum
    fn record_bytes(settings: LampSettings) -> [u8; RECORD_LEN] {
        let record = ConfigRecord {
            settings,
            ..ConfigRecord::default()
        };
        let mut bytes = record.to_bytes();
        bytes[13] = sum(&bytes[..13]);
        bytes
    }

    fn custom_settings() -> LampSettings {
        LampSettings {
            standby: true,
            brightness: 42,
            colour: Rgb { r: 1, g: 2, b: 3 },
            mode: ModeId::Rainbow,
        }
    }

    fn open(storage: RamStorage) -> ConfigStore<RamStorage> {
        ConfigStore::new(storage, &StoreConfig::default())
    }

    #[test]
    fn test_layout_and_checksum() {
        let bytes = record_bytes(custom_settings());
        assert_eq!(&bytes[0..4], b"LAMP");
        assert_eq!(bytes[4], 1);
        assert_eq!(bytes[5], 1);
        assert_eq!(bytes[6], 42);
        assert_eq!(&bytes[7..10], &[1, 2, 3]);
        assert_eq!(bytes[10], 2);
        assert_eq!(&bytes[11..13], &[0, 0]);

        let record = ConfigRecord {
            settings: custom_settings(),
            ..ConfigRecord::default()
        };
        assert_eq!(record.compute_checksum(), bytes[13]);
    }

    #[test]
    fn test_healthy_record_loads_without_writes() {
        let mut store = open(RamStorage::with_record(record_bytes(custom_settings())));

        let repairs = store.load().unwrap();
        assert!(repairs.is_empty());
        assert_eq!(*store.settings(), custom_settings());
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn test_out_of_range_fields_are_repaired_and_persisted() {
        let mut bytes = record_bytes(LampSettings {
            colour: Rgb {
                r: 10,
                g: 20,
                b: 30,
            },
            ..LampSettings::default()
        });
        bytes[6] = 200;
        bytes[10] = 9;
        bytes[13] = sum(&bytes[..13]);
        let mut store = open(RamStorage::with_record(bytes));

        let repairs = store.load().unwrap();
        assert_eq!(repairs, Repairs::BRIGHTNESS | Repairs::MODE);
        assert_eq!(store.settings().brightness, MAX_BRIGHTNESS);
        assert_eq!(store.settings().mode, ModeId::Colour);
        assert_eq!(
            store.settings().colour,
            Rgb {
                r: 10,
                g: 20,
                b: 30
            }
        );
        assert!(!store.settings().standby);

        let persisted = store.storage().record();
        assert_eq!(persisted, store.record().to_bytes());
        assert_eq!(persisted[6], 153);
        assert_eq!(persisted[10], 0);
        assert_eq!(persisted[13], sum(&persisted[..13]));
    }

    #[test]
    fn test_only_offending_fields_are_replaced() {
        let mut bytes = record_bytes(custom_settings());
        bytes[5] = 7;
        bytes[13] = sum(&bytes[..13]);
        let mut store = open(RamStorage::with_record(bytes));

        let repairs = store.load().unwrap();
        assert_eq!(repairs, Repairs::STANDBY);
        assert_eq!(
            *store.settings(),
            LampSettings {
                standby: false,
                ..custom_settings()
            }
        );
    }

    #[test]
    fn test_bad_checksum_is_corrected_on_save() {
        let mut bytes = record_bytes(custom_settings());
        bytes[13] = bytes[13].wrapping_add(1);
        let mut store = open(RamStorage::with_record(bytes));

        let repairs = store.load().unwrap();
        assert_eq!(repairs, Repairs::CHECKSUM);
        assert_eq!(*store.settings(), custom_settings());

        let persisted = store.storage().record();
        assert_eq!(persisted[13], sum(&persisted[..13]));
        // Only the checksum byte changed
        assert_eq!(store.storage().writes, 1);
        assert_eq!(store.storage().written_bytes, 1);
    }

    #[test]
    fn test_foreign_header_is_replaced() {
        let mut bytes = record_bytes(custom_settings());
        bytes[0..4].copy_from_slice(b"ABCD");
        bytes[4] = 9;
        let mut store = open(RamStorage::with_record(bytes));

        // The stored checksum still matches once the header is restored
        let repairs = store.load().unwrap();
        assert_eq!(repairs, Repairs::SIGNATURE | Repairs::VERSION);
        assert_eq!(store.record().signature, *b"LAMP");
        assert_eq!(store.record().version, 1);
        assert_eq!(*store.settings(), custom_settings());
        assert_eq!(&store.storage().record()[0..5], b"LAMP\x01");
    }

    #[test]
    fn test_foreign_header_with_stale_checksum() {
        let mut bytes = record_bytes(custom_settings());
        bytes[0..4].copy_from_slice(b"ABCD");
        bytes[13] = sum(&bytes[..13]);
        let mut store = open(RamStorage::with_record(bytes));

        let repairs = store.load().unwrap();
        assert_eq!(repairs, Repairs::SIGNATURE | Repairs::CHECKSUM);
        assert_eq!(*store.settings(), custom_settings());
        let persisted = store.storage().record();
        assert_eq!(persisted[13], sum(&persisted[..13]));
    }

    #[test]
    fn test_blank_storage_first_boot() {
        let mut store = open(RamStorage::blank());

        let repairs = store.load().unwrap();
        assert!(repairs.contains(
            Repairs::SIGNATURE
                | Repairs::VERSION
                | Repairs::CHECKSUM
                | Repairs::STANDBY
                | Repairs::BRIGHTNESS
                | Repairs::MODE
        ));
        assert!(!store.settings().standby);
        assert_eq!(store.settings().brightness, DEFAULT_BRIGHTNESS);
        assert_eq!(store.settings().mode, ModeId::Colour);
        // Every colour value is legal, so the erased bytes survive
        assert_eq!(
            store.settings().colour,
            Rgb {
                r: 255,
                g: 255,
                b: 255
            }
        );
    }

    #[test]
    fn test_second_load_performs_no_repair() {
        let mut bytes = record_bytes(custom_settings());
        bytes[6] = 250;
        let mut store = open(RamStorage::with_record(bytes));

        assert!(!store.load().unwrap().is_empty());
        let writes = store.storage().writes;

        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.storage().writes, writes);
        assert_eq!(store.checksum(), store.storage().record()[13]);
    }

    #[test]
    fn test_setters_write_only_changed_bytes() {
        let mut store = open(RamStorage::with_record(record_bytes(
            LampSettings::default(),
        )));
        store.load().unwrap();

        store.set_brightness(100).unwrap();
        // Brightness byte and checksum byte, not adjacent
        assert_eq!(store.storage().writes, 2);
        assert_eq!(store.storage().written_bytes, 2);
        assert_eq!(store.storage().record()[6], 100);

        store.set_brightness(100).unwrap();
        assert_eq!(store.storage().writes, 2);

        store.set_mode(ModeId::Cycle).unwrap();
        assert_eq!(store.storage().writes, 4);
        assert_eq!(store.storage().record()[10], 3);

        store.set_colour(DEFAULT_COLOUR).unwrap();
        store.set_mode(ModeId::Cycle).unwrap();
        assert_eq!(store.storage().writes, 4);

        let persisted = store.storage().record();
        assert_eq!(persisted, store.record().to_bytes());
        assert_eq!(persisted[13], sum(&persisted[..13]));
    }

    #[test]
    fn test_brightness_above_ceiling_is_refused() {
        let mut store = open(RamStorage::with_record(record_bytes(
            LampSettings::default(),
        )));
        store.load().unwrap();

        assert_eq!(store.set_brightness(154), Err(StoreError::OutOfRange));
        assert_eq!(store.settings().brightness, DEFAULT_BRIGHTNESS);
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn test_standby_round_trips_through_storage() {
        let mut store = open(RamStorage::with_record(record_bytes(
            LampSettings::default(),
        )));
        store.load().unwrap();
        store.set_standby(true).unwrap();

        let mut reopened = open(RamStorage::with_record(store.storage().record()));
        assert!(reopened.load().unwrap().is_empty());
        assert!(reopened.settings().standby);
    }

    #[test]
    fn test_mutable_view_persists_on_save() {
        let mut store = open(RamStorage::with_record(record_bytes(
            LampSettings::default(),
        )));
        store.load().unwrap();

        store.settings_mut().brightness = 12;
        assert_eq!(store.storage().record()[6], DEFAULT_BRIGHTNESS);

        store.save().unwrap();
        assert_eq!(store.storage().record()[6], 12);
        assert_eq!(store.checksum(), store.storage().record()[13]);
    }

    #[test]
    fn test_storage_errors_are_returned() {
        let mut store = ConfigStore::new(BrokenStorage, &StoreConfig::default());

        assert_eq!(store.load(), Err("read failed"));
        assert_eq!(*store.settings(), LampSettings::default());
        assert_eq!(
            store.set_standby(true),
            Err(StoreError::Storage("read failed"))
        );
    }
}
