//! Adapter from [`LedDriver`] to `smart-leds` strip writers

use smart_leds::{SmartLedsWrite, brightness};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::LedDriver;
use crate::color::Rgb;

/// Drives any [`SmartLedsWrite`] strip, scaling every frame by the global
/// brightness before it is written.
pub struct SmartLedsOutput<W> {
    writer: W,
    brightness: u8,
}

impl<W> SmartLedsOutput<W>
where
    W: SmartLedsWrite,
    W::Color: From<Rgb>,
{
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            brightness: u8::MAX,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> LedDriver for SmartLedsOutput<W>
where
    W: SmartLedsWrite,
    W::Color: From<Rgb>,
{
    fn write(&mut self, colors: &[Rgb]) {
        let frame = brightness(colors.iter().copied(), self.brightness);
        if self.writer.write(frame).is_err() {
            // A dropped frame is replaced by the next one
            #[cfg(feature = "esp32-log")]
            println!("[SmartLedsOutput.write] strip write failed");
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }
}
