//! RGB status LED driver
//!
//! Three discrete GPIO-driven LEDs (or one common-cathode RGB package).

use embedded_hal::digital::OutputPin;

use kinelog_core::feedback::LedColor;

/// RGB LED over three active-high output pins
pub struct RgbLed<P> {
    red: P,
    green: P,
    blue: P,
    color: LedColor,
}

impl<P: OutputPin> RgbLed<P> {
    /// Create an LED driver; starts dark
    pub fn new(red: P, green: P, blue: P) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            color: LedColor::Off,
        };
        led.set_color(LedColor::Off);
        led
    }

    /// Apply a color
    pub fn set_color(&mut self, color: LedColor) {
        let (r, g, b) = color.rgb();
        // Pin errors are ignored: GPIO writes on the supported targets
        // are infallible
        let _ = self.red.set_state(r.into());
        let _ = self.green.set_state(g.into());
        let _ = self.blue.set_state(b.into());
        self.color = color;
    }

    /// Last applied color
    pub fn color(&self) -> LedColor {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct PinMock {
        high: bool,
    }

    impl ErrorType for PinMock {
        type Error = Infallible;
    }

    impl OutputPin for PinMock {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_starts_dark() {
        let led = RgbLed::new(PinMock::default(), PinMock::default(), PinMock::default());
        assert_eq!(led.color(), LedColor::Off);
        assert!(!led.red.high && !led.green.high && !led.blue.high);
    }

    #[test]
    fn test_color_pin_levels() {
        let mut led = RgbLed::new(PinMock::default(), PinMock::default(), PinMock::default());

        led.set_color(LedColor::Red);
        assert!(led.red.high && !led.green.high && !led.blue.high);

        led.set_color(LedColor::Purple);
        assert!(led.red.high && !led.green.high && led.blue.high);

        led.set_color(LedColor::Off);
        assert!(!led.red.high && !led.green.high && !led.blue.high);
    }
}
