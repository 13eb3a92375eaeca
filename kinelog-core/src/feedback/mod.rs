//! Operator feedback: tone patterns and LED color
//!
//! The sequencer is a non-blocking state machine polled once per control
//! loop iteration; it emits [`ToneCommand`] values that a hardware task
//! applies to the single buzzer output.

pub mod sequencer;

pub use sequencer::{Sequencer, ToneState};

/// RGB status LED color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    #[default]
    Off,
    /// Collection active
    Red,
    /// Mounted, idle
    Green,
    /// Write in progress
    Blue,
    /// Booting
    Yellow,
    /// Latched fault (alternates with Off)
    Purple,
}

impl LedColor {
    /// (red, green, blue) pin levels for this color
    pub const fn rgb(self) -> (bool, bool, bool) {
        match self {
            LedColor::Off => (false, false, false),
            LedColor::Red => (true, false, false),
            LedColor::Green => (false, true, false),
            LedColor::Blue => (false, false, true),
            LedColor::Yellow => (true, true, false),
            LedColor::Purple => (true, false, true),
        }
    }
}

/// Command for the single tone output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneCommand {
    /// Output frequency in Hz (meaningful only while on)
    pub freq_hz: u16,
    /// Tone output enabled
    pub on: bool,
}

impl ToneCommand {
    /// Silence the output
    pub const fn off() -> Self {
        Self { freq_hz: 0, on: false }
    }

    /// Sound the output at `freq_hz`
    pub const fn beep(freq_hz: u16) -> Self {
        Self { freq_hz, on: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_rgb_levels() {
        assert_eq!(LedColor::Off.rgb(), (false, false, false));
        assert_eq!(LedColor::Red.rgb(), (true, false, false));
        assert_eq!(LedColor::Purple.rgb(), (true, false, true));
    }
}
