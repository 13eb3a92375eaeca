//! Logger configuration types
//!
//! Timing and file-layout knobs for the data logger. Configuration is
//! compiled into the firmware; the sample counter is deliberately volatile
//! and never persisted across reboots.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of the CSV file path on the medium
pub const MAX_PATH_LEN: usize = 24;

/// Default sampling period in milliseconds
pub const DEFAULT_SAMPLE_PERIOD_MS: u32 = 1000;

/// Default debounce window in milliseconds (empirical, per-button)
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;

/// Default display refresh period for live pages in milliseconds
pub const DEFAULT_REFRESH_MS: u32 = 500;

/// Logger configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoggerConfig {
    /// Period between samples while collecting (ms)
    pub sample_period_ms: u32,
    /// Minimum time between accepted presses of one button (ms)
    pub debounce_ms: u32,
    /// Refresh period for the live display pages (ms)
    pub refresh_ms: u32,
    /// CSV file path on the medium (8.3 name for FAT compatibility)
    pub csv_path: String<MAX_PATH_LEN>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let mut csv_path = String::new();
        let _ = csv_path.push_str("MPUDATA.CSV");
        Self {
            sample_period_ms: DEFAULT_SAMPLE_PERIOD_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            refresh_ms: DEFAULT_REFRESH_MS,
            csv_path,
        }
    }
}
