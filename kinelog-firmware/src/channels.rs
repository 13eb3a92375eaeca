//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use kinelog_core::feedback::{LedColor, ToneCommand};
use kinelog_core::input::Intent;

/// Channel capacity for button intents
const INTENT_CHANNEL_SIZE: usize = 8;

/// Debounced button intents, consumed by the control task
///
/// Intents arriving while the queue is full are dropped; the button can
/// simply be pressed again.
pub static INTENT_CHANNEL: Channel<CriticalSectionRawMutex, Intent, INTENT_CHANNEL_SIZE> =
    Channel::new();

/// Tone command signal (updated by the control task)
pub static TONE_CMD: Signal<CriticalSectionRawMutex, ToneCommand> = Signal::new();

/// LED colour signal (updated by the control task)
pub static LED_CMD: Signal<CriticalSectionRawMutex, LedColor> = Signal::new();
