//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod buttons;
pub mod control;
pub mod led;
pub mod tone;

pub use buttons::button_task;
pub use control::control_task;
pub use led::led_task;
pub use tone::tone_task;
