//! Debounced button input
//!
//! Converts raw asynchronous edge events into clean, rate-limited logical
//! intents. The edge side runs in interrupt-sensitive context and must not
//! perform I/O; everything here is pure bookkeeping on timestamps.

pub mod debounce;
pub mod intent;

pub use debounce::DebounceFilter;
pub use intent::{Button, Intent};
