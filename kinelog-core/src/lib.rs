//! Board-agnostic control plane for the Kinelog data logger
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (IMU sensor, storage medium, display)
//! - Button debouncing and intent mapping
//! - Storage lifecycle (mount/unmount, append-only CSV file)
//! - Collection lifecycle (fixed-period sample scheduler)
//! - Non-blocking feedback sequencer (tone patterns, LED color)
//! - Display presenter (status / live values / chart pages)
//! - Top-level controller composing the above

#![no_std]
#![deny(unsafe_code)]

pub mod collect;
pub mod config;
pub mod controller;
pub mod display;
pub mod feedback;
pub mod input;
pub mod storage;
pub mod traits;
