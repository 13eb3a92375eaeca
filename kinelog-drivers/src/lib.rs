//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in kinelog-core for the logger hardware:
//!
//! - MPU-6050 six-axis IMU (blocking I2C)
//! - SSD1306 status OLED (blocking I2C)
//! - RGB status LED (three GPIO pins)

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod indicator;
pub mod sensor;
