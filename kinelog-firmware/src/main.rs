//! Kinelog - motion data-acquisition logger firmware
//!
//! Main firmware binary for the RP2040 logger board. Samples an MPU-6050
//! IMU on a fixed period and appends CSV records to a FAT-formatted SD
//! card, with button control, an OLED status display, an RGB state LED
//! and a piezo buzzer for feedback.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;
use {defmt_rtt as _, panic_probe as _};

use kinelog_core::config::LoggerConfig;
use kinelog_core::controller::Controller;
use kinelog_core::input::Button;
use kinelog_drivers::display::Ssd1306;
use kinelog_drivers::sensor::Mpu6050;

use crate::sdcard::{FixedClock, SdMedium};

mod channels;
mod sdcard;
mod tasks;

/// SPI frequency during SD card identification
const SD_INIT_FREQ_HZ: u32 = 400_000;

/// SPI frequency once the card is identified
const SD_DATA_FREQ_HZ: u32 = 16_000_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Kinelog firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = LoggerConfig::default();

    // MPU-6050 on I2C0 (GPIO0 SDA / GPIO1 SCL)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let imu_bus = I2c::new_blocking(p.I2C0, p.PIN_1, p.PIN_0, i2c_config);
    let mut sensor = Mpu6050::new(imu_bus);
    match sensor.init() {
        Ok(()) => info!("MPU-6050 ready"),
        Err(_) => warn!("MPU-6050 init failed, samples will hold last value"),
    }

    // Status OLED on I2C1 (GPIO14 SDA / GPIO15 SCL)
    let oled_bus = I2c::new_blocking(p.I2C1, p.PIN_15, p.PIN_14, i2c::Config::default());
    let mut display = Ssd1306::new(oled_bus);
    if display.init().is_err() {
        warn!("OLED init failed");
    }

    // SD card on SPI0 (GPIO16 MISO / GPIO17 CS / GPIO18 SCK / GPIO19 MOSI)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SD_INIT_FREQ_HZ;
    let sd_bus = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);
    let sd_cs = Output::new(p.PIN_17, Level::High);
    let sd_device = ExclusiveDevice::new(sd_bus, sd_cs, Delay).unwrap();
    let sd = SdCard::new(sd_device, Delay);
    match sd.num_bytes() {
        Ok(size) => {
            info!("SD card detected: {} bytes", size);
            // Identification done, data transfers can run faster
            sd.spi(|dev| dev.bus_mut().set_frequency(SD_DATA_FREQ_HZ));
        }
        Err(_) => warn!("No SD card detected at boot"),
    }
    let medium = SdMedium::new(sd, FixedClock);

    let controller = Controller::new(medium, &config);

    // Control buttons (active low with pull-ups)
    let storage_btn = Input::new(p.PIN_5, Pull::Up);
    let collect_btn = Input::new(p.PIN_6, Pull::Up);
    let screen_btn = Input::new(p.PIN_22, Pull::Up);

    // RGB status LED
    let led_red = Output::new(p.PIN_13, Level::Low);
    let led_green = Output::new(p.PIN_11, Level::Low);
    let led_blue = Output::new(p.PIN_12, Level::Low);

    // Piezo buzzer on PWM channel B
    let buzzer = Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, pwm::Config::default());

    spawner
        .spawn(tasks::button_task(
            storage_btn,
            Button::Storage,
            config.debounce_ms,
        ))
        .unwrap();
    spawner
        .spawn(tasks::button_task(
            collect_btn,
            Button::Collect,
            config.debounce_ms,
        ))
        .unwrap();
    spawner
        .spawn(tasks::button_task(
            screen_btn,
            Button::Screen,
            config.debounce_ms,
        ))
        .unwrap();
    spawner
        .spawn(tasks::led_task(led_red, led_green, led_blue))
        .unwrap();
    spawner.spawn(tasks::tone_task(buzzer)).unwrap();
    spawner
        .spawn(tasks::control_task(controller, sensor, display))
        .unwrap();

    info!("All tasks spawned");
}
