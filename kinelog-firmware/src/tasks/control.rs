//! Main control task
//!
//! Owns the logger controller, the IMU, and the OLED. Drains button
//! intents, drives the periodic tick, and publishes LED and tone commands
//! to their hardware tasks.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking as I2cBlocking, I2c};
use embassy_rp::spi::{Blocking as SpiBlocking, Spi};
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;

use kinelog_core::controller::Controller;
use kinelog_core::feedback::LedColor;
use kinelog_core::traits::ImuSensor;
use kinelog_drivers::display::Ssd1306;
use kinelog_drivers::sensor::Mpu6050;

use crate::channels::{INTENT_CHANNEL, LED_CMD, TONE_CMD};
use crate::sdcard::{FixedClock, SdMedium};

/// Control loop tick interval in milliseconds
pub const CONTROL_TICK_MS: u64 = 10;

/// Ticks between periodic status log lines (5 s)
const STATUS_LOG_TICKS: u32 = 500;

/// SPI device for the SD card slot
pub type SdSpiDevice = ExclusiveDevice<Spi<'static, SpiBlocking>, Output<'static>, Delay>;

/// Storage medium the controller runs against
pub type LoggerMedium = SdMedium<SdCard<SdSpiDevice, Delay>, FixedClock>;

/// Control task - main coordination loop
#[embassy_executor::task]
pub async fn control_task(
    mut controller: Controller<LoggerMedium>,
    mut sensor: Mpu6050<I2c<'static, I2cBlocking>>,
    mut display: Ssd1306<I2c<'static, I2cBlocking>>,
) {
    info!("Control task started");

    let start = Instant::now();

    // Boot: try to mount the card that may already be inserted
    let now = start.elapsed().as_millis();
    match controller.boot(now) {
        Ok(()) => info!("Card mounted at boot"),
        Err(e) => warn!("Boot mount failed: {}", e),
    }
    publish_feedback(&mut controller);
    render(&mut controller, now, &mut display);

    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_TICK_MS));
    let mut ticks: u32 = 0;

    loop {
        match select(INTENT_CHANNEL.receive(), ticker.next()).await {
            Either::First(intent) => {
                let now = start.elapsed().as_millis();
                info!("Intent: {}", intent);
                if let Err(e) = controller.handle_intent(intent, now) {
                    warn!("Intent rejected: {}", e);
                }
                publish_feedback(&mut controller);
                render(&mut controller, now, &mut display);
            }
            Either::Second(()) => {
                let now = start.elapsed().as_millis();

                // Surface the write window before the blocking append
                if controller.write_due(now) {
                    LED_CMD.signal(LedColor::Blue);
                }

                let sample = sensor.read();
                if let Err(e) = controller.tick(now, &sample) {
                    error!("Collection stopped: {}", e);
                }
                publish_feedback(&mut controller);
                render(&mut controller, now, &mut display);

                ticks = ticks.wrapping_add(1);
                if ticks % STATUS_LOG_TICKS == 0 {
                    info!(
                        "Status: mounted={} collecting={} faulted={} samples={}",
                        controller.is_mounted(),
                        controller.is_collecting(),
                        controller.is_faulted(),
                        controller.sample_count()
                    );
                }
            }
        }
    }
}

/// Push this iteration's tone and LED state to the hardware tasks
fn publish_feedback(controller: &mut Controller<LoggerMedium>) {
    if let Some(tone) = controller.take_tone_command() {
        TONE_CMD.signal(tone);
    }
    LED_CMD.signal(controller.led());
}

fn render(
    controller: &mut Controller<LoggerMedium>,
    now_ms: u64,
    display: &mut Ssd1306<I2c<'static, I2cBlocking>>,
) {
    if let Err(e) = controller.render_if_needed(now_ms, display) {
        warn!("Display write failed: {}", e);
    }
}
