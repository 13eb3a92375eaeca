//! Status LED task
//!
//! Applies LED colour commands from the control task to the RGB LED pins.

use defmt::*;
use embassy_rp::gpio::Output;

use kinelog_drivers::indicator::RgbLed;

use crate::channels::LED_CMD;

/// RGB LED task
#[embassy_executor::task]
pub async fn led_task(red: Output<'static>, green: Output<'static>, blue: Output<'static>) {
    info!("LED task started");

    let mut led = RgbLed::new(red, green, blue);

    loop {
        let color = LED_CMD.wait().await;
        if color != led.color() {
            trace!("LED -> {}", color);
            led.set_color(color);
        }
    }
}
