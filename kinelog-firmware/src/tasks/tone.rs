//! Buzzer tone task
//!
//! Applies tone commands from the control task to the buzzer PWM slice.
//! Frequency is programmed via the slice divider and wrap value; silence
//! parks the output at zero duty.

use defmt::*;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};

use crate::channels::TONE_CMD;

/// RP2040 system clock feeding the PWM slices
const PWM_CLOCK_HZ: u32 = 125_000_000;

/// Fixed slice divider; 6.25 MHz counter clock keeps the wrap value in
/// u16 range for tones down to roughly 100 Hz
const PWM_DIVIDER: u8 = 20;

/// Buzzer task driving PWM channel B of its slice
#[embassy_executor::task]
pub async fn tone_task(mut pwm: Pwm<'static>) {
    info!("Tone task started");

    let mut config = PwmConfig::default();
    config.divider = PWM_DIVIDER.into();
    config.top = u16::MAX;
    config.compare_b = 0;
    pwm.set_config(&config);

    loop {
        let cmd = TONE_CMD.wait().await;

        if cmd.on && cmd.freq_hz > 0 {
            let top = (PWM_CLOCK_HZ / PWM_DIVIDER as u32 / cmd.freq_hz as u32)
                .saturating_sub(1)
                .min(u16::MAX as u32) as u16;
            config.top = top;
            config.compare_b = top / 2; // 50% duty square wave
            pwm.set_config(&config);
            trace!("Tone on: {} Hz", cmd.freq_hz);
        } else {
            config.compare_b = 0;
            pwm.set_config(&config);
            trace!("Tone off");
        }
    }
}
