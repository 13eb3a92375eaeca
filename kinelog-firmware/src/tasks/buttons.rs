//! Button input tasks
//!
//! One task instance per physical button (active low, internal pull-up).
//! Each instance owns its pin and its debounce record, so an edge on one
//! button can never be missed while another button's edge is handled.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use kinelog_core::input::{Button, DebounceFilter};

use crate::channels::INTENT_CHANNEL;

/// Button input task, spawned once per button
#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(mut pin: Input<'static>, button: Button, debounce_ms: u32) {
    info!("Button task started: {}", button);

    let mut filter = DebounceFilter::new(debounce_ms);

    loop {
        pin.wait_for_falling_edge().await;

        let now_ms = Instant::now().as_millis();
        if !filter.on_edge(now_ms) {
            trace!("Bounce rejected on {}", button);
            continue;
        }

        let intent = button.intent();
        debug!("Button {} -> {}", button, intent);
        if INTENT_CHANNEL.try_send(intent).is_err() {
            warn!("Intent queue full, dropping {}", intent);
        }
    }
}
