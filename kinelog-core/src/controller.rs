//! Top-level controller
//!
//! Composes the storage and collection managers, the feedback sequencer
//! and the display presenter. The controller is the only mutator of system
//! state; button presses reach it as already-debounced [`Intent`] values
//! drained by the control loop, one per call, in arrival order.

use crate::collect::{CollectError, Collector};
use crate::config::LoggerConfig;
use crate::display::{Page, Presenter, StatusView};
use crate::feedback::{LedColor, Sequencer, ToneCommand};
use crate::input::Intent;
use crate::storage::StorageManager;
use crate::traits::{DisplayBackend, DisplayError, ImuSample, StorageError, StorageMedium};

/// Half-period of the latched-fault LED alternation
pub const FAULT_BLINK_MS: u32 = 250;

/// Errors surfaced to the control loop for logging
///
/// Everything is already handled internally (state, display, feedback) by
/// the time one of these is returned; the loop only decides between "log
/// and continue" and "log and observe the latched fault".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    Storage(StorageError),
    Collect(CollectError),
}

impl From<StorageError> for ControlError {
    fn from(e: StorageError) -> Self {
        ControlError::Storage(e)
    }
}

impl From<CollectError> for ControlError {
    fn from(e: CollectError) -> Self {
        ControlError::Collect(e)
    }
}

/// System controller owning all mutable state
pub struct Controller<M: StorageMedium> {
    storage: StorageManager<M>,
    collector: Collector,
    sequencer: Sequencer,
    presenter: Presenter,
    view: StatusView,
    led: LedColor,
    /// Latched fault; never self-clears, recovery requires reset
    faulted: bool,
    /// Long fault tone still waiting for the sequencer to go idle
    fault_tone_pending: bool,
    fault_blink_on: bool,
    fault_blink_deadline_ms: u64,
    pending_tone: Option<ToneCommand>,
}

impl<M: StorageMedium> Controller<M> {
    /// Create a controller in the pre-boot state
    pub fn new(medium: M, config: &LoggerConfig) -> Self {
        let mut ctrl = Self {
            storage: StorageManager::new(medium, config.csv_path.as_str()),
            collector: Collector::new(config.sample_period_ms),
            sequencer: Sequencer::new(),
            presenter: Presenter::new(config.refresh_ms),
            view: StatusView::default(),
            led: LedColor::Yellow,
            faulted: false,
            fault_tone_pending: false,
            fault_blink_on: false,
            fault_blink_deadline_ms: 0,
            pending_tone: None,
        };
        ctrl.set_status("INICIALIZ.");
        ctrl
    }

    /// Run the boot sequence: try to mount the medium automatically
    ///
    /// A mount failure at boot is advisory, not fatal: the system stays
    /// operable unmounted and the operator can retry with the storage
    /// button.
    pub fn boot(&mut self, now_ms: u64) -> Result<(), ControlError> {
        match self.storage.mount() {
            Ok(()) => {
                self.set_status("PRONTO");
                self.led = LedColor::Green;
                if let Some(cmd) = self.sequencer.start_ready(now_ms) {
                    self.pending_tone = Some(cmd);
                }
                Ok(())
            }
            Err(e) => {
                self.set_status("ERRO SD");
                self.set_message("Verifique cartao");
                self.led = LedColor::Off;
                Err(e.into())
            }
        }
    }

    /// Process one debounced intent against the current state
    pub fn handle_intent(&mut self, intent: Intent, now_ms: u64) -> Result<(), ControlError> {
        if self.faulted {
            // Latched: only a reset recovers
            return Ok(());
        }

        match intent {
            Intent::ToggleStorage => {
                if self.storage.is_mounted() {
                    self.unmount(now_ms)
                } else {
                    self.mount()
                }
            }
            Intent::ToggleCollection => {
                if self.collector.is_collecting() {
                    self.stop_collection(now_ms);
                    Ok(())
                } else {
                    self.start_collection(now_ms)
                }
            }
            Intent::CycleScreen => {
                self.presenter.cycle();
                Ok(())
            }
        }
    }

    /// One cooperative loop iteration
    ///
    /// Feeds the sequencer, runs the sample scheduler against `sample`,
    /// and drives the latched-fault indication. Returns the fatal error on
    /// the iteration that latches it.
    pub fn tick(&mut self, now_ms: u64, sample: &ImuSample) -> Result<(), ControlError> {
        self.view.sample = *sample;

        if let Some(cmd) = self.sequencer.poll(now_ms) {
            self.pending_tone = Some(cmd);
        }

        if self.faulted {
            self.fault_blink(now_ms);
            return Ok(());
        }

        match self.collector.poll(now_ms, sample, &mut self.storage) {
            Ok(Some(n)) => {
                self.view.sample_count = n;
                self.set_message("Dados salvos");
                self.led = LedColor::Red;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                // Medium removed mid-write: stop everything and latch
                self.faulted = true;
                self.fault_tone_pending = true;
                self.fault_blink_on = true;
                self.fault_blink_deadline_ms = now_ms + FAULT_BLINK_MS as u64;
                self.set_status("ERRO SD");
                self.set_message("Falha de gravacao");
                Err(e.into())
            }
        }
    }

    /// Draw the active page if a redraw is due
    pub fn render_if_needed<D: DisplayBackend>(
        &mut self,
        now_ms: u64,
        display: &mut D,
    ) -> Result<bool, DisplayError> {
        if !self.presenter.needs_render(now_ms) {
            return Ok(false);
        }
        self.presenter.render(now_ms, &self.view, display)?;
        Ok(true)
    }

    /// True while a sample append is due on the next `tick`
    ///
    /// The loop can surface this as a write-in-progress LED before the
    /// blocking append starts.
    pub fn write_due(&self, now_ms: u64) -> bool {
        !self.faulted
            && self.collector.is_collecting()
            && now_ms >= self.collector.next_deadline_ms()
    }

    /// Take the tone command produced by this iteration, if any
    pub fn take_tone_command(&mut self) -> Option<ToneCommand> {
        self.pending_tone.take()
    }

    /// Current LED color, including the fault alternation
    pub fn led(&self) -> LedColor {
        if self.faulted {
            if self.fault_blink_on {
                LedColor::Purple
            } else {
                LedColor::Off
            }
        } else {
            self.led
        }
    }

    /// True iff the fatal-write fault is latched
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// True iff the medium is mounted
    pub fn is_mounted(&self) -> bool {
        self.storage.is_mounted()
    }

    /// True iff collection is active
    pub fn is_collecting(&self) -> bool {
        self.collector.is_collecting()
    }

    /// Samples appended since boot
    pub fn sample_count(&self) -> u32 {
        self.collector.sample_count()
    }

    /// Active display page
    pub fn page(&self) -> Page {
        self.presenter.page()
    }

    /// Access the storage manager (for tests and diagnostics)
    pub fn storage(&self) -> &StorageManager<M> {
        &self.storage
    }

    fn mount(&mut self) -> Result<(), ControlError> {
        match self.storage.mount() {
            Ok(()) => {
                self.set_status("PRONTO");
                self.set_message("");
                self.led = LedColor::Green;
                Ok(())
            }
            Err(e) => {
                self.set_status("ERRO SD");
                self.set_message("Falha ao montar");
                Err(e.into())
            }
        }
    }

    /// Unmount, forcing collection to stop first so no write is in flight
    fn unmount(&mut self, now_ms: u64) -> Result<(), ControlError> {
        if self.collector.is_collecting() {
            self.stop_collection(now_ms);
            // Stop feedback status text is overwritten below; the unmount
            // transition owns the display
        }
        let result = self.storage.unmount();
        self.set_status("SD OFF");
        self.set_message("");
        self.led = LedColor::Off;
        result.map_err(ControlError::from)
    }

    fn start_collection(&mut self, now_ms: u64) -> Result<(), ControlError> {
        match self.collector.start(now_ms, self.storage.is_mounted()) {
            Ok(true) => {
                self.set_status("GRAVANDO");
                self.set_message("");
                self.led = LedColor::Red;
                // A busy sequencer drops the request; never clobber a
                // command the loop has not taken yet
                if let Some(cmd) = self.sequencer.start_short(now_ms) {
                    self.pending_tone = Some(cmd);
                }
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                self.set_message("SD nao montado");
                Err(e.into())
            }
        }
    }

    fn stop_collection(&mut self, now_ms: u64) {
        if self.collector.stop() {
            self.set_status("PAUSADA");
            self.set_message("");
            self.led = LedColor::Green;
            if let Some(cmd) = self.sequencer.start_double(now_ms) {
                self.pending_tone = Some(cmd);
            }
        }
    }

    fn fault_blink(&mut self, now_ms: u64) {
        if self.fault_tone_pending {
            // Critical pattern: wait for the sequencer to idle so the long
            // tone is guaranteed audible, then issue it
            if self.sequencer.is_idle() {
                if let Some(cmd) = self.sequencer.start_long(now_ms) {
                    self.pending_tone = Some(cmd);
                }
                self.fault_tone_pending = false;
            }
        }
        if now_ms >= self.fault_blink_deadline_ms {
            self.fault_blink_on = !self.fault_blink_on;
            self.fault_blink_deadline_ms = now_ms + FAULT_BLINK_MS as u64;
        }
    }

    fn set_status(&mut self, text: &str) {
        self.view.status.clear();
        let _ = self.view.status.push_str(text);
        self.presenter.mark_dirty();
    }

    fn set_message(&mut self, text: &str) {
        self.view.message.clear();
        let _ = self.view.message.push_str(text);
        self.presenter.mark_dirty();
    }
}
