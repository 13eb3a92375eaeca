//! Collection lifecycle manager
//!
//! Owns the collecting/idle state and the fixed-period sample scheduler.
//! Each due poll performs exactly one sample-and-append cycle; the next
//! deadline is always `now + period` (deadline-based catch-up), so a
//! system hiccup never causes a burst of queued samples.

use core::fmt::Write;

use heapless::String;

use crate::storage::StorageManager;
use crate::traits::{ImuSample, StorageError, StorageMedium};

/// Maximum length of one formatted CSV record
pub const MAX_RECORD_LEN: usize = 128;

/// Collection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CollectState {
    /// Periodic sampling stopped
    Idle,
    /// Periodic sampling active
    Collecting,
}

/// Collection errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CollectError {
    /// `start` requires a mounted medium
    StorageNotMounted,
    /// Append failed while actively collecting (medium removed mid-run)
    ///
    /// This is fatal: the mount check at start is advisory, but removable
    /// media can be physically ejected at any time, and a lost write means
    /// the file can no longer be trusted. Collection stops and the caller
    /// latches a fault.
    WriteFatal(StorageError),
}

/// Periodic sample collector
#[derive(Debug)]
pub struct Collector {
    state: CollectState,
    period_ms: u32,
    next_deadline_ms: u64,
    sample_counter: u32,
}

impl Collector {
    /// Create an idle collector with the given sample period
    pub const fn new(period_ms: u32) -> Self {
        Self {
            state: CollectState::Idle,
            period_ms,
            next_deadline_ms: 0,
            sample_counter: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> CollectState {
        self.state
    }

    /// True iff periodic sampling is active
    pub fn is_collecting(&self) -> bool {
        self.state == CollectState::Collecting
    }

    /// Samples appended since boot (monotone, never reset)
    pub fn sample_count(&self) -> u32 {
        self.sample_counter
    }

    /// Absolute time of the next scheduled sample (meaningful only while
    /// collecting)
    pub fn next_deadline_ms(&self) -> u64 {
        self.next_deadline_ms
    }

    /// Start collecting; the first sample is due immediately
    ///
    /// Returns `Ok(true)` when collection actually started, `Ok(false)`
    /// when already collecting (guarded no-op).
    pub fn start(&mut self, now_ms: u64, storage_mounted: bool) -> Result<bool, CollectError> {
        if !storage_mounted {
            return Err(CollectError::StorageNotMounted);
        }
        if self.state == CollectState::Collecting {
            return Ok(false);
        }
        self.state = CollectState::Collecting;
        self.next_deadline_ms = now_ms;
        Ok(true)
    }

    /// Stop collecting; returns true if a collection was actually stopped
    pub fn stop(&mut self) -> bool {
        if self.state == CollectState::Idle {
            return false;
        }
        self.state = CollectState::Idle;
        true
    }

    /// Run the scheduler for one loop iteration
    ///
    /// When a sample is due, reschedules the deadline, formats one record
    /// from `sample` and appends it through `storage`. Returns the sample
    /// number on append, `None` when nothing was due. An append failure
    /// stops collection and is reported as [`CollectError::WriteFatal`].
    pub fn poll<M: StorageMedium>(
        &mut self,
        now_ms: u64,
        sample: &ImuSample,
        storage: &mut StorageManager<M>,
    ) -> Result<Option<u32>, CollectError> {
        if self.state != CollectState::Collecting || now_ms < self.next_deadline_ms {
            return Ok(None);
        }

        // Catch-up policy: a missed deadline is not compounded
        self.next_deadline_ms = now_ms + self.period_ms as u64;
        self.sample_counter += 1;

        let record = format_record(self.sample_counter, sample);
        match storage.append_record(record.as_bytes()) {
            Ok(()) => Ok(Some(self.sample_counter)),
            Err(e) => {
                self.state = CollectState::Idle;
                Err(CollectError::WriteFatal(e))
            }
        }
    }
}

/// Format one CSV data row
///
/// Column layout matches [`crate::storage::CSV_HEADER`]: unsigned counter,
/// six floats at 3 decimal places, temperature at 2, comma-separated, no
/// quoting, newline-terminated.
pub fn format_record(counter: u32, s: &ImuSample) -> String<MAX_RECORD_LEN> {
    let mut line = String::new();
    let _ = write!(
        line,
        "{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.2}\n",
        counter, s.accel_x, s.accel_y, s.accel_z, s.gyro_x, s.gyro_y, s.gyro_z, s.temp_c
    );
    line
}
