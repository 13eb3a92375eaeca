//! Non-blocking tone pattern sequencer
//!
//! One physical tone output, one pattern at a time. Patterns never
//! interrupt each other: a start request while a pattern is in flight is
//! silently dropped, so callers get best-effort semantics. A caller that
//! needs a guaranteed-audible tone must wait for `is_idle()` first.

use super::ToneCommand;

/// Short beep duration and pitch (start pattern, first half of double)
pub const SHORT_BEEP_MS: u32 = 80;
pub const SHORT_BEEP_HZ: u16 = 2000;

/// Silent gap inside the double-beep pattern
pub const PAUSE_MS: u32 = 60;

/// Long beep duration and pitch (fault indication)
pub const LONG_BEEP_MS: u32 = 400;
pub const LONG_BEEP_HZ: u16 = 800;

/// Ready beep duration and pitch (boot complete)
pub const READY_BEEP_MS: u32 = 120;
pub const READY_BEEP_HZ: u16 = 1500;

/// Sequencer states
///
/// At most one beep sub-state is active at any time, mirroring the single
/// physical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneState {
    /// No pattern in flight, output silent
    #[default]
    Idle,
    /// First (or only) short beep
    ShortBeep,
    /// Silent gap between the two beeps of a double pattern
    PauseBeforeSecond,
    /// Second short beep of a double pattern
    SecondBeep,
    /// Single long beep
    LongBeep,
    /// Boot-complete chirp
    ReadyBeep,
}

/// Cooperatively-scheduled tone pattern state machine
///
/// `poll` advances the pattern on deadline expiry and returns the command
/// for each newly entered state; the caller forwards commands to the tone
/// output. Between transitions `poll` returns `None` and costs one compare.
#[derive(Debug, Default)]
pub struct Sequencer {
    state: ToneState,
    deadline_ms: u64,
    /// Whether the current short beep chains into a second one
    double: bool,
}

impl Sequencer {
    /// Create an idle sequencer
    pub const fn new() -> Self {
        Self {
            state: ToneState::Idle,
            deadline_ms: 0,
            double: false,
        }
    }

    /// Current state
    pub fn state(&self) -> ToneState {
        self.state
    }

    /// True iff no pattern is in flight
    pub fn is_idle(&self) -> bool {
        self.state == ToneState::Idle
    }

    /// Start a single short beep; dropped unless idle
    pub fn start_short(&mut self, now_ms: u64) -> Option<ToneCommand> {
        self.enter_short(now_ms, false)
    }

    /// Start a double beep (short, pause, short); dropped unless idle
    pub fn start_double(&mut self, now_ms: u64) -> Option<ToneCommand> {
        self.enter_short(now_ms, true)
    }

    /// Start a long beep; dropped unless idle
    pub fn start_long(&mut self, now_ms: u64) -> Option<ToneCommand> {
        if !self.is_idle() {
            return None;
        }
        self.state = ToneState::LongBeep;
        self.deadline_ms = now_ms + LONG_BEEP_MS as u64;
        Some(ToneCommand::beep(LONG_BEEP_HZ))
    }

    /// Start the ready chirp; dropped unless idle
    pub fn start_ready(&mut self, now_ms: u64) -> Option<ToneCommand> {
        if !self.is_idle() {
            return None;
        }
        self.state = ToneState::ReadyBeep;
        self.deadline_ms = now_ms + READY_BEEP_MS as u64;
        Some(ToneCommand::beep(READY_BEEP_HZ))
    }

    fn enter_short(&mut self, now_ms: u64, double: bool) -> Option<ToneCommand> {
        if !self.is_idle() {
            return None;
        }
        self.state = ToneState::ShortBeep;
        self.deadline_ms = now_ms + SHORT_BEEP_MS as u64;
        self.double = double;
        Some(ToneCommand::beep(SHORT_BEEP_HZ))
    }

    /// Advance the pattern if the current state's deadline has expired
    ///
    /// Returns the command for the newly entered state, or `None` when
    /// nothing changed. Deadlines restart from `now`, so a late poll does
    /// not shorten the following state.
    pub fn poll(&mut self, now_ms: u64) -> Option<ToneCommand> {
        if self.state == ToneState::Idle || now_ms < self.deadline_ms {
            return None;
        }

        match self.state {
            ToneState::Idle => None,
            ToneState::ShortBeep => {
                if self.double {
                    self.state = ToneState::PauseBeforeSecond;
                    self.deadline_ms = now_ms + PAUSE_MS as u64;
                } else {
                    self.state = ToneState::Idle;
                }
                Some(ToneCommand::off())
            }
            ToneState::PauseBeforeSecond => {
                self.state = ToneState::SecondBeep;
                self.deadline_ms = now_ms + SHORT_BEEP_MS as u64;
                Some(ToneCommand::beep(SHORT_BEEP_HZ))
            }
            ToneState::SecondBeep | ToneState::LongBeep | ToneState::ReadyBeep => {
                self.state = ToneState::Idle;
                Some(ToneCommand::off())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_beep_lifecycle() {
        let mut seq = Sequencer::new();
        assert!(seq.is_idle());

        let cmd = seq.start_short(0).unwrap();
        assert_eq!(cmd, ToneCommand::beep(SHORT_BEEP_HZ));
        assert_eq!(seq.state(), ToneState::ShortBeep);

        // Before the deadline nothing happens
        assert!(seq.poll(79).is_none());

        // At the deadline the tone goes off and the sequencer idles
        let cmd = seq.poll(80).unwrap();
        assert_eq!(cmd, ToneCommand::off());
        assert!(seq.is_idle());
    }

    #[test]
    fn test_double_beep_walks_all_states() {
        let mut seq = Sequencer::new();
        assert!(seq.start_double(0).is_some());
        assert_eq!(seq.state(), ToneState::ShortBeep);

        assert_eq!(seq.poll(80), Some(ToneCommand::off()));
        assert_eq!(seq.state(), ToneState::PauseBeforeSecond);

        assert_eq!(seq.poll(140), Some(ToneCommand::beep(SHORT_BEEP_HZ)));
        assert_eq!(seq.state(), ToneState::SecondBeep);

        assert_eq!(seq.poll(220), Some(ToneCommand::off()));
        assert!(seq.is_idle());
    }

    #[test]
    fn test_patterns_never_interrupt_each_other() {
        let mut seq = Sequencer::new();
        assert!(seq.start_long(0).is_some());
        let state_before = seq.state();

        // Every start request while busy is dropped
        assert!(seq.start_short(10).is_none());
        assert!(seq.start_double(10).is_none());
        assert!(seq.start_long(10).is_none());
        assert!(seq.start_ready(10).is_none());
        assert_eq!(seq.state(), state_before);

        // Once idle, a new pattern is accepted
        assert_eq!(seq.poll(LONG_BEEP_MS as u64), Some(ToneCommand::off()));
        assert!(seq.start_ready(500).is_some());
        assert_eq!(seq.state(), ToneState::ReadyBeep);
    }

    #[test]
    fn test_late_poll_does_not_shorten_next_state() {
        let mut seq = Sequencer::new();
        assert!(seq.start_double(0).is_some());

        // Poll arrives 200ms late; the pause still gets its full duration
        assert!(seq.poll(280).is_some());
        assert_eq!(seq.state(), ToneState::PauseBeforeSecond);
        assert!(seq.poll(280 + PAUSE_MS as u64 - 1).is_none());
        assert!(seq.poll(280 + PAUSE_MS as u64).is_some());
        assert_eq!(seq.state(), ToneState::SecondBeep);
    }

    #[test]
    fn test_long_and_ready_return_to_idle() {
        let mut seq = Sequencer::new();
        assert_eq!(seq.start_long(0), Some(ToneCommand::beep(LONG_BEEP_HZ)));
        assert_eq!(seq.poll(LONG_BEEP_MS as u64), Some(ToneCommand::off()));
        assert!(seq.is_idle());

        assert_eq!(seq.start_ready(1000), Some(ToneCommand::beep(READY_BEEP_HZ)));
        assert_eq!(
            seq.poll(1000 + READY_BEEP_MS as u64),
            Some(ToneCommand::off())
        );
        assert!(seq.is_idle());
    }

    #[test]
    fn test_idle_poll_is_silent() {
        let mut seq = Sequencer::new();
        assert!(seq.poll(0).is_none());
        assert!(seq.poll(u64::MAX).is_none());
    }
}
