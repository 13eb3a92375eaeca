//! Per-button debounce filter

use crate::config::DEFAULT_DEBOUNCE_MS;

/// Debounce record for one button
///
/// Accepts an edge iff at least `window_ms` has passed since the last
/// accepted edge of this button. Rejected edges do not update the record,
/// so a burst of bounces collapses to the first edge only.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceFilter {
    window_ms: u32,
    last_accepted: Option<u64>,
}

impl DebounceFilter {
    /// Create a filter with the given window in milliseconds
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_accepted: None,
        }
    }

    /// Process an edge at `now_ms`; returns true if the press is accepted
    pub fn on_edge(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_accepted {
            if now_ms.saturating_sub(last) < self.window_ms as u64 {
                return false;
            }
        }
        self.last_accepted = Some(now_ms);
        true
    }
}

impl Default for DebounceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_edge_accepted() {
        let mut filter = DebounceFilter::new(300);
        assert!(filter.on_edge(0));
    }

    #[test]
    fn test_edge_inside_window_rejected() {
        let mut filter = DebounceFilter::new(300);
        assert!(filter.on_edge(1000));
        assert!(!filter.on_edge(1299));
        assert!(filter.on_edge(1300));
    }

    #[test]
    fn test_rejection_does_not_extend_window() {
        let mut filter = DebounceFilter::new(300);
        assert!(filter.on_edge(1000));
        // Bounces at 1100 and 1250 must not push the window out
        assert!(!filter.on_edge(1100));
        assert!(!filter.on_edge(1250));
        assert!(filter.on_edge(1301));
    }

    proptest! {
        /// A burst of edges all inside one window emits exactly one accept
        #[test]
        fn prop_burst_collapses_to_one(
            start in 0u64..1_000_000,
            mut offsets in proptest::collection::vec(0u64..300, 1..20),
        ) {
            offsets.sort_unstable();
            let mut filter = DebounceFilter::new(300);
            let accepted = offsets
                .iter()
                .filter(|&&off| filter.on_edge(start + off))
                .count();
            prop_assert_eq!(accepted, 1);
        }

        /// Edges spaced at least one window apart are all accepted
        #[test]
        fn prop_slow_presses_all_accepted(
            start in 0u64..1_000_000,
            gaps in proptest::collection::vec(300u64..5_000, 1..10),
        ) {
            let mut filter = DebounceFilter::new(300);
            let mut now = start;
            prop_assert!(filter.on_edge(now));
            for gap in gaps {
                now += gap;
                prop_assert!(filter.on_edge(now));
            }
        }
    }
}
