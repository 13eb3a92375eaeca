//! Display presenter
//!
//! Pure function of system state plus the latest cached sample: renders
//! one of three pages to the [`DisplayBackend`]. Re-render happens on an
//! explicit state change or, for the live pages, on a refresh timer.

pub mod presenter;

pub use presenter::{Presenter, StatusView};

/// Display pages, cycled by the screen button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// Status word, sample count, message footer
    #[default]
    Status,
    /// Live accelerometer/gyro/temperature values
    Values,
    /// Horizontal bar per accelerometer axis
    Chart,
}

impl Page {
    /// Next page in cycle order, wrapping to the first
    pub fn next(self) -> Self {
        match self {
            Page::Status => Page::Values,
            Page::Values => Page::Chart,
            Page::Chart => Page::Status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycle_wraps() {
        assert_eq!(Page::Status.next(), Page::Values);
        assert_eq!(Page::Values.next(), Page::Chart);
        assert_eq!(Page::Chart.next(), Page::Status);
    }
}
