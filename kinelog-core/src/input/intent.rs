//! Logical user intents

/// Physical push-buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Mount/unmount the storage medium
    Storage,
    /// Start/stop sample collection
    Collect,
    /// Cycle the active display page
    Screen,
}

/// A debounced, already-accepted user action
///
/// Intents are produced in interrupt context and consumed by the control
/// loop; they carry no payload so the handoff is a plain value copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    /// Mount if unmounted, unmount (stopping collection first) if mounted
    ToggleStorage,
    /// Start collection if idle, stop if collecting
    ToggleCollection,
    /// Advance to the next display page
    CycleScreen,
}

impl Button {
    /// The intent this button emits when an edge is accepted
    pub fn intent(self) -> Intent {
        match self {
            Button::Storage => Intent::ToggleStorage,
            Button::Collect => Intent::ToggleCollection,
            Button::Screen => Intent::CycleScreen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_intent_mapping() {
        assert_eq!(Button::Storage.intent(), Intent::ToggleStorage);
        assert_eq!(Button::Collect.intent(), Intent::ToggleCollection);
        assert_eq!(Button::Screen.intent(), Intent::CycleScreen);
    }
}
