//! Display backend trait for the status OLED

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction failed
    Bus,
    /// Coordinates outside the panel
    OutOfBounds,
}

/// Trait for the 128x64 monochrome status display
///
/// Draw calls mutate an internal framebuffer; nothing reaches the panel
/// until `flush`. All coordinates are in pixels.
pub trait DisplayBackend {
    /// Clear the framebuffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw ASCII text with the top-left corner at (x, y)
    fn text(&mut self, x: u8, y: u8, text: &str) -> Result<(), DisplayError>;

    /// Draw a horizontal line from (x0, y) to (x1, y)
    fn hline(&mut self, x0: u8, x1: u8, y: u8) -> Result<(), DisplayError>;

    /// Draw a vertical line from (x, y0) to (x, y1)
    fn vline(&mut self, x: u8, y0: u8, y1: u8) -> Result<(), DisplayError>;

    /// Push the framebuffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;
}
