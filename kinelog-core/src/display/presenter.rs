//! Page rendering

use core::fmt::Write;

use heapless::String;

use super::Page;
use crate::config::DEFAULT_REFRESH_MS;
use crate::traits::{DisplayBackend, DisplayError, ImuSample};

/// Maximum length of the status word
pub const MAX_STATUS_LEN: usize = 12;

/// Maximum length of the footer message
pub const MAX_MESSAGE_LEN: usize = 18;

const SCREEN_WIDTH: u8 = 128;

// Row layout for the status page (pixel y coordinates)
const ROW_TITLE: u8 = 1;
const ROW_RULE_TOP: u8 = 12;
const ROW_STATUS: u8 = 16;
const ROW_RULE_MID: u8 = 30;
const ROW_SAMPLES: u8 = 34;
const ROW_RULE_BOT: u8 = 48;
const ROW_FOOTER: u8 = 52;

/// Snapshot of everything the presenter needs to draw a frame
#[derive(Debug, Clone, Default)]
pub struct StatusView {
    /// Status word shown on the status page
    pub status: String<MAX_STATUS_LEN>,
    /// Footer message (cleared by lifecycle transitions)
    pub message: String<MAX_MESSAGE_LEN>,
    /// Samples appended since boot
    pub sample_count: u32,
    /// Latest cached sensor sample
    pub sample: ImuSample,
}

/// Display presenter with page cycling and refresh tracking
#[derive(Debug)]
pub struct Presenter {
    page: Page,
    dirty: bool,
    refresh_ms: u32,
    last_render_ms: u64,
}

impl Presenter {
    /// Create a presenter on the status page, needing an initial render
    pub const fn new(refresh_ms: u32) -> Self {
        Self {
            page: Page::Status,
            dirty: true,
            refresh_ms,
            last_render_ms: 0,
        }
    }

    /// Currently active page
    pub fn page(&self) -> Page {
        self.page
    }

    /// Advance to the next page and force a redraw
    pub fn cycle(&mut self) -> Page {
        self.page = self.page.next();
        self.dirty = true;
        self.page
    }

    /// Force a redraw on the next `render` call (state changed)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether a frame should be drawn now
    ///
    /// True on explicit state change, or on the refresh timer while a live
    /// page is shown. The status page only redraws on state changes.
    pub fn needs_render(&self, now_ms: u64) -> bool {
        if self.dirty {
            return true;
        }
        self.page != Page::Status
            && now_ms.saturating_sub(self.last_render_ms) >= self.refresh_ms as u64
    }

    /// Draw the active page
    pub fn render<D: DisplayBackend>(
        &mut self,
        now_ms: u64,
        view: &StatusView,
        display: &mut D,
    ) -> Result<(), DisplayError> {
        display.clear()?;
        match self.page {
            Page::Status => draw_status(view, display)?,
            Page::Values => draw_values(&view.sample, display)?,
            Page::Chart => draw_chart(&view.sample, display)?,
        }
        display.flush()?;

        self.dirty = false;
        self.last_render_ms = now_ms;
        Ok(())
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_MS)
    }
}

fn draw_status<D: DisplayBackend>(view: &StatusView, d: &mut D) -> Result<(), DisplayError> {
    d.text(14, ROW_TITLE, "MPU6050 LOGGER")?;
    d.hline(0, SCREEN_WIDTH - 1, ROW_RULE_TOP)?;
    d.hline(0, SCREEN_WIDTH - 1, ROW_RULE_MID)?;
    d.hline(0, SCREEN_WIDTH - 1, ROW_RULE_BOT)?;

    let mut line: String<24> = String::new();
    let _ = write!(line, "STATUS: {}", view.status);
    d.text(0, ROW_STATUS, &line)?;

    line.clear();
    let _ = write!(line, "AMOSTRAS: {}", view.sample_count);
    d.text(0, ROW_SAMPLES, &line)?;

    d.text(0, ROW_FOOTER, &view.message)
}

fn draw_values<D: DisplayBackend>(s: &ImuSample, d: &mut D) -> Result<(), DisplayError> {
    let mut line: String<24> = String::new();

    let _ = write!(line, "AX{:6.2} AY{:6.2}", s.accel_x, s.accel_y);
    d.text(0, 2, &line)?;

    line.clear();
    let _ = write!(line, "AZ{:6.2}", s.accel_z);
    d.text(0, 14, &line)?;

    line.clear();
    let _ = write!(line, "GX{:6.1} GY{:6.1}", s.gyro_x, s.gyro_y);
    d.text(0, 28, &line)?;

    line.clear();
    let _ = write!(line, "GZ{:6.1}", s.gyro_z);
    d.text(0, 40, &line)?;

    line.clear();
    let _ = write!(line, "TEMP {:5.2} C", s.temp_c);
    d.text(0, 52, &line)
}

fn draw_chart<D: DisplayBackend>(s: &ImuSample, d: &mut D) -> Result<(), DisplayError> {
    d.text(0, 1, "ACEL +-2G")?;
    draw_bar(d, 18, "X", s.accel_x)?;
    draw_bar(d, 34, "Y", s.accel_y)?;
    draw_bar(d, 50, "Z", s.accel_z)
}

/// One horizontal bar, length proportional to |g| scaled to full range
fn draw_bar<D: DisplayBackend>(
    d: &mut D,
    y: u8,
    label: &str,
    value_g: f32,
) -> Result<(), DisplayError> {
    const BAR_X0: u8 = 12;
    const BAR_MAX: f32 = (SCREEN_WIDTH - 14) as f32;
    const FULL_SCALE_G: f32 = 2.0;

    d.text(0, y - 3, label)?;
    d.vline(BAR_X0 - 2, y - 4, y + 4)?;

    let mut magnitude = value_g;
    if magnitude < 0.0 {
        magnitude = -magnitude;
    }
    if magnitude > FULL_SCALE_G {
        magnitude = FULL_SCALE_G;
    }
    let len = (magnitude / FULL_SCALE_G * BAR_MAX) as u8;
    if len > 0 {
        // Three rows thick so the bar reads at a glance
        d.hline(BAR_X0, BAR_X0 + len, y - 1)?;
        d.hline(BAR_X0, BAR_X0 + len, y)?;
        d.hline(BAR_X0, BAR_X0 + len, y + 1)?;
    }
    Ok(())
}
