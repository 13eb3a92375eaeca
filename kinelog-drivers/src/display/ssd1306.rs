//! SSD1306 OLED display driver
//!
//! Minimal monochrome driver for 128x64 SSD1306 panels over blocking I2C.
//! Keeps a full frame buffer in RAM; drawing mutates the buffer only and
//! `flush` pushes the dirty frame to the panel page by page.

use embedded_hal::i2c::I2c;

use kinelog_core::traits::{DisplayBackend, DisplayError};

use super::font::glyph;

/// Default SSD1306 I2C address
pub const DEFAULT_ADDR: u8 = 0x3C;

/// Display dimensions
const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// SSD1306 command bytes
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_MEM_MODE: u8 = 0x20;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const ENTIRE_ON_RESUME: u8 = 0xA4;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
}

/// SSD1306 driver with an in-RAM frame buffer
pub struct Ssd1306<I2C> {
    i2c: I2C,
    addr: u8,
    buffer: [[u8; WIDTH]; PAGES],
}

impl<I2C: I2c> Ssd1306<I2C> {
    /// Create a driver at the default address (0x3C)
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDR)
    }

    /// Create a driver at a specific I2C address
    pub fn with_address(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Send the power-up sequence and switch the panel on
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_MEM_MODE,
            0x02, // Page addressing
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            (HEIGHT - 1) as u8,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Internal charge pump
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::ENTIRE_ON_RESUME,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c)?;
        }
        Ok(())
    }

    /// Release the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, c: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr, &[0x00, c])
    }

    /// Set one pixel, clipping out-of-range coordinates
    fn set_pixel(&mut self, x: usize, y: usize) {
        if x < WIDTH && y < HEIGHT {
            self.buffer[y / 8][x] |= 1 << (y % 8);
        }
    }
}

impl<I2C: I2c> DisplayBackend for Ssd1306<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        Ok(())
    }

    fn text(&mut self, x: u8, y: u8, text: &str) -> Result<(), DisplayError> {
        let mut col = x as usize;
        for ch in text.chars() {
            if col >= WIDTH {
                break;
            }
            let g = glyph(ch);
            for (i, &bits) in g.iter().enumerate() {
                for row in 0..7 {
                    if bits & (1 << row) != 0 {
                        self.set_pixel(col + i, y as usize + row);
                    }
                }
            }
            // 5 glyph columns plus 1 spacing column
            col += 6;
        }
        Ok(())
    }

    fn hline(&mut self, x0: u8, x1: u8, y: u8) -> Result<(), DisplayError> {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in lo..=hi {
            self.set_pixel(x as usize, y as usize);
        }
        Ok(())
    }

    fn vline(&mut self, x: u8, y0: u8, y1: u8) -> Result<(), DisplayError> {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        for y in lo..=hi {
            self.set_pixel(x as usize, y as usize);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        for page in 0..PAGES {
            self.command(cmd::SET_PAGE_ADDR | page as u8)
                .map_err(|_| DisplayError::Bus)?;
            self.command(cmd::SET_LOW_COLUMN)
                .map_err(|_| DisplayError::Bus)?;
            self.command(cmd::SET_HIGH_COLUMN)
                .map_err(|_| DisplayError::Bus)?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = 0x40;
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c
                .write(self.addr, &data)
                .map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::convert::Infallible;
    use embedded_hal::i2c::{ErrorType, Operation};

    /// Records every write issued on the bus
    struct I2cMock {
        writes: heapless::Vec<(u8, heapless::Vec<u8, 160>), 64>,
    }

    impl I2cMock {
        fn new() -> Self {
            Self {
                writes: heapless::Vec::new(),
            }
        }
    }

    impl ErrorType for I2cMock {
        type Error = Infallible;
    }

    impl I2c for I2cMock {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let Operation::Write(bytes) = op {
                    let mut copy = heapless::Vec::new();
                    copy.extend_from_slice(bytes).ok();
                    self.writes.push((address, copy)).ok();
                }
            }
            Ok(())
        }
    }

    fn pixel(disp: &Ssd1306<I2cMock>, x: usize, y: usize) -> bool {
        disp.buffer[y / 8][x] & (1 << (y % 8)) != 0
    }

    #[test]
    fn test_init_switches_display_on() {
        let mut disp = Ssd1306::new(I2cMock::new());
        disp.init().unwrap();

        let writes = &disp.i2c.writes;
        assert!(writes.iter().all(|(addr, _)| *addr == DEFAULT_ADDR));
        let last = writes.last().unwrap();
        assert_eq!(last.1.as_slice(), &[0x00, cmd::DISPLAY_ON]);
    }

    #[test]
    fn test_hline_and_vline_set_pixels() {
        let mut disp = Ssd1306::new(I2cMock::new());
        disp.hline(10, 13, 5).unwrap();
        disp.vline(2, 8, 10).unwrap();

        for x in 10..=13 {
            assert!(pixel(&disp, x, 5));
        }
        assert!(!pixel(&disp, 14, 5));
        for y in 8..=10 {
            assert!(pixel(&disp, 2, y));
        }
    }

    #[test]
    fn test_text_advances_six_columns_per_char() {
        let mut disp = Ssd1306::new(I2cMock::new());
        // '!' is a single centre column: glyph column 2 carries the bits
        disp.text(0, 0, "!!").unwrap();

        assert!(pixel(&disp, 2, 0));
        assert!(pixel(&disp, 8, 0));
        assert!(!pixel(&disp, 5, 0));
    }

    #[test]
    fn test_out_of_range_draw_is_clipped() {
        let mut disp = Ssd1306::new(I2cMock::new());
        disp.hline(120, 255, 63).unwrap();
        disp.vline(127, 60, 255).unwrap();
        // No panic and in-range pixels are set
        assert!(pixel(&disp, 127, 63));
    }

    #[test]
    fn test_clear_resets_buffer_without_bus_traffic() {
        let mut disp = Ssd1306::new(I2cMock::new());
        disp.hline(0, 127, 0).unwrap();
        disp.clear().unwrap();

        assert!(!pixel(&disp, 0, 0));
        assert!(disp.i2c.writes.is_empty());
    }

    #[test]
    fn test_flush_sends_one_data_write_per_page() {
        let mut disp = Ssd1306::new(I2cMock::new());
        disp.flush().unwrap();

        let data_writes = disp
            .i2c
            .writes
            .iter()
            .filter(|(_, bytes)| bytes.first() == Some(&0x40))
            .count();
        assert_eq!(data_writes, PAGES);
    }
}
