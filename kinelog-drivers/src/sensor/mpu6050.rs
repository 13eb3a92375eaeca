//! MPU-6050 six-axis IMU driver
//!
//! Blocking I2C register driver. One burst read of 14 bytes returns
//! accelerometer, temperature and gyro data in a single transaction.

use embedded_hal::i2c::I2c;

use kinelog_core::traits::{ImuSample, ImuSensor};

/// Default I2C address (AD0 low)
pub const DEFAULT_ADDR: u8 = 0x68;

/// Expected WHO_AM_I response
pub const WHO_AM_I_VALUE: u8 = 0x68;

// Register map (subset)
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;
const REG_ACCEL_XOUT_H: u8 = 0x3B;

// Full-scale conversion factors at the power-on default ranges
// (±2 g, ±250 °/s); temperature per datasheet formula
const ACCEL_LSB_PER_G: f32 = 16384.0;
const GYRO_LSB_PER_DPS: f32 = 131.0;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mpu6050Error<E> {
    /// I2C bus error
    Bus(E),
    /// WHO_AM_I returned an unexpected value
    WrongDevice(u8),
}

/// MPU-6050 over blocking I2C
///
/// Keeps the last good sample so the infallible [`ImuSensor`] view can
/// always return a value; bus hiccups repeat the previous reading.
pub struct Mpu6050<I2C> {
    i2c: I2C,
    addr: u8,
    last: ImuSample,
}

impl<I2C: I2c> Mpu6050<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDR)
    }

    /// Create a driver at a specific address (AD0 high uses 0x69)
    pub fn with_address(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            last: ImuSample::default(),
        }
    }

    /// Verify the device identity and take it out of sleep
    ///
    /// The chip powers up in sleep mode with all ranges at their
    /// defaults, which is exactly the configuration this driver assumes.
    pub fn init(&mut self) -> Result<(), Mpu6050Error<I2C::Error>> {
        let mut id = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[REG_WHO_AM_I], &mut id)
            .map_err(Mpu6050Error::Bus)?;
        if id[0] != WHO_AM_I_VALUE {
            return Err(Mpu6050Error::WrongDevice(id[0]));
        }

        // Clear the sleep bit, internal oscillator
        self.i2c
            .write(self.addr, &[REG_PWR_MGMT_1, 0x00])
            .map_err(Mpu6050Error::Bus)
    }

    /// Read one sample (accel, temperature, gyro) in a burst
    pub fn read_sample(&mut self) -> Result<ImuSample, Mpu6050Error<I2C::Error>> {
        let mut raw = [0u8; 14];
        self.i2c
            .write_read(self.addr, &[REG_ACCEL_XOUT_H], &mut raw)
            .map_err(Mpu6050Error::Bus)?;

        let word = |hi: usize| i16::from_be_bytes([raw[hi], raw[hi + 1]]);

        let sample = ImuSample {
            accel_x: word(0) as f32 / ACCEL_LSB_PER_G,
            accel_y: word(2) as f32 / ACCEL_LSB_PER_G,
            accel_z: word(4) as f32 / ACCEL_LSB_PER_G,
            temp_c: word(6) as f32 / 340.0 + 36.53,
            gyro_x: word(8) as f32 / GYRO_LSB_PER_DPS,
            gyro_y: word(10) as f32 / GYRO_LSB_PER_DPS,
            gyro_z: word(12) as f32 / GYRO_LSB_PER_DPS,
        };
        self.last = sample;
        Ok(sample)
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> ImuSensor for Mpu6050<I2C> {
    fn read(&mut self) -> ImuSample {
        match self.read_sample() {
            Ok(sample) => sample,
            // Bus hiccup: repeat the last good sample
            Err(_) => self.last,
        }
    }
}
