//! IMU sensor trait

/// One six-axis sample plus die temperature
///
/// Units: acceleration in g, angular rate in °/s, temperature in °C.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuSample {
    pub accel_x: f32,
    pub accel_y: f32,
    pub accel_z: f32,
    pub gyro_x: f32,
    pub gyro_y: f32,
    pub gyro_z: f32,
    pub temp_c: f32,
}

/// Trait for the motion sensor
///
/// The driver is assumed synchronous and always returning a value;
/// bus-level errors are handled below this seam.
pub trait ImuSensor {
    /// Read one sample from the sensor
    fn read(&mut self) -> ImuSample;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sample_is_zeroed() {
        let s = ImuSample::default();
        assert_eq!(s.accel_x, 0.0);
        assert_eq!(s.temp_c, 0.0);
    }
}
