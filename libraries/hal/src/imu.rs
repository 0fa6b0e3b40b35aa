/// IMU (Inertial Measurement Unit) sensor interface
use nalgebra::Quaternion;
use thiserror::Error;

use crate::types::Vector3d;

/// Reasons a sensor read can fail
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// The device did not answer (unplugged, powered down, wrong address)
    #[error("sensor unavailable")]
    Unavailable,

    /// The bus transfer failed part way through
    #[error("bus transfer failed")]
    Bus,

    /// The device answered with a value that cannot be a measurement
    #[error("invalid sensor data")]
    InvalidData,
}

/// IMU (Inertial Measurement Unit) interface
///
/// Every read blocks until the device answers. A failing read is reported to
/// the caller and never retried here.
pub trait ImuSensor {
    /// Get linear acceleration with gravity removed by the device (in m/s²)
    fn linear_acceleration(&mut self) -> Result<Vector3d, SensorFault>;

    /// Get raw, gravity-inclusive acceleration (in m/s²)
    fn acceleration(&mut self) -> Result<Vector3d, SensorFault>;

    /// Get the gravity vector as decomposed by the device (in m/s²)
    fn gravity(&mut self) -> Result<Vector3d, SensorFault>;

    /// Get gyroscope data (in rad/s)
    fn gyro(&mut self) -> Result<Vector3d, SensorFault>;

    /// Get magnetometer data (in gauss)
    fn magnetic(&mut self) -> Result<Vector3d, SensorFault>;

    /// Device-computed euler angles (heading, roll, pitch in degrees), if the
    /// device provides them
    fn euler(&mut self) -> Result<Option<Vector3d>, SensorFault> {
        Ok(None)
    }

    /// Device-computed orientation quaternion, if the device provides one
    fn quaternion(&mut self) -> Result<Option<Quaternion<f32>>, SensorFault> {
        Ok(None)
    }
}
