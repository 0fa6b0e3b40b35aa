use hal::{ImuSensor, SensorFault, Vector3d};
use nalgebra as na;

use crate::error::helpers::sensor_unavailable;
use crate::error::SensorType;
use crate::utils;
use crate::AhrsResult;

/// Everything read from the IMU in one tick
#[derive(Debug, Clone)]
pub struct SensorReading {
    /// Linear acceleration with gravity removed, in m/s²
    pub linear_accel: Vector3d,

    /// Gravity-inclusive acceleration in m/s²
    pub raw_accel: Vector3d,

    /// Gravity vector in m/s²
    pub gravity: Vector3d,

    /// Angular rate in rad/s
    pub gyro: Vector3d,

    /// Magnetic field in gauss
    pub mag: Vector3d,

    /// Device-computed euler angles, pass-through only
    pub euler: Option<Vector3d>,

    /// Device-computed orientation, pass-through only
    pub quaternion: Option<na::Quaternion<f32>>,
}

/// Sensor channel a calibration session samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Linear acceleration, m/s²
    Accelerometer,
    /// Magnetic field, gauss
    Magnetometer,
    /// Angular rate in rad/s, as read
    Gyroscope,
}

impl Channel {
    /// Read one raw sample from this channel
    pub fn sample<S: ImuSensor>(&self, source: &mut S) -> AhrsResult<Vector3d> {
        match self {
            Channel::Accelerometer => {
                read_vector(source.linear_acceleration(), SensorType::LinearAccelerometer)
            }
            Channel::Magnetometer => read_vector(source.magnetic(), SensorType::Magnetometer),
            Channel::Gyroscope => read_vector(source.gyro(), SensorType::Gyroscope),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Accelerometer => "accelerometer",
            Channel::Magnetometer => "magnetometer",
            Channel::Gyroscope => "gyroscope",
        }
    }

    /// What the operator should do while this channel is sampled
    pub fn instruction(&self) -> &'static str {
        match self {
            Channel::Magnetometer => "Please wave around.",
            Channel::Accelerometer | Channel::Gyroscope => "Please hold still.",
        }
    }
}

/// Turn a device read into an engine result, rejecting non-finite data
pub fn read_vector(
    result: Result<Vector3d, SensorFault>,
    sensor: SensorType,
) -> AhrsResult<Vector3d> {
    match result {
        Ok(v) if utils::is_finite(&v) => Ok(v),
        Ok(v) => Err(sensor_unavailable(
            format!("non-finite reading {:?}", v.as_slice()),
            sensor,
            SensorFault::InvalidData,
        )),
        Err(fault) => Err(sensor_unavailable("read failed", sensor, fault)),
    }
}

/// Read every channel once, in the order the device decomposes them
pub fn read_all<S: ImuSensor>(source: &mut S) -> AhrsResult<SensorReading> {
    let euler = source
        .euler()
        .map_err(|fault| sensor_unavailable("read failed", SensorType::Orientation, fault))?;
    let quaternion = source
        .quaternion()
        .map_err(|fault| sensor_unavailable("read failed", SensorType::Orientation, fault))?;
    let linear_accel = read_vector(source.linear_acceleration(), SensorType::LinearAccelerometer)?;
    let gravity = read_vector(source.gravity(), SensorType::Gravity)?;
    let raw_accel = read_vector(source.acceleration(), SensorType::Accelerometer)?;
    let mag = read_vector(source.magnetic(), SensorType::Magnetometer)?;
    let gyro = read_vector(source.gyro(), SensorType::Gyroscope)?;

    Ok(SensorReading {
        linear_accel,
        raw_accel,
        gravity,
        gyro,
        mag,
        euler,
        quaternion,
    })
}
