//! # AHRS - Attitude and Heading Reference System
//!
//! Attitude and motion estimation for a small vehicle carrying a 9-axis IMU
//! that also reports its own gravity / linear-acceleration decomposition.
//!
//! ## Pipeline
//!
//! - **Calibration**: blocking sampling sessions estimate per-axis bias for the
//!   accelerometer, magnetometer and gyroscope (midpoint of extremes).
//! - **Tilt**: roll/pitch from acceleration, yaw from tilt-compensated heading.
//! - **Gyro integration**: bias-corrected angular rate integrated over the
//!   measured delta-time.
//! - **Fusion**: fixed-weight complementary filter with a zero reference.
//! - **Motion**: dead-banded acceleration integrated by successive
//!   differences into velocity and position.
//!
//! Everything runs in one synchronous polling loop owned by [`Engine`]. The
//! sensor, clock and delay are injected through the `hal` traits.
//!
//! ## Platform Support
//!
//! - **desktop**: std-enabled nalgebra, for the SITL host and tests

use core::ops::{Add, Mul, Sub};

use hal::Vector3d;

pub mod calibration;
pub mod config;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod gyro;
pub mod motion;
pub mod sensors;
pub mod state;
pub mod telemetry;
pub mod tilt;
pub mod timing;
pub mod utils;

#[cfg(test)]
mod mock;

pub use calibration::{CalibrationOffsets, Calibrator};
pub use config::AhrsConfig;
pub use engine::{Engine, EnginePhase, TickReport};
pub use error::{AhrsError, AhrsResult, SensorType};
pub use fusion::{OrientationFusion, OrientationSet, ZeroReference};
pub use gyro::GyroIntegrator;
pub use motion::MotionIntegrator;
pub use sensors::{Channel, SensorReading};
pub use state::{KinematicState, StateStore};
pub use telemetry::{CsvLogger, TelemetrySink};
pub use tilt::TiltEstimator;
pub use timing::{SystemClock, ThreadDelay};

/// Roll, pitch and yaw in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationEstimate {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl OrientationEstimate {
    pub fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    /// (roll, pitch, yaw) as x, y, z
    pub fn from_vector(v: &Vector3d) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn as_vector(&self) -> Vector3d {
        Vector3d::new(self.roll, self.pitch, self.yaw)
    }

    /// Check if all angles are valid (non-NaN, non-infinite)
    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

impl Add for OrientationEstimate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.roll + rhs.roll, self.pitch + rhs.pitch, self.yaw + rhs.yaw)
    }
}

impl Sub for OrientationEstimate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.roll - rhs.roll, self.pitch - rhs.pitch, self.yaw - rhs.yaw)
    }
}

impl Mul<f32> for OrientationEstimate {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.roll * rhs, self.pitch * rhs, self.yaw * rhs)
    }
}
