//! Bias estimation from fixed-length blocking sampling sessions.
//!
//! Each session draws `sample_count` readings from one channel with a fixed
//! pause between them, then takes the midpoint of the extremes on every axis:
//! `(min + max) / 2`. This is not a mean; it is insensitive to how samples are
//! distributed between the extremes and to their order.

use std::time::Duration;

use hal::{Delay, ImuSensor, Vector3d};
use log::log;

use crate::config::AhrsConfig;
use crate::sensors::Channel;
use crate::AhrsResult;

/// Per-axis bias offsets, computed once at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationOffsets {
    /// Linear acceleration bias in m/s²
    pub accel: Vector3d,
    /// Hard-iron magnetometer offset in gauss
    pub mag: Vector3d,
    /// Gyroscope bias, midpoint of raw rad/s samples
    pub gyro: Vector3d,
}

impl Default for CalibrationOffsets {
    fn default() -> Self {
        Self {
            accel: Vector3d::zeros(),
            mag: Vector3d::zeros(),
            gyro: Vector3d::zeros(),
        }
    }
}

/// Midpoint of the smallest and largest sample, `None` for an empty slice
pub fn midpoint_of_extremes(samples: &[f32]) -> Option<f32> {
    let (first, rest) = samples.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    Some(min / 2.0 + max / 2.0)
}

/// Runs sampling sessions against a sensor
pub struct Calibrator {
    sample_count: usize,
    sample_pause: Duration,
    settle_pause: Duration,
    level: log::Level,
}

impl Calibrator {
    /// Create a calibrator from a validated configuration
    pub fn new(config: &AhrsConfig) -> AhrsResult<Self> {
        config.validate()?;

        Ok(Self {
            sample_count: config.sample_count,
            sample_pause: config.sample_pause,
            settle_pause: config.settle_pause,
            level: config.diagnostic_level(),
        })
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Sample `channel` and return its per-axis offset.
    ///
    /// Blocks for `settle + sample_count * sample_pause + settle`. Any failed
    /// read aborts the session; no partial offset is produced.
    pub fn run<S, D>(&self, source: &mut S, delay: &mut D, channel: Channel) -> AhrsResult<Vector3d>
    where
        S: ImuSensor,
        D: Delay,
    {
        let level = self.level;
        log!(
            level,
            "Preparing to calibrate {}. {}",
            channel.name(),
            channel.instruction()
        );
        delay.delay(self.settle_pause);
        log!(level, "Calibrating {}...", channel.name());

        let mut xs = Vec::with_capacity(self.sample_count);
        let mut ys = Vec::with_capacity(self.sample_count);
        let mut zs = Vec::with_capacity(self.sample_count);

        for i in 0..self.sample_count {
            let sample = channel.sample(source)?;
            log!(
                level,
                "{}(x,y,z)@{}: ({}, {}, {})",
                channel.name(),
                i,
                sample.x,
                sample.y,
                sample.z
            );
            xs.push(sample.x);
            ys.push(sample.y);
            zs.push(sample.z);
            delay.delay(self.sample_pause);
        }

        delay.delay(self.settle_pause);

        // validate() guarantees at least one sample per axis
        let offset = Vector3d::new(
            midpoint_of_extremes(&xs).unwrap_or_default(),
            midpoint_of_extremes(&ys).unwrap_or_default(),
            midpoint_of_extremes(&zs).unwrap_or_default(),
        );
        log!(
            level,
            "Calibration of {} complete: ({}, {}, {})",
            channel.name(),
            offset.x,
            offset.y,
            offset.z
        );

        Ok(offset)
    }

    /// Run the accelerometer, magnetometer and gyroscope sessions in order
    pub fn run_all<S, D>(&self, source: &mut S, delay: &mut D) -> AhrsResult<CalibrationOffsets>
    where
        S: ImuSensor,
        D: Delay,
    {
        let accel = self.run(source, delay, Channel::Accelerometer)?;
        let mag = self.run(source, delay, Channel::Magnetometer)?;
        let gyro = self.run(source, delay, Channel::Gyroscope)?;
        Ok(CalibrationOffsets { accel, mag, gyro })
    }
}
