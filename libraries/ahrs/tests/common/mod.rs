#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use hal::{Clock, Delay, ImuSensor, SensorFault, Vector3d};

pub const GRAVITY: f32 = 9.81;

/// Channel playback: queued values first, then the last one forever
struct Track {
    queue: VecDeque<Vector3d>,
    last: Vector3d,
}

impl Track {
    fn constant(v: Vector3d) -> Self {
        Self {
            queue: VecDeque::new(),
            last: v,
        }
    }

    fn next(&mut self) -> Vector3d {
        if let Some(v) = self.queue.pop_front() {
            self.last = v;
        }
        self.last
    }
}

/// Bench IMU lying flat with the field along +X unless told otherwise
pub struct BenchImu {
    linear: Track,
    accel: Track,
    gyro: Track,
    mag: Track,
    pub reads: usize,
}

impl BenchImu {
    pub fn level() -> Self {
        Self {
            linear: Track::constant(Vector3d::zeros()),
            accel: Track::constant(Vector3d::new(0.0, 0.0, GRAVITY)),
            gyro: Track::constant(Vector3d::zeros()),
            mag: Track::constant(Vector3d::new(0.4, 0.0, 0.0)),
            reads: 0,
        }
    }

    /// `calibration` linear samples followed by one value per tick
    pub fn with_linear(mut self, calibration: &[Vector3d], ticks: &[Vector3d]) -> Self {
        self.linear.queue.extend(calibration.iter().chain(ticks));
        self
    }

    /// `calibration` gyro samples (rad/s) followed by one value per tick
    pub fn with_gyro(mut self, calibration: &[Vector3d], ticks: &[Vector3d]) -> Self {
        self.gyro.queue.extend(calibration.iter().chain(ticks));
        self
    }

    pub fn with_accel(mut self, accel: Vector3d) -> Self {
        self.accel = Track::constant(accel);
        self
    }
}

impl ImuSensor for BenchImu {
    fn linear_acceleration(&mut self) -> Result<Vector3d, SensorFault> {
        self.reads += 1;
        Ok(self.linear.next())
    }

    fn acceleration(&mut self) -> Result<Vector3d, SensorFault> {
        self.reads += 1;
        Ok(self.accel.next())
    }

    fn gravity(&mut self) -> Result<Vector3d, SensorFault> {
        self.reads += 1;
        Ok(Vector3d::new(0.0, 0.0, GRAVITY))
    }

    fn gyro(&mut self) -> Result<Vector3d, SensorFault> {
        self.reads += 1;
        Ok(self.gyro.next())
    }

    fn magnetic(&mut self) -> Result<Vector3d, SensorFault> {
        self.reads += 1;
        Ok(self.mag.next())
    }
}

/// Advances by a fixed step on every read
pub struct StepClock {
    now: f64,
    step: f64,
}

impl StepClock {
    pub fn new(step: f64) -> Self {
        Self { now: 0.0, step }
    }
}

impl Clock for StepClock {
    fn now(&mut self) -> f64 {
        self.now += self.step;
        self.now
    }
}

/// Counts requested time instead of sleeping
#[derive(Default)]
pub struct NoDelay {
    pub slept: Duration,
}

impl Delay for NoDelay {
    fn delay(&mut self, duration: Duration) {
        self.slept += duration;
    }
}
