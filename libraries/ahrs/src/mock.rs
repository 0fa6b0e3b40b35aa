//! Scripted sensor, clock and delay used by the unit tests

use std::collections::VecDeque;
use std::time::Duration;

use hal::{Clock, Delay, ImuSensor, SensorFault, Vector3d};

/// Queue of readings; the last value read is repeated once the queue drains
#[derive(Debug, Clone)]
struct Script {
    queue: VecDeque<Vector3d>,
    current: Vector3d,
}

impl Script {
    fn new(current: Vector3d) -> Self {
        Self {
            queue: VecDeque::new(),
            current,
        }
    }

    fn next(&mut self) -> Vector3d {
        if let Some(v) = self.queue.pop_front() {
            self.current = v;
        }
        self.current
    }
}

#[derive(Debug, Clone, Copy)]
enum Which {
    Linear,
    Accel,
    Gravity,
    Gyro,
    Mag,
}

/// IMU returning scripted readings
#[derive(Debug, Clone)]
pub struct MockImu {
    linear: Script,
    accel: Script,
    gravity: Script,
    gyro: Script,
    mag: Script,
    reads: usize,
    fail_after: Option<usize>,
}

impl MockImu {
    /// Level, motionless device with the magnetic field along +X
    pub fn stationary() -> Self {
        Self {
            linear: Script::new(Vector3d::zeros()),
            accel: Script::new(Vector3d::new(0.0, 0.0, 9.81)),
            gravity: Script::new(Vector3d::new(0.0, 0.0, 9.81)),
            gyro: Script::new(Vector3d::zeros()),
            mag: Script::new(Vector3d::new(0.4, 0.0, 0.0)),
            reads: 0,
            fail_after: None,
        }
    }

    pub fn push_linear(&mut self, v: Vector3d) -> &mut Self {
        self.linear.queue.push_back(v);
        self
    }

    pub fn push_accel(&mut self, v: Vector3d) -> &mut Self {
        self.accel.queue.push_back(v);
        self
    }

    pub fn push_gyro(&mut self, v: Vector3d) -> &mut Self {
        self.gyro.queue.push_back(v);
        self
    }

    pub fn push_mag(&mut self, v: Vector3d) -> &mut Self {
        self.mag.queue.push_back(v);
        self
    }

    /// Every vector read after the first `reads` ones fails
    pub fn fail_after(&mut self, reads: usize) -> &mut Self {
        self.fail_after = Some(reads);
        self
    }

    fn read(&mut self, which: Which) -> Result<Vector3d, SensorFault> {
        if let Some(limit) = self.fail_after {
            if self.reads >= limit {
                return Err(SensorFault::Unavailable);
            }
        }
        self.reads += 1;
        let script = match which {
            Which::Linear => &mut self.linear,
            Which::Accel => &mut self.accel,
            Which::Gravity => &mut self.gravity,
            Which::Gyro => &mut self.gyro,
            Which::Mag => &mut self.mag,
        };
        Ok(script.next())
    }
}

impl ImuSensor for MockImu {
    fn linear_acceleration(&mut self) -> Result<Vector3d, SensorFault> {
        self.read(Which::Linear)
    }

    fn acceleration(&mut self) -> Result<Vector3d, SensorFault> {
        self.read(Which::Accel)
    }

    fn gravity(&mut self) -> Result<Vector3d, SensorFault> {
        self.read(Which::Gravity)
    }

    fn gyro(&mut self) -> Result<Vector3d, SensorFault> {
        self.read(Which::Gyro)
    }

    fn magnetic(&mut self) -> Result<Vector3d, SensorFault> {
        self.read(Which::Mag)
    }
}

/// Clock replaying scripted timestamps, then stepping by a fixed amount
#[derive(Debug, Clone)]
pub struct ManualClock {
    times: VecDeque<f64>,
    time: f64,
    step: f64,
}

impl ManualClock {
    /// Every call to `now` advances time by `step` seconds
    pub fn fixed_step(step: f64) -> Self {
        Self {
            times: VecDeque::new(),
            time: 0.0,
            step,
        }
    }

    /// Return `times` in order, then keep stepping by one second
    pub fn from_times(times: impl IntoIterator<Item = f64>) -> Self {
        Self {
            times: times.into_iter().collect(),
            time: 0.0,
            step: 1.0,
        }
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> f64 {
        match self.times.pop_front() {
            Some(t) => self.time = t,
            None => self.time += self.step,
        }
        self.time
    }
}

/// Delay that records requested pauses instead of sleeping
#[derive(Debug, Default, Clone)]
pub struct RecordingDelay {
    pub pauses: Vec<Duration>,
}

impl RecordingDelay {
    pub fn total(&self) -> Duration {
        self.pauses.iter().sum()
    }
}

impl Delay for RecordingDelay {
    fn delay(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}
