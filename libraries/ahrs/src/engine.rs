//! Calibrate, zero, then run the per-tick estimation loop.
//!
//! Construction walks Uninitialized → Calibrating (accelerometer,
//! magnetometer, gyroscope) → InitialOrientationSet → Zeroed. Each call to
//! [`Engine::update`] then performs one Running tick:
//! sample → correct → estimate → fuse → integrate.

use hal::{Clock, Delay, ImuSensor, Vector3d};
use log::{log, trace, warn};
use nalgebra as na;

use crate::calibration::{CalibrationOffsets, Calibrator};
use crate::error::helpers::{invalid_state, timing_error};
use crate::error::SensorType;
use crate::fusion::{OrientationFusion, OrientationSet, ZeroReference};
use crate::gyro::GyroIntegrator;
use crate::motion::MotionIntegrator;
use crate::sensors::{self, Channel, SensorReading};
use crate::state::{KinematicState, StateStore};
use crate::telemetry::TelemetrySink;
use crate::tilt::{self, TiltEstimator};
use crate::{AhrsConfig, AhrsResult, OrientationEstimate};

/// Lifecycle of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Uninitialized,
    Calibrating(Channel),
    InitialOrientationSet,
    Zeroed,
    Running,
}

/// Immutable result of one completed tick
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Seconds since the engine finished starting up
    pub timestamp: f64,

    /// Measured delta-time of this tick in seconds
    pub dt: f32,

    /// False when the tick's delta-time was not positive and integration was skipped
    pub integrated: bool,

    /// Gravity-inclusive acceleration as read, m/s²
    pub raw_accel: Vector3d,

    /// Linear acceleration as read, m/s²
    pub linear_accel: Vector3d,

    /// Bias-corrected, rounded and dead-banded linear acceleration, m/s²
    pub corrected_accel: Vector3d,

    /// Gravity as read, m/s²
    pub gravity: Vector3d,

    pub velocity: Vector3d,
    pub position: Vector3d,

    /// Tilt, gyro and fused orientation with the zero reference applied
    pub orientation: OrientationSet,

    /// Device-computed euler angles, if the sensor reports them
    pub device_euler: Option<Vector3d>,

    /// Device-computed quaternion, if the sensor reports one
    pub device_quaternion: Option<na::Quaternion<f32>>,
}

impl Default for TickReport {
    fn default() -> Self {
        Self {
            timestamp: 0.0,
            dt: 0.0,
            integrated: false,
            raw_accel: Vector3d::zeros(),
            linear_accel: Vector3d::zeros(),
            corrected_accel: Vector3d::zeros(),
            gravity: Vector3d::zeros(),
            velocity: Vector3d::zeros(),
            position: Vector3d::zeros(),
            orientation: OrientationSet::default(),
            device_euler: None,
            device_quaternion: None,
        }
    }
}

/// Single-threaded estimation engine owning the sensor, the clock and all state
pub struct Engine<S: ImuSensor, C: Clock> {
    source: S,
    clock: C,
    config: AhrsConfig,
    phase: EnginePhase,
    offsets: CalibrationOffsets,
    initial: OrientationEstimate,
    tilt: TiltEstimator,
    gyro: GyroIntegrator,
    fusion: OrientationFusion,
    motion: MotionIntegrator,
    state: StateStore,
    start: f64,
    latest: Option<TickReport>,
}

impl<S: ImuSensor, C: Clock> Engine<S, C> {
    /// Calibrate, take the initial orientation and zero on it.
    ///
    /// Blocks through three calibration sessions; `delay` provides every
    /// pause. Fails on an invalid configuration (before any sampling) or on
    /// any sensor read failure.
    pub fn new<D: Delay>(
        mut source: S,
        mut clock: C,
        delay: &mut D,
        config: AhrsConfig,
    ) -> AhrsResult<Self> {
        let calibrator = Calibrator::new(&config)?;
        let level = config.diagnostic_level();
        let mut phase = EnginePhase::Uninitialized;
        log!(
            level,
            "Starting engine with {} calibration samples per channel",
            calibrator.sample_count()
        );

        let mut offsets = CalibrationOffsets::default();
        for channel in [Channel::Accelerometer, Channel::Magnetometer, Channel::Gyroscope] {
            phase = Self::transition(level, phase, EnginePhase::Calibrating(channel));
            let offset = calibrator.run(&mut source, delay, channel)?;
            match channel {
                Channel::Accelerometer => offsets.accel = offset,
                Channel::Magnetometer => offsets.mag = offset,
                Channel::Gyroscope => offsets.gyro = offset,
            }
        }

        let tilt = TiltEstimator::new(config.tilt_epsilon);

        log!(level, "Preparing to set initial angle. Please hold the IMU still.");
        delay.delay(config.settle_pause);
        let raw_accel = sensors::read_vector(source.acceleration(), SensorType::Accelerometer)?;
        let mag = sensors::read_vector(source.magnetic(), SensorType::Magnetometer)?;
        let initial = tilt.estimate(&raw_accel, &(mag - offsets.mag));
        phase = Self::transition(level, phase, EnginePhase::InitialOrientationSet);
        log!(
            level,
            "Initial angle set: roll {}, pitch {}, yaw {}",
            initial.roll,
            initial.pitch,
            initial.yaw
        );

        let gyro = GyroIntegrator::new(offsets.gyro, initial);
        let mut fusion = OrientationFusion::new(config.fusion_weight, initial);
        fusion.zero();
        phase = Self::transition(level, phase, EnginePhase::Zeroed);

        let motion = MotionIntegrator::new(offsets.accel, config.dead_band, config.accel_precision);

        let start = clock.now();
        if !start.is_finite() {
            return Err(timing_error("clock returned a non-finite start time", None));
        }

        Ok(Self {
            source,
            clock,
            config,
            phase,
            offsets,
            initial,
            tilt,
            gyro,
            fusion,
            motion,
            state: StateStore::new(start),
            start,
            latest: None,
        })
    }

    fn transition(level: log::Level, from: EnginePhase, to: EnginePhase) -> EnginePhase {
        log!(level, "Engine phase {:?} -> {:?}", from, to);
        to
    }

    /// Run one tick. Blocks on the sensor read.
    ///
    /// A read failure is returned as-is; the engine does not retry. A
    /// non-positive delta-time skips gyro and motion integration for this
    /// tick while still reporting fresh readings.
    pub fn update(&mut self) -> AhrsResult<TickReport> {
        let reading = sensors::read_all(&mut self.source)?;

        let now = self.clock.now();
        if !now.is_finite() {
            return Err(timing_error("clock returned a non-finite time", None));
        }
        let dt = self.state.delta_time(now);
        let integrated = dt > 0.0 && dt.is_finite();

        let corrected_mag = reading.mag - self.offsets.mag;
        let corrected_rate = self.gyro.corrected_rate(&reading.gyro);
        let corrected_accel = self.motion.correct(&reading.linear_accel);

        let tilt_estimate = self.tilt.estimate(&corrected_accel, &corrected_mag);

        let gyro_estimate = if integrated {
            self.motion
                .integrate(&mut self.state.kinematics, corrected_accel, dt);
            self.gyro.integrate(&corrected_rate, dt)
        } else {
            warn!(
                "Skipping integration: non-positive delta-time {} s at t={}",
                dt,
                now - self.start
            );
            self.state.skipped_ticks += 1;
            self.motion.hold(&mut self.state.kinematics, corrected_accel);
            self.gyro.orientation()
        };

        let orientation = self.fusion.update(tilt_estimate, gyro_estimate);

        if !self.state.kinematics.is_valid() || !orientation.fused.is_finite() {
            return Err(invalid_state(
                "non-finite velocity, position or orientation",
                "engine",
            ));
        }

        if self.phase != EnginePhase::Running {
            self.phase = Self::transition(
                self.config.diagnostic_level(),
                self.phase,
                EnginePhase::Running,
            );
        }

        let report = TickReport {
            timestamp: now - self.start,
            dt,
            integrated,
            raw_accel: reading.raw_accel,
            linear_accel: reading.linear_accel,
            corrected_accel,
            gravity: reading.gravity,
            velocity: self.state.kinematics.velocity,
            position: self.state.kinematics.position,
            orientation,
            device_euler: reading.euler,
            device_quaternion: reading.quaternion,
        };

        trace!(
            "t={:.3} dt={:.4} accel={:?} vel={:?} pos={:?} rpy=({:.2}, {:.2}, {:.2})",
            report.timestamp,
            dt,
            corrected_accel.as_slice(),
            report.velocity.as_slice(),
            report.position.as_slice(),
            orientation.fused.roll,
            orientation.fused.pitch,
            orientation.fused.yaw
        );

        self.state.orientation = orientation;
        self.state.corrected_mag = Some(corrected_mag);
        self.state.last_reading = Some(reading);
        self.state.ticks += 1;
        self.latest = Some(report.clone());

        Ok(report)
    }

    /// Run one tick and hand the completed report to `sink`
    pub fn tick<K: TelemetrySink>(&mut self, sink: &mut K) -> AhrsResult<TickReport> {
        let report = self.update()?;
        sink.publish(&report)?;
        Ok(report)
    }

    /// Re-baseline reported orientation on the current fused orientation.
    ///
    /// Only the reported values move; gyro integration continues from its
    /// own angles. Call only while the vehicle is stationary.
    pub fn zero(&mut self) -> ZeroReference {
        let reference = self.fusion.zero();
        let o = reference.orientation();
        log!(
            self.config.diagnostic_level(),
            "Zero reference set: roll {}, pitch {}, yaw {}",
            o.roll,
            o.pitch,
            o.yaw
        );
        reference
    }

    /// Direction of magnetic north from the latest gravity and corrected
    /// magnetic field. `None` before the first tick or for degenerate vectors.
    pub fn north_reference(&self) -> Option<OrientationEstimate> {
        let reading = self.state.last_reading.as_ref()?;
        let mag = self.state.corrected_mag?;
        tilt::north_reference(&reading.gravity, &mag)
    }

    /// Copy of the latest completed tick
    pub fn snapshot(&self) -> Option<TickReport> {
        self.latest.clone()
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn offsets(&self) -> &CalibrationOffsets {
        &self.offsets
    }

    /// Tilt estimate taken at startup from gravity-inclusive acceleration
    pub fn initial_orientation(&self) -> OrientationEstimate {
        self.initial
    }

    pub fn zero_reference(&self) -> ZeroReference {
        self.fusion.reference()
    }

    pub fn kinematics(&self) -> &KinematicState {
        &self.state.kinematics
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn last_reading(&self) -> Option<&SensorReading> {
        self.state.last_reading.as_ref()
    }

    pub fn config(&self) -> &AhrsConfig {
        &self.config
    }
}
