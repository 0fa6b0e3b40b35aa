use hal::Vector3d;

use crate::fusion::OrientationSet;
use crate::sensors::SensorReading;

/// Acceleration, velocity and position with the previous-tick values the
/// second-difference integration needs
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    /// Corrected acceleration of the latest tick, m/s²
    pub acceleration: Vector3d,
    /// Velocity, m/s
    pub velocity: Vector3d,
    /// Position, m
    pub position: Vector3d,
    /// Corrected acceleration the last integration step started from
    pub previous_acceleration: Vector3d,
    /// Velocity before the last integration step
    pub previous_velocity: Vector3d,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self {
            acceleration: Vector3d::zeros(),
            velocity: Vector3d::zeros(),
            position: Vector3d::zeros(),
            previous_acceleration: Vector3d::zeros(),
            previous_velocity: Vector3d::zeros(),
        }
    }
}

impl KinematicState {
    /// Check if the state contains valid (non-NaN, non-infinite) values
    pub fn is_valid(&self) -> bool {
        [
            &self.acceleration,
            &self.velocity,
            &self.position,
            &self.previous_acceleration,
            &self.previous_velocity,
        ]
        .iter()
        .all(|v| v.iter().all(|c| c.is_finite()))
    }
}

/// Everything the engine carries from one tick to the next
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    pub kinematics: KinematicState,

    /// Reported orientation of the latest tick
    pub orientation: OrientationSet,

    /// Clock reading at the end of the previous tick (or of startup)
    pub last_timestamp: f64,

    /// Latest sensor reading
    pub last_reading: Option<SensorReading>,

    /// Latest magnetic field with the hard-iron offset removed
    pub corrected_mag: Option<Vector3d>,

    /// Completed ticks
    pub ticks: u64,

    /// Ticks whose integration was skipped for a non-positive delta-time
    pub skipped_ticks: u64,
}

impl StateStore {
    pub fn new(start: f64) -> Self {
        Self {
            last_timestamp: start,
            ..Self::default()
        }
    }

    /// Seconds since the previous tick; updates the stored timestamp
    pub fn delta_time(&mut self, now: f64) -> f32 {
        let dt = (now - self.last_timestamp) as f32;
        self.last_timestamp = now;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_time() {
        let mut store = StateStore::new(10.0);
        assert_eq!(store.delta_time(10.5), 0.5);
        assert_eq!(store.delta_time(10.5), 0.0);
        assert_eq!(store.delta_time(10.25), -0.25);
        assert_eq!(store.last_timestamp, 10.25);
    }

    #[test]
    fn test_kinematic_validity() {
        let mut state = KinematicState::default();
        assert!(state.is_valid());
        state.velocity.y = f32::INFINITY;
        assert!(!state.is_valid());
    }
}
