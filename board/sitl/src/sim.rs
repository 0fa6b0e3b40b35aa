//! Deterministic IMU for running the engine on a desktop

use ahrs::utils::{deg_to_rad, rad_to_deg};
use hal::{ImuSensor, SensorFault, Vector3d};
use nalgebra::{Quaternion, UnitQuaternion};

const GRAVITY: f32 = 9.81;

/// Horizontal and vertical components of the simulated earth field, gauss
const EARTH_FIELD: [f32; 3] = [0.22, 0.0, -0.41];

/// Forward push, then braking, then a slow turn on the spot
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    /// Magnitude of the push and of the braking, m/s²
    pub push: f32,
    /// Length of the push and of the braking, s
    pub push_time: f32,
    /// Turn rate, deg/s
    pub turn_rate: f32,
    /// Length of the turn, s
    pub turn_time: f32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            push: 1.5,
            push_time: 0.5,
            turn_rate: 15.0,
            turn_time: 2.0,
        }
    }
}

impl Profile {
    /// Body-frame forward acceleration and yaw rate at `t` seconds into the motion
    fn at(&self, t: f32) -> (f32, f32) {
        if t < 0.0 {
            (0.0, 0.0)
        } else if t < self.push_time {
            (self.push, 0.0)
        } else if t < 2.0 * self.push_time {
            (-self.push, 0.0)
        } else if t < 2.0 * self.push_time + self.turn_time {
            (0.0, self.turn_rate)
        } else {
            (0.0, 0.0)
        }
    }
}

/// Level vehicle that stays still for a number of samples, then follows a [`Profile`].
///
/// Time advances by one period per linear-acceleration read, which the
/// engine does once per calibration sample and once per tick. Fixed sensor
/// biases are added so calibration has something to remove.
pub struct SimulatedImu {
    period: f32,
    still_samples: u64,
    samples: u64,
    profile: Profile,
    yaw: f32,
    forward: f32,
    turn_rate: f32,
    accel_bias: Vector3d,
    gyro_bias: Vector3d,
    hard_iron: Vector3d,
}

impl SimulatedImu {
    pub fn new(rate_hz: u32, still_samples: u64) -> Self {
        Self {
            period: 1.0 / rate_hz.max(1) as f32,
            still_samples,
            samples: 0,
            profile: Profile::default(),
            yaw: 0.0,
            forward: 0.0,
            turn_rate: 0.0,
            accel_bias: Vector3d::new(0.05, -0.03, 0.02),
            gyro_bias: Vector3d::new(0.002, -0.001, 0.0015),
            hard_iron: Vector3d::new(0.1, -0.05, 0.02),
        }
    }

    fn step(&mut self) {
        let t = (self.samples as f32 - self.still_samples as f32) * self.period;
        self.samples += 1;
        let (forward, turn_rate) = self.profile.at(t);
        self.forward = forward;
        self.turn_rate = turn_rate;
        self.yaw += turn_rate * self.period;
    }

    fn attitude(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(0.0, 0.0, deg_to_rad(self.yaw))
    }

    /// Simulated heading in degrees
    #[cfg(test)]
    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn gravity_body(&self) -> Vector3d {
        Vector3d::new(0.0, 0.0, GRAVITY)
    }
}

impl ImuSensor for SimulatedImu {
    fn linear_acceleration(&mut self) -> Result<Vector3d, SensorFault> {
        self.step();
        Ok(Vector3d::new(self.forward, 0.0, 0.0) + self.accel_bias)
    }

    fn acceleration(&mut self) -> Result<Vector3d, SensorFault> {
        Ok(Vector3d::new(self.forward, 0.0, 0.0) + self.gravity_body())
    }

    fn gravity(&mut self) -> Result<Vector3d, SensorFault> {
        Ok(self.gravity_body())
    }

    fn gyro(&mut self) -> Result<Vector3d, SensorFault> {
        Ok(Vector3d::new(0.0, 0.0, deg_to_rad(self.turn_rate)) + self.gyro_bias)
    }

    fn magnetic(&mut self) -> Result<Vector3d, SensorFault> {
        let field = Vector3d::from(EARTH_FIELD);
        Ok(self.attitude().inverse_transform_vector(&field) + self.hard_iron)
    }

    fn euler(&mut self) -> Result<Option<Vector3d>, SensorFault> {
        let (roll, pitch, yaw) = self.attitude().euler_angles();
        Ok(Some(Vector3d::new(
            rad_to_deg(yaw),
            rad_to_deg(roll),
            rad_to_deg(pitch),
        )))
    }

    fn quaternion(&mut self) -> Result<Option<Quaternion<f32>>, SensorFault> {
        Ok(Some(*self.attitude().quaternion()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_still_before_profile() {
        let mut imu = SimulatedImu::new(50, 10);
        for _ in 0..10 {
            let accel = imu.linear_acceleration().unwrap();
            assert_relative_eq!(accel, imu.accel_bias);
        }
        assert_eq!(imu.yaw(), 0.0);
    }

    #[test]
    fn test_push_then_brake() {
        let mut imu = SimulatedImu::new(10, 0);
        let first = imu.linear_acceleration().unwrap();
        assert_relative_eq!(first.x, 1.5 + 0.05, epsilon = 1e-5);
        for _ in 0..5 {
            imu.linear_acceleration().unwrap();
        }
        let braking = imu.linear_acceleration().unwrap();
        assert_relative_eq!(braking.x, -1.5 + 0.05, epsilon = 1e-5);
    }

    #[test]
    fn test_turn_reaches_heading() {
        let mut imu = SimulatedImu::new(10, 0);
        for _ in 0..40 {
            imu.linear_acceleration().unwrap();
        }
        // two seconds at 15 deg/s
        assert_relative_eq!(imu.yaw(), 30.0, epsilon = 1e-3);

        let euler = imu.euler().unwrap().unwrap();
        assert_relative_eq!(euler.x, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_magnetometer_follows_heading() {
        let mut imu = SimulatedImu::new(10, 0);
        let before = imu.magnetic().unwrap() - imu.hard_iron;
        assert_relative_eq!(before, Vector3d::from(EARTH_FIELD), epsilon = 1e-6);

        for _ in 0..40 {
            imu.linear_acceleration().unwrap();
        }
        let after = imu.magnetic().unwrap() - imu.hard_iron;
        assert_relative_eq!(after.norm(), before.norm(), epsilon = 1e-5);
        assert!(after.y < 0.0);
    }
}
