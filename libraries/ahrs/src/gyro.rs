use hal::Vector3d;

use crate::utils::vector_rad_to_deg;
use crate::OrientationEstimate;

/// Integrates bias-corrected angular rate into roll/pitch/yaw.
///
/// Each axis accumulates independently: `angle += rate * dt`. The bias is
/// fixed at construction, so drift is never corrected.
///
/// The bias is the midpoint of raw rad/s calibration samples and is
/// subtracted unconverted from the deg/s rate.
#[derive(Debug, Clone)]
pub struct GyroIntegrator {
    /// Gyroscope bias, raw rad/s
    bias: Vector3d,
    /// Accumulated angles in degrees (x = roll, y = pitch, z = yaw)
    angles: Vector3d,
}

impl GyroIntegrator {
    /// Start integrating from `initial`
    pub fn new(bias: Vector3d, initial: OrientationEstimate) -> Self {
        Self {
            bias,
            angles: initial.as_vector(),
        }
    }

    /// `rad_to_deg(raw) - bias`
    pub fn corrected_rate(&self, raw_rate: &Vector3d) -> Vector3d {
        vector_rad_to_deg(raw_rate) - self.bias
    }

    /// Advance by one tick and return the new angles
    pub fn integrate(&mut self, corrected_rate: &Vector3d, dt: f32) -> OrientationEstimate {
        self.angles += corrected_rate * dt;
        self.orientation()
    }

    pub fn orientation(&self) -> OrientationEstimate {
        OrientationEstimate::from_vector(&self.angles)
    }
}
