//! Orientation from gravity-aligned acceleration and tilt-compensated heading

use hal::Vector3d;

use crate::utils::rad_to_deg;
use crate::OrientationEstimate;

/// Instantaneous roll/pitch/yaw from one acceleration and one magnetic reading
#[derive(Debug, Clone, Copy)]
pub struct TiltEstimator {
    /// Below this, sqrt(ay² + az²) is treated as zero and pitch reads 0
    epsilon: f32,
}

impl TiltEstimator {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }

    /// Roll in degrees: `atan2(ay, az)`
    pub fn roll(&self, accel: &Vector3d) -> f32 {
        rad_to_deg(accel.y.atan2(accel.z))
    }

    /// Pitch in degrees: `atan2(-ax, sqrt(ay² + az²))`, 0 when the
    /// denominator vanishes
    pub fn pitch(&self, accel: &Vector3d) -> f32 {
        let denominator = (accel.y * accel.y + accel.z * accel.z).sqrt();
        if denominator < self.epsilon {
            return 0.0;
        }
        rad_to_deg((-accel.x).atan2(denominator))
    }

    /// Heading in degrees from the magnetic field rotated back to the
    /// horizontal plane using roll and pitch (both in degrees)
    pub fn yaw(&self, mag: &Vector3d, roll: f32, pitch: f32) -> f32 {
        let (sin_roll, cos_roll) = roll.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = pitch.to_radians().sin_cos();

        let mx_comp = mag.x * cos_pitch + mag.y * sin_roll * sin_pitch + mag.z * cos_roll * sin_pitch;
        let my_comp = mag.y * cos_roll - mag.z * sin_roll;

        rad_to_deg(my_comp.atan2(mx_comp))
    }

    /// Full estimate. `mag` must already have its hard-iron offset removed.
    pub fn estimate(&self, accel: &Vector3d, mag: &Vector3d) -> OrientationEstimate {
        let roll = self.roll(accel);
        let pitch = self.pitch(accel);
        let yaw = self.yaw(mag, roll, pitch);
        OrientationEstimate::new(roll, pitch, yaw)
    }
}

/// Direction of magnetic north expressed as roll/pitch/yaw angles (degrees).
///
/// East is gravity × field and north is east × gravity, both from unit
/// vectors; the yaw assumes the device is level. `None` when either input has
/// no direction.
pub fn north_reference(gravity: &Vector3d, mag: &Vector3d) -> Option<OrientationEstimate> {
    let down = gravity.try_normalize(f32::EPSILON)?;
    let field = mag.try_normalize(f32::EPSILON)?;

    let east = down.cross(&field);
    let north = east.cross(&down);

    Some(OrientationEstimate::new(
        rad_to_deg(north.z.atan2(north.y)),
        rad_to_deg(north.z.atan2(north.x)),
        rad_to_deg(north.x.atan2(north.y)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const G: f32 = 9.81;

    fn estimator() -> TiltEstimator {
        TiltEstimator::new(1e-6)
    }

    #[test]
    fn test_level_reads_zero() {
        let tilt = estimator();
        for g in [0.5, G, 20.0] {
            let accel = Vector3d::new(0.0, 0.0, g);
            assert_eq!(tilt.roll(&accel), 0.0);
            assert_eq!(tilt.pitch(&accel), 0.0);
        }
    }

    #[test]
    fn test_degenerate_pitch_is_zero() {
        let tilt = estimator();
        let accel = Vector3d::new(G, 0.0, 0.0);
        let pitch = tilt.pitch(&accel);
        assert!(pitch.is_finite());
        assert_eq!(pitch, 0.0);

        let estimate = tilt.estimate(&accel, &Vector3d::new(0.3, 0.1, 0.0));
        assert!(estimate.is_finite());
    }

    #[test]
    fn test_roll_and_pitch_angles() {
        let tilt = estimator();
        // rolled 90 degrees onto the right side
        assert_relative_eq!(tilt.roll(&Vector3d::new(0.0, G, 0.0)), 90.0, epsilon = 1e-4);
        // nose down 45 degrees
        let s = G * core::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(tilt.pitch(&Vector3d::new(-s, 0.0, s)), 45.0, epsilon = 1e-4);
    }

    #[test]
    fn test_level_heading() {
        let tilt = estimator();
        let accel = Vector3d::new(0.0, 0.0, G);
        assert_abs_diff_eq!(tilt.estimate(&accel, &Vector3d::new(0.4, 0.0, 0.0)).yaw, 0.0);
        assert_relative_eq!(
            tilt.estimate(&accel, &Vector3d::new(0.0, 0.4, 0.0)).yaw,
            90.0,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            tilt.estimate(&accel, &Vector3d::new(-0.4, 0.0, 0.0)).yaw,
            180.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_heading_is_tilt_compensated() {
        let tilt = estimator();
        // rolled 30 degrees: the vertical field component leaks into y unless compensated
        let roll = 30.0_f32;
        let (s, c) = roll.to_radians().sin_cos();
        let accel = Vector3d::new(0.0, G * s, G * c);
        // horizontal field along +X with a downward component, seen from the rolled frame
        let (hx, hz) = (0.2, 0.4);
        let mag = Vector3d::new(hx, hz * s, hz * c);
        let estimate = tilt.estimate(&accel, &mag);
        assert_relative_eq!(estimate.roll, 30.0, epsilon = 1e-3);
        assert_abs_diff_eq!(estimate.yaw, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_north_reference() {
        let north = north_reference(&Vector3d::new(0.0, 0.0, 9.81), &Vector3d::new(0.0, 0.4, 0.3))
            .unwrap();
        // north lies along +Y when level
        assert_abs_diff_eq!(north.yaw, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(north.roll, 0.0, epsilon = 1e-4);

        assert!(north_reference(&Vector3d::zeros(), &Vector3d::new(0.0, 0.4, 0.0)).is_none());
        assert!(north_reference(&Vector3d::new(0.0, 0.0, 9.81), &Vector3d::zeros()).is_none());
    }
}
