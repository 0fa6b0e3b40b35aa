//! Complementary filter and zero reference.
//!
//! `fused = weight * gyro + (1 - weight) * tilt` with a fixed weight. The zero
//! reference is subtracted from reported values only; the gyro recurrence keeps
//! integrating from its own unreferenced angles.

use crate::OrientationEstimate;

/// Orientation snapshot subtracted from every reported estimate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZeroReference(OrientationEstimate);

impl ZeroReference {
    pub fn new(orientation: OrientationEstimate) -> Self {
        Self(orientation)
    }

    pub fn orientation(&self) -> OrientationEstimate {
        self.0
    }

    /// `value - reference`, per angle
    pub fn apply(&self, value: OrientationEstimate) -> OrientationEstimate {
        value - self.0
    }
}

/// The three estimates reported each tick, already referenced
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationSet {
    pub tilt: OrientationEstimate,
    pub gyro: OrientationEstimate,
    pub fused: OrientationEstimate,
}

/// Static, non-adaptive complementary filter
#[derive(Debug, Clone)]
pub struct OrientationFusion {
    /// Weight of the gyro estimate
    weight: f32,
    /// Latest unreferenced fused orientation
    current: OrientationEstimate,
    reference: ZeroReference,
}

impl OrientationFusion {
    /// `initial` is the orientation `zero` captures before the first update
    pub fn new(weight: f32, initial: OrientationEstimate) -> Self {
        Self {
            weight,
            current: initial,
            reference: ZeroReference::default(),
        }
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Blend without touching state or reference
    pub fn blend(&self, gyro: OrientationEstimate, tilt: OrientationEstimate) -> OrientationEstimate {
        gyro * self.weight + tilt * (1.0 - self.weight)
    }

    /// Fuse one tick's estimates and return all three as reported values
    pub fn update(&mut self, tilt: OrientationEstimate, gyro: OrientationEstimate) -> OrientationSet {
        self.current = self.blend(gyro, tilt);
        self.report(tilt, gyro)
    }

    /// Reference the given estimates against the zero reference
    pub fn report(&self, tilt: OrientationEstimate, gyro: OrientationEstimate) -> OrientationSet {
        OrientationSet {
            tilt: self.reference.apply(tilt),
            gyro: self.reference.apply(gyro),
            fused: self.reference.apply(self.current),
        }
    }

    /// Capture the current orientation as the new zero reference.
    ///
    /// Re-baselines to whatever is current; only call while stationary.
    pub fn zero(&mut self) -> ZeroReference {
        self.reference = ZeroReference::new(self.current);
        self.reference
    }

    pub fn reference(&self) -> ZeroReference {
        self.reference
    }

    /// Latest fused orientation before the reference is applied
    pub fn current(&self) -> OrientationEstimate {
        self.current
    }
}
