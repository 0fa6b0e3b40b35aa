//! Dead reckoning from corrected linear acceleration.
//!
//! Integration works on successive differences:
//!
//! ```text
//! delta_accel    = corrected - previous_corrected
//! velocity      += delta_accel * dt
//! delta_velocity = velocity - previous_velocity
//! position      += delta_velocity * dt
//! ```
//!
//! This is not the textbook `v += a * dt; p += v * dt`. A constant non-zero
//! acceleration only contributes on the tick where it changes, so sustained
//! acceleration under-reports displacement. Position and velocity are never
//! corrected from outside and drift without bound.

use hal::Vector3d;

use crate::state::KinematicState;
use crate::utils::{dead_band, round_to};

/// Bias-corrects, rounds, dead-bands and integrates linear acceleration
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    /// Linear acceleration bias in m/s²
    offset: Vector3d,
    dead_band: f32,
    precision: u32,
}

impl MotionIntegrator {
    pub fn new(offset: Vector3d, dead_band: f32, precision: u32) -> Self {
        Self {
            offset,
            dead_band,
            precision,
        }
    }

    /// `raw - offset`, rounded, with every axis below the dead band forced to 0
    pub fn correct(&self, raw_linear_accel: &Vector3d) -> Vector3d {
        (raw_linear_accel - self.offset)
            .map(|v| dead_band(round_to(v, self.precision), self.dead_band))
    }

    /// Advance `state` by one tick of `dt` seconds with already corrected
    /// acceleration
    pub fn integrate(&self, state: &mut KinematicState, corrected: Vector3d, dt: f32) {
        let delta_accel = corrected - state.previous_acceleration;
        state.velocity += delta_accel * dt;
        let delta_velocity = state.velocity - state.previous_velocity;
        state.position += delta_velocity * dt;

        state.acceleration = corrected;
        state.previous_acceleration = corrected;
        state.previous_velocity = state.velocity;
    }

    /// Record the tick's acceleration without integrating. Velocity, position
    /// and the integration baseline are held.
    pub fn hold(&self, state: &mut KinematicState, corrected: Vector3d) {
        state.acceleration = corrected;
    }
}
