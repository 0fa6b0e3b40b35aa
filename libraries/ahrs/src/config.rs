use std::time::Duration;

use crate::error::helpers::config_error;
use crate::AhrsResult;

/// Default number of samples per calibration session
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// Default complementary filter weight given to the gyro estimate
pub const DEFAULT_FUSION_WEIGHT: f32 = 0.5;

/// Accelerations below this magnitude (m/s²) are treated as noise
pub const DEFAULT_DEAD_BAND: f32 = 0.75;

/// Decimal places kept from corrected acceleration
pub const DEFAULT_ACCEL_PRECISION: u32 = 2;

/// Configuration for the AHRS engine
#[derive(Debug, Clone)]
pub struct AhrsConfig {
    /// Samples drawn per calibration session (per channel)
    pub sample_count: usize,

    /// Emit phase transitions and calibration samples at info level.
    /// Never affects computed values.
    pub verbose: bool,

    /// Pause between two calibration samples
    pub sample_pause: Duration,

    /// Pause before and after each calibration session and before the
    /// initial orientation is taken
    pub settle_pause: Duration,

    /// Weight of the gyro estimate in the complementary filter, in [0, 1]
    pub fusion_weight: f32,

    /// Dead-band threshold applied to corrected acceleration (m/s²)
    pub dead_band: f32,

    /// Decimal places corrected acceleration is rounded to
    pub accel_precision: u32,

    /// Below this, the pitch denominator sqrt(ay² + az²) is treated as zero
    pub tilt_epsilon: f32,
}

impl Default for AhrsConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            verbose: false,
            sample_pause: Duration::from_secs(1),
            settle_pause: Duration::from_secs(1),
            fusion_weight: DEFAULT_FUSION_WEIGHT,
            dead_band: DEFAULT_DEAD_BAND,
            accel_precision: DEFAULT_ACCEL_PRECISION,
            tilt_epsilon: 1e-6,
        }
    }
}

impl AhrsConfig {
    /// Create a configuration from the two startup parameters
    pub fn new(sample_count: usize, verbose: bool) -> Self {
        Self {
            sample_count,
            verbose,
            ..Self::default()
        }
    }

    pub fn with_sample_pause(mut self, pause: Duration) -> Self {
        self.sample_pause = pause;
        self
    }

    pub fn with_settle_pause(mut self, pause: Duration) -> Self {
        self.settle_pause = pause;
        self
    }

    pub fn with_fusion_weight(mut self, weight: f32) -> Self {
        self.fusion_weight = weight;
        self
    }

    pub fn with_dead_band(mut self, threshold: f32) -> Self {
        self.dead_band = threshold;
        self
    }

    /// Level of phase and calibration diagnostics
    pub fn diagnostic_level(&self) -> log::Level {
        if self.verbose {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> AhrsResult<()> {
        if self.sample_count < 1 {
            return Err(config_error(
                format!("sample count must be at least 1, got {}", self.sample_count),
                Some("sample_count"),
            ));
        }

        if !(0.0..=1.0).contains(&self.fusion_weight) {
            return Err(config_error(
                format!("fusion weight must be within [0, 1], got {}", self.fusion_weight),
                Some("fusion_weight"),
            ));
        }

        if !self.dead_band.is_finite() || self.dead_band < 0.0 {
            return Err(config_error(
                format!("dead band must be a non-negative number, got {}", self.dead_band),
                Some("dead_band"),
            ));
        }

        if !self.tilt_epsilon.is_finite() || self.tilt_epsilon < 0.0 {
            return Err(config_error(
                format!("tilt epsilon must be a non-negative number, got {}", self.tilt_epsilon),
                Some("tilt_epsilon"),
            ));
        }

        Ok(())
    }
}
