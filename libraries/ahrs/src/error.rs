use hal::SensorFault;
use std::fmt;
use thiserror::Error;

/// Primary error type for the AHRS crate
#[derive(Error, Debug)]
pub enum AhrsError {
    /// The sensor stopped answering. Fatal during calibration and while running
    #[error("Sensor unavailable ({sensor}): {message}")]
    SensorUnavailable {
        /// Detailed error message
        message: String,
        /// The sensor channel that failed
        sensor: SensorType,
        /// Fault reported by the device layer
        #[source]
        source: SensorFault,
    },

    /// Invalid construction parameters
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Detailed error message
        message: String,
        /// Configuration parameter that caused the error
        parameter: Option<String>,
    },

    /// Clock faults (non-finite timestamps)
    #[error("Timing error: {message}")]
    TimingError {
        /// Detailed error message
        message: String,
        /// Time value that caused the error if available
        time_value: Option<f32>,
    },

    /// State became invalid (containing NaN or infinite values)
    #[error("Invalid state detected in {component}: {message}")]
    InvalidState {
        /// Detailed error message
        message: String,
        /// Component where invalid state was detected
        component: String,
    },

    /// The telemetry sink could not be written
    #[error("Telemetry error: {message}")]
    TelemetryError {
        /// Detailed error message
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Sensor channels that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    /// Device-decomposed linear acceleration
    LinearAccelerometer,
    /// Gravity-inclusive acceleration
    Accelerometer,
    /// Device-decomposed gravity vector
    Gravity,
    /// Gyroscope
    Gyroscope,
    /// Magnetometer
    Magnetometer,
    /// Device orientation pass-through (euler / quaternion)
    Orientation,
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorType::LinearAccelerometer => write!(f, "linear accelerometer"),
            SensorType::Accelerometer => write!(f, "accelerometer"),
            SensorType::Gravity => write!(f, "gravity"),
            SensorType::Gyroscope => write!(f, "gyroscope"),
            SensorType::Magnetometer => write!(f, "magnetometer"),
            SensorType::Orientation => write!(f, "orientation"),
        }
    }
}

/// Helper functions for creating common errors
pub mod helpers {
    use super::*;

    /// Create a sensor-unavailable error
    pub fn sensor_unavailable(
        message: impl Into<String>,
        sensor: SensorType,
        source: SensorFault,
    ) -> AhrsError {
        AhrsError::SensorUnavailable {
            message: message.into(),
            sensor,
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(
        message: impl Into<String>,
        parameter: Option<impl Into<String>>,
    ) -> AhrsError {
        AhrsError::ConfigurationError {
            message: message.into(),
            parameter: parameter.map(|p| p.into()),
        }
    }

    /// Create a timing error
    pub fn timing_error(message: impl Into<String>, time_value: Option<f32>) -> AhrsError {
        AhrsError::TimingError {
            message: message.into(),
            time_value,
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>, component: impl Into<String>) -> AhrsError {
        AhrsError::InvalidState {
            message: message.into(),
            component: component.into(),
        }
    }

    /// Create a telemetry error
    pub fn telemetry_error(message: impl Into<String>, source: std::io::Error) -> AhrsError {
        AhrsError::TelemetryError {
            message: message.into(),
            source,
        }
    }
}

/// Result type for AHRS operations
pub type AhrsResult<T> = Result<T, AhrsError>;
