use core::f32::consts::PI;
use hal::Vector3d;

/// Convert degrees to radians
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

/// Convert radians to degrees
pub fn rad_to_deg(rad: f32) -> f32 {
    rad * 180.0 / PI
}

/// Convert every component of a rad/s vector to deg/s
pub fn vector_rad_to_deg(v: &Vector3d) -> Vector3d {
    v.map(rad_to_deg)
}

/// Round to a fixed number of decimal places, half away from zero
pub fn round_to(value: f32, decimals: u32) -> f32 {
    let scale = 10f32.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Force values strictly inside `(-threshold, threshold)` to exactly zero
pub fn dead_band(value: f32, threshold: f32) -> f32 {
    if value.abs() < threshold {
        0.0
    } else {
        value
    }
}

/// Check that all components are finite
pub fn is_finite(v: &Vector3d) -> bool {
    v.iter().all(|c| c.is_finite())
}
