/// Common data types for hardware abstraction interfaces
pub use nalgebra::Vector3;

/// 3D vector representation using nalgebra.
///
/// The unit depends on where the vector comes from: m/s² for accelerations,
/// rad/s (raw) or deg/s (corrected) for angular rates, gauss for magnetic
/// field and degrees for orientations.
pub type Vector3d = Vector3<f32>;
