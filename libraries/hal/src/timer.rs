/// Timing interfaces used by blocking sampling and tick measurement
use core::time::Duration;

/// Monotonic time source
pub trait Clock {
    /// Seconds elapsed since an arbitrary, fixed origin
    fn now(&mut self) -> f64;
}

/// Blocking pause
///
/// Real boards sleep; tests substitute an implementation that only records
/// or simulates the requested time.
pub trait Delay {
    /// Block for `duration`
    fn delay(&mut self, duration: Duration);
}
