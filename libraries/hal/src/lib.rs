#![no_std]
extern crate nalgebra;

mod imu;
mod timer;
mod types;

pub use imu::*;
pub use timer::*;
pub use types::*;
