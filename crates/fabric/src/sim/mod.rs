//! Simulation building blocks.
//!
//! Provides the reference slave model and the scripted master driver used
//! to assemble testbenches around a fabric.

/// Scripted burst read/write master driver.
pub mod driver;

/// Memory slave model with programmable wait states.
pub mod memory;

pub use driver::AhbMaster;
pub use memory::AhbMemory;
