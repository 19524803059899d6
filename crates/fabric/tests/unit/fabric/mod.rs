//! Unit tests for the fabric core.


/// Per-slave ownership and grant policies.
pub mod arbiter;

/// Burst address sequencing and validation.
pub mod burst;
