//! Shared bench infrastructure for the interconnect test suite.

/// The standard two-master test bench and stepping helpers.
pub mod harness;


pub use harness::TestBench;
