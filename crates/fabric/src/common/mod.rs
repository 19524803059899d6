//! Common types shared across the interconnect simulator.
//!
//! This module provides the building blocks used by every fabric component.
//! It includes:
//! 1. **Port Identifiers:** Opaque master and slave handles with dense indices.
//! 2. **Wire Encodings:** Transfer phase, burst kind, beat size, and response values.
//! 3. **Address Helpers:** Alignment arithmetic, byte-lane shifts, and size formatting.
//! 4. **Error Handling:** Configuration and per-transfer error definitions.

/// Address arithmetic and human-readable size formatting.
pub mod addr;

/// Wire-level transfer encodings (phase, burst, size, response).
pub mod data;

/// Configuration and transfer error types.
pub mod error;

/// Master and slave port identifiers.
pub mod ids;

pub use addr::{Bytes, lane_shift};
pub use data::{BeatSize, BurstKind, HResp, TransType};
pub use error::{ConfigError, RangeDescriptor, TransferError};
pub use ids::{MasterId, SlaveId};
