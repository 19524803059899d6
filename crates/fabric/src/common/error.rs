//! Configuration and transfer error definitions.
//!
//! This module defines the two error families of the fabric. It provides:
//! 1. **Configuration Errors:** Construction-time failures (overlaps, bad sizes,
//!    unknown port names, mutation after lock). The fabric is never partially built.
//! 2. **Transfer Errors:** Per-transfer validation failures (alignment, size).
//!    These reject the submitting call only and never disturb other ports.
//!
//! Decode errors are deliberately absent: an unmapped or unreachable address is
//! not a Rust error but a runtime condition answered on the port with the
//! two-cycle error response sequence.

use thiserror::Error;

use super::data::{BeatSize, BurstKind};

/// Descriptor of a declared address range, used in overlap diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeDescriptor {
    /// Name of the slave owning the range.
    pub slave: String,
    /// First address of the range.
    pub base: u32,
    /// Length of the range in bytes.
    pub size: u32,
}

impl std::fmt::Display for RangeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' [{:#010x}+{:#x}]",
            self.slave, self.base, self.size
        )
    }
}

/// Errors raised while building a fabric from its configuration.
///
/// Any of these aborts construction; a fabric is never half-built.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two ranges owned by different slaves intersect.
    #[error("address ranges overlap: {a} collides with {b}")]
    Overlap {
        /// The lower of the two colliding ranges.
        a: RangeDescriptor,
        /// The higher of the two colliding ranges.
        b: RangeDescriptor,
    },

    /// A range was declared with zero bytes.
    #[error("slave '{slave}' declares a zero-size address range")]
    ZeroSizeRange {
        /// Name of the offending slave.
        slave: String,
    },

    /// A range size is not a power of two or is below the minimum alignment.
    #[error("slave '{slave}' declares an invalid range size {size:#x}")]
    InvalidRangeSize {
        /// Name of the offending slave.
        slave: String,
        /// The rejected size in bytes.
        size: u32,
    },

    /// A range extends past the top of the 32-bit address space.
    #[error("range {base:#010x}+{size:#x} of slave '{slave}' exceeds the address space")]
    RangeOutOfBounds {
        /// Name of the offending slave.
        slave: String,
        /// First address of the range.
        base: u32,
        /// Length of the range in bytes.
        size: u32,
    },

    /// Automatic base assignment found no free aligned slot.
    #[error("no free {size:#x}-byte aligned slot for slave '{slave}'")]
    AddressSpaceExhausted {
        /// Name of the slave whose range could not be placed.
        slave: String,
        /// Requested size in bytes.
        size: u32,
    },

    /// The configuration was mutated after being locked.
    #[error("configuration is locked")]
    Locked,

    /// A connection names a master that was never declared.
    #[error("unknown master '{name}'")]
    UnknownMaster {
        /// The undeclared name.
        name: String,
    },

    /// A connection names a slave that was never declared.
    #[error("unknown slave '{name}'")]
    UnknownSlave {
        /// The undeclared name.
        name: String,
    },

    /// Two ports of the same kind share a name.
    #[error("duplicate port name '{name}'")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// The configured data path width is unsupported.
    #[error("unsupported data path width of {bits} bits")]
    InvalidDataWidth {
        /// The rejected width in bits.
        bits: u32,
    },
}

/// Errors raised when a single transfer fails validation.
///
/// Raised before any beat is sequenced; the offending transfer is rejected
/// and no fabric or slave state changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The beat size exceeds the configured data path width.
    #[error("{size} beats exceed the {width_bits}-bit data path")]
    SizeTooWide {
        /// Requested beat size.
        size: BeatSize,
        /// Configured data path width in bits.
        width_bits: u32,
    },

    /// The start address is not a multiple of the beat size.
    #[error("address {addr:#010x} is not aligned to a {size} beat")]
    MisalignedAddress {
        /// The misaligned address.
        addr: u32,
        /// Requested beat size.
        size: BeatSize,
    },

    /// A fixed-length incrementing burst does not start at its window base.
    #[error("{burst} burst at {addr:#010x} does not start at its aligned window")]
    MisalignedBurst {
        /// The offending start address.
        addr: u32,
        /// Requested burst kind.
        burst: BurstKind,
    },

    /// The supplied beat count does not match the burst kind.
    #[error("{kind} burst expects {expected} beats, {got} supplied")]
    BeatCountMismatch {
        /// Requested burst kind.
        kind: BurstKind,
        /// Beat count implied by the kind.
        expected: u32,
        /// Beat count actually supplied.
        got: u32,
    },
}
