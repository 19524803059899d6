//! Master and slave port identifiers.
//!
//! This module defines the opaque handles used to name fabric ports. It provides:
//! 1. **Type Safety:** Master and slave indices cannot be mixed at compile time.
//! 2. **Dense Indexing:** Handles are plain indices into the fabric's port arrays.
//! 3. **Stable Assignment:** Indices follow declaration order and never change.

use std::fmt;

/// Identifier of a request-issuing master port.
///
/// Assigned densely in declaration order when the fabric is configured and
/// stable for the lifetime of the fabric. The wrapped index doubles as the
/// fixed arbitration priority (lower wins under fixed-priority arbitration).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MasterId(pub usize);

/// Identifier of a request-serving slave port.
///
/// Assigned densely in declaration order when the fabric is configured and
/// stable for the lifetime of the fabric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlaveId(pub usize);

impl MasterId {
    /// Returns the raw index of this master port.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl SlaveId {
    /// Returns the raw index of this slave port.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for MasterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

impl fmt::Display for SlaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}
