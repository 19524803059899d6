//! Burst address sequencing.
//!
//! This module turns a first-beat address and a burst kind into the full beat
//! address sequence. It provides:
//! 1. **Validation:** Width, alignment, and window checks before any beat issues.
//! 2. **Wrap Arithmetic:** Fixed-length bursts advance inside an aligned window
//!    whose low bits wrap; open-ended bursts increment across the address space.
//! 3. **Lockstep Use:** The fabric and the testbench drivers derive beat
//!    addresses from the same cursor so they never disagree mid-burst.

use crate::common::addr::is_aligned;
use crate::common::data::{BeatSize, BurstKind};
use crate::common::error::TransferError;

/// Per-transfer beat address generator.
///
/// A cursor is created once per burst after validation and consumed one
/// `advance` per accepted beat. Fixed-length bursts split their start address
/// into an aligned window base and an in-window offset; only the offset
/// advances, masked to the window, which yields the wrapping sequence.
/// Open-ended incrementing bursts use a full mask, so the offset increments
/// modulo the 32-bit address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurstCursor {
    base: u32,
    offset: u32,
    mask: u32,
    step: u32,
    remaining: u32,
    total: u32,
}

impl BurstCursor {
    /// Validates a transfer and positions a cursor on its first beat.
    ///
    /// Checks run in a fixed order: the beat size must fit the data path,
    /// the address must be aligned to the beat size, and fixed-length
    /// incrementing bursts must start at offset zero of their window
    /// (wrapping bursts may start anywhere inside it).
    ///
    /// # Arguments
    ///
    /// * `addr` - Address of the first beat.
    /// * `size` - Width of every beat in the burst.
    /// * `kind` - Burst kind; fixes the beat count except for `Incr`.
    /// * `declared_len` - Beat count for `Incr` bursts (clamped to at least 1);
    ///   ignored for all other kinds.
    /// * `width_bits` - Data path width in bits.
    ///
    /// # Returns
    ///
    /// A cursor positioned on the first beat.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`TransferError`] check; no beat is sequenced.
    pub fn first(
        addr: u32,
        size: BeatSize,
        kind: BurstKind,
        declared_len: u32,
        width_bits: u32,
    ) -> Result<Self, TransferError> {
        if size.bits() > width_bits {
            return Err(TransferError::SizeTooWide { size, width_bits });
        }
        let step = size.bytes();
        if !is_aligned(addr, step) {
            return Err(TransferError::MisalignedAddress { addr, size });
        }

        let (mask, total) = match kind.len_log2() {
            Some(len_log2) => {
                let mask = (1u32 << (u32::from(size.encoding()) + len_log2)) - 1;
                if !kind.is_wrapping() && addr & mask != 0 {
                    return Err(TransferError::MisalignedBurst { addr, burst: kind });
                }
                (mask, 1u32 << len_log2)
            }
            None => {
                let total = if kind == BurstKind::Single {
                    1
                } else {
                    declared_len.max(1)
                };
                (u32::MAX, total)
            }
        };

        Ok(Self {
            base: addr & !mask,
            offset: addr & mask,
            mask,
            step,
            remaining: total,
            total,
        })
    }

    /// Returns the address of the current beat.
    #[inline(always)]
    pub fn addr(&self) -> u32 {
        self.base.wrapping_add(self.offset)
    }

    /// Moves the cursor to the next beat.
    ///
    /// The in-window offset advances by one beat width and wraps at the
    /// window mask. For open-ended bursts the mask is full, so the address
    /// wraps only at the top of the 32-bit space.
    #[inline]
    pub fn advance(&mut self) {
        self.offset = self.offset.wrapping_add(self.step) & self.mask;
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Returns how many beats have not yet been accepted (current beat included).
    #[inline(always)]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the total beat count of the burst.
    #[inline(always)]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Returns how many beats have been accepted so far.
    #[inline(always)]
    pub fn accepted(&self) -> u32 {
        self.total - self.remaining
    }

    /// Drops all beats that have not yet issued.
    ///
    /// Used when a master terminates an open-ended burst early; already
    /// accepted beats are unaffected.
    pub(crate) fn truncate(&mut self) {
        self.remaining = 0;
    }
}
