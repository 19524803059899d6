//! Address arithmetic and size formatting helpers.
//!
//! This module collects the small address-level utilities shared by the
//! decoder, the burst sequencer, and the overview report. It provides:
//! 1. **Alignment:** Power-of-two alignment checks and rounding.
//! 2. **Byte Lanes:** The data-lane shift used to place narrow transfers on a wide bus.
//! 3. **Formatting:** Human-readable byte quantities for the address-map report.

use std::fmt;

/// Returns whether `addr` is aligned to `align` bytes.
///
/// `align` must be a power of two.
#[inline(always)]
pub fn is_aligned(addr: u32, align: u32) -> bool {
    debug_assert!(align.is_power_of_two());
    addr & (align - 1) == 0
}

/// Rounds `value` up to the next multiple of `align`.
///
/// `align` must be a power of two. Computed in 64-bit so callers can detect
/// results past the top of the 32-bit address space.
#[inline(always)]
pub fn align_up(value: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// Returns the bit shift that places a transfer at `addr` on its byte lanes
/// of a `width_bits`-wide data bus.
///
/// A narrow transfer travels on the byte lanes selected by the low address
/// bits, so a byte write to offset 2 of a 32-bit bus occupies bits 23..16.
///
/// # Arguments
///
/// * `addr` - Address of the transfer.
/// * `width_bits` - Data bus width in bits (power of two, at most 64).
///
/// # Returns
///
/// The left-shift in bits for write data (and right-shift for read data).
#[inline(always)]
pub fn lane_shift(addr: u32, width_bits: u32) -> u32 {
    debug_assert!(width_bits.is_power_of_two() && width_bits <= 64);
    (addr % (width_bits / 8)) * 8
}

/// A byte quantity rendered in human units for the overview report.
///
/// Exact multiples of a unit print without decimals (`64 KB`, `2 GB`);
/// everything else keeps two decimals (`255.84 MB`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bytes(pub u64);

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: &[(u64, &str)] = &[
            (1 << 40, "TB"),
            (1 << 30, "GB"),
            (1 << 20, "MB"),
            (1 << 10, "KB"),
        ];
        for &(unit, name) in UNITS {
            if self.0 >= unit {
                return if self.0 % unit == 0 {
                    write!(f, "{} {}", self.0 / unit, name)
                } else {
                    write!(f, "{:.2} {}", self.0 as f64 / unit as f64, name)
                };
            }
        }
        write!(f, "{} B", self.0)
    }
}
