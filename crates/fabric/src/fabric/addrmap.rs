//! Address table construction and lookup.
//!
//! The table maps the 32-bit address space onto slave ports. It provides:
//! 1. **Placement:** First-fit assignment of auto-based ranges, scanning from
//!    zero in size-aligned steps.
//! 2. **Normalization:** Declared ranges are sorted and same-owner overlaps
//!    merged; an overlap between different owners is a configuration error.
//! 3. **Lookup:** Binary search over the normalized, disjoint ranges; a miss
//!    means the address decodes to no slave.

use crate::common::addr::align_up;
use crate::common::error::{ConfigError, RangeDescriptor};
use crate::common::ids::SlaveId;

/// Smallest allowed range size in bytes.
///
/// Range sizes must be powers of two no smaller than this, which keeps
/// auto-placement alignment meaningful and the decoded map coarse enough
/// to print.
pub const MIN_RANGE_BYTES: u32 = 1024;

/// Exclusive upper bound of the 32-bit address space.
const SPACE_END: u64 = 1 << 32;

/// One declared address range, with any auto base already resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeEntry {
    /// Slave that owns the range.
    pub slave: SlaveId,
    /// First address of the range.
    pub base: u32,
    /// Length of the range in bytes; a power of two.
    pub size: u32,
}

impl RangeEntry {
    /// Returns the exclusive end of the range.
    #[inline(always)]
    pub fn end(&self) -> u64 {
        u64::from(self.base) + u64::from(self.size)
    }
}

/// One normalized (possibly merged) decoded range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MappedRange {
    /// Slave the range decodes to.
    pub slave: SlaveId,
    /// First decoded address.
    pub start: u32,
    /// Exclusive end; may equal `1 << 32` when the range touches the top.
    pub end: u64,
}

impl MappedRange {
    /// Returns the decoded length in bytes.
    #[inline(always)]
    pub fn size(&self) -> u64 {
        self.end - u64::from(self.start)
    }
}

/// Built address map: declared entries plus the normalized lookup rows.
#[derive(Clone, Debug, Default)]
pub struct AddressTable {
    entries: Vec<RangeEntry>,
    rows: Vec<MappedRange>,
}

impl AddressTable {
    /// Validates declared ranges and builds the normalized lookup rows.
    ///
    /// Entries arrive in declaration order with auto bases already resolved.
    /// `slave_names` is indexed by [`SlaveId`] and used only for error
    /// rendering.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a range has a zero or non-power-of-two
    /// size, falls below [`MIN_RANGE_BYTES`], extends past the top of the
    /// address space, or overlaps a range owned by a different slave.
    pub fn build(entries: &[RangeEntry], slave_names: &[String]) -> Result<Self, ConfigError> {
        for entry in entries {
            validate_entry(entry, slave_names)?;
        }

        let mut sorted = entries.to_vec();
        sorted.sort_by_key(|e| (e.base, e.size));

        let mut rows: Vec<MappedRange> = Vec::with_capacity(sorted.len());
        // Entry whose end currently bounds the last row; cited on conflict.
        let mut frontier: Option<RangeEntry> = None;
        for entry in &sorted {
            match rows.last_mut() {
                Some(row) if u64::from(entry.base) < row.end => {
                    if row.slave != entry.slave {
                        let prior = frontier.unwrap_or(*entry);
                        return Err(ConfigError::Overlap {
                            a: describe(&prior, slave_names),
                            b: describe(entry, slave_names),
                        });
                    }
                    if entry.end() > row.end {
                        row.end = entry.end();
                        frontier = Some(*entry);
                    }
                }
                _ => {
                    rows.push(MappedRange {
                        slave: entry.slave,
                        start: entry.base,
                        end: entry.end(),
                    });
                    frontier = Some(*entry);
                }
            }
        }

        Ok(Self {
            entries: entries.to_vec(),
            rows,
        })
    }

    /// Resolves the address of one beat to its owning slave.
    ///
    /// Binary search over the normalized rows; `None` means the address
    /// decodes to no slave.
    pub fn lookup(&self, addr: u32) -> Option<SlaveId> {
        let addr = u64::from(addr);
        let idx = self.rows.partition_point(|r| r.end <= addr);
        let row = self.rows.get(idx)?;
        (addr >= u64::from(row.start)).then_some(row.slave)
    }

    /// Returns the declared entries in declaration order.
    pub fn entries(&self) -> &[RangeEntry] {
        &self.entries
    }

    /// Returns the normalized rows in ascending address order.
    pub fn ranges(&self) -> &[MappedRange] {
        &self.rows
    }

    /// Returns the unmapped spans between consecutive decoded ranges.
    ///
    /// Each pair is `(start, exclusive end)`. Space below the first range and
    /// above the last is not reported.
    pub fn gaps(&self) -> Vec<(u64, u64)> {
        self.rows
            .windows(2)
            .filter(|w| w[0].end < u64::from(w[1].start))
            .map(|w| (w[0].end, u64::from(w[1].start)))
            .collect()
    }

    /// Returns the decoded span from the first mapped byte to the last.
    pub fn span(&self) -> u64 {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => last.end - u64::from(first.start),
            _ => 0,
        }
    }
}

/// Finds the lowest size-aligned base that fits a new range.
///
/// Scans upward from zero; every candidate is aligned to `size`. A candidate
/// colliding with any already placed entry is bumped past the collision and
/// re-aligned. Returns `None` when no slot fits below the top of the address
/// space.
pub fn first_fit(entries: &[RangeEntry], size: u32) -> Option<u32> {
    let size = u64::from(size);
    let mut candidate: u64 = 0;
    loop {
        let end = candidate + size;
        if end > SPACE_END {
            return None;
        }
        let conflict = entries
            .iter()
            .filter(|e| u64::from(e.base) < end && candidate < e.end())
            .map(RangeEntry::end)
            .max();
        match conflict {
            None => return u32::try_from(candidate).ok(),
            Some(conflict_end) => candidate = align_up(conflict_end, size),
        }
    }
}

/// Checks a declared range size: nonzero, a power of two, at least the
/// minimum.
pub(crate) fn validate_size(slave: &str, size: u32) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::ZeroSizeRange {
            slave: slave.to_owned(),
        });
    }
    if !size.is_power_of_two() || size < MIN_RANGE_BYTES {
        return Err(ConfigError::InvalidRangeSize {
            slave: slave.to_owned(),
            size,
        });
    }
    Ok(())
}

/// Checks that a placed range stays inside the 32-bit address space.
pub(crate) fn validate_bounds(slave: &str, base: u32, size: u32) -> Result<(), ConfigError> {
    if u64::from(base) + u64::from(size) > SPACE_END {
        return Err(ConfigError::RangeOutOfBounds {
            slave: slave.to_owned(),
            base,
            size,
        });
    }
    Ok(())
}

/// Checks one declared range for size and bounds violations.
fn validate_entry(entry: &RangeEntry, slave_names: &[String]) -> Result<(), ConfigError> {
    let slave = name_of(entry.slave, slave_names);
    validate_size(&slave, entry.size)?;
    validate_bounds(&slave, entry.base, entry.size)
}

fn describe(entry: &RangeEntry, slave_names: &[String]) -> RangeDescriptor {
    RangeDescriptor {
        slave: name_of(entry.slave, slave_names),
        base: entry.base,
        size: entry.size,
    }
}

fn name_of(slave: SlaveId, slave_names: &[String]) -> String {
    slave_names
        .get(slave.index())
        .cloned()
        .unwrap_or_else(|| slave.to_string())
}
