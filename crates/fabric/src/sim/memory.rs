//! Memory-backed slave model.
//!
//! [`AhbMemory`] is the workhorse responder for benches: a byte array behind
//! a pipelined slave port. It provides:
//! 1. **Split-Phase Timing:** An address phase latches one tick and its data
//!    phase completes on a later tick, stretched by a configurable number of
//!    wait states.
//! 2. **Byte-Lane Commit:** Writes extract the addressed lanes from the bus
//!    word and reads place them back, little-endian, exactly as a bus-width
//!    data path carries narrow beats.
//! 3. **Bench Access:** Contents can be preloaded and inspected directly,
//!    bypassing the port.

use crate::common::addr::{is_aligned, lane_shift};
use crate::common::data::BeatSize;
use crate::common::error::ConfigError;
use crate::fabric::signals::{SlaveRequest, SlaveReply};
use crate::fabric::slave::SlaveModel;

/// Fill pattern for fresh memory, one bus word at a time.
const FILL_WORD: u32 = 0xDEAD_BEEF;

/// Latched address phase awaiting its data phase.
#[derive(Clone, Copy, Debug)]
struct DataPhase {
    addr: u32,
    write: bool,
    size: BeatSize,
}

/// Byte-addressed memory behind a pipelined slave port.
///
/// The model times its own data phases: it is the ready source for its
/// layer, so it stalls by holding ready-out low rather than sampling the
/// forwarded bus ready. Addresses wrap at the memory size, mirroring how a
/// decoded range aliases onto a smaller backing array.
#[derive(Clone, Debug)]
pub struct AhbMemory {
    name: String,
    width_bits: u32,
    addr_mask: u32,
    ready_delay: u32,
    data: Vec<u8>,
    phase: Option<DataPhase>,
    stall: u32,
}

impl AhbMemory {
    /// Creates a memory filled with the default pattern.
    ///
    /// # Arguments
    ///
    /// * `name` - Model name, used in logs.
    /// * `size` - Backing array length in bytes; a power of two.
    /// * `width_bits` - Data path width; must match the fabric's.
    /// * `ready_delay` - Wait states inserted into every data phase.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::InvalidDataWidth`] or a range-size error
    /// when the size is zero or not a power of two.
    pub fn new(
        name: &str,
        size: u32,
        width_bits: u32,
        ready_delay: u32,
    ) -> Result<Self, ConfigError> {
        if !matches!(width_bits, 8 | 16 | 32 | 64) {
            return Err(ConfigError::InvalidDataWidth { bits: width_bits });
        }
        if size == 0 {
            return Err(ConfigError::ZeroSizeRange {
                slave: name.to_owned(),
            });
        }
        if !size.is_power_of_two() {
            return Err(ConfigError::InvalidRangeSize {
                slave: name.to_owned(),
                size,
            });
        }
        let fill = FILL_WORD.to_le_bytes();
        Ok(Self {
            name: name.to_owned(),
            width_bits,
            addr_mask: size - 1,
            ready_delay,
            data: (0..size).map(|i| fill[(i % 4) as usize]).collect(),
            phase: None,
            stall: 0,
        })
    }

    /// Returns the backing bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Overwrites contents starting at `addr`, wrapping at the memory size.
    pub fn set_data(&mut self, addr: u32, bytes: &[u8]) {
        for (i, byte) in bytes.iter().enumerate() {
            let at = (addr as usize + i) & self.addr_mask as usize;
            self.data[at] = *byte;
        }
    }

    fn commit_write(&mut self, phase: DataPhase, hwdata: u64) {
        let shift = lane_shift(phase.addr, self.width_bits);
        let value = (hwdata >> shift) & phase.size.lane_mask();
        let base = phase.addr as usize;
        for i in 0..phase.size.bytes() as usize {
            let at = (base + i) & self.addr_mask as usize;
            self.data[at] = (value >> (8 * i)) as u8;
        }
    }

    fn fetch_read(&self, phase: DataPhase) -> u64 {
        let base = phase.addr as usize;
        let mut value: u64 = 0;
        for i in 0..phase.size.bytes() as usize {
            let at = (base + i) & self.addr_mask as usize;
            value |= u64::from(self.data[at]) << (8 * i);
        }
        value << lane_shift(phase.addr, self.width_bits)
    }
}

impl SlaveModel for AhbMemory {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, req: &SlaveRequest) -> SlaveReply {
        let mut reply = SlaveReply::default();

        if let Some(phase) = self.phase {
            if self.stall > 0 {
                self.stall -= 1;
                reply.hreadyout = false;
                return reply;
            }
            debug_assert!(
                is_aligned(phase.addr, phase.size.bytes()),
                "data phase address must be beat-aligned"
            );
            if phase.write {
                self.commit_write(phase, req.hwdata);
            } else {
                reply.hrdata = self.fetch_read(phase);
            }
            self.phase = None;
        }

        if req.hsel && req.htrans.is_active() {
            self.phase = Some(DataPhase {
                addr: req.haddr & self.addr_mask,
                write: req.hwrite,
                size: req.hsize,
            });
            self.stall = self.ready_delay;
        }
        reply
    }

    fn reset(&mut self) {
        self.phase = None;
        self.stall = 0;
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn std::any::Any> {
        Some(self)
    }
}
