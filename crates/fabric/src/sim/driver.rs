//! Scripted master driver.
//!
//! [`AhbMaster`] turns queued burst operations into the per-tick port
//! signals a master presents, reacting to the previous tick's reply exactly
//! like a synchronous bus master. It provides:
//! 1. **Queued Operations:** Burst writes and reads validated up front, so a
//!    bad script fails at the call site instead of on the wire.
//! 2. **Handshake Discipline:** All signals hold while ready is low, write
//!    data trails each accepted address phase by one data phase, and the
//!    next operation asserts only once the bus is quiet.
//! 3. **Abort On Error:** An error response drops the rest of the operation;
//!    beats that already completed stay completed.

use std::collections::VecDeque;

use tracing::trace;

use crate::common::addr::lane_shift;
use crate::common::data::{BeatSize, BurstKind, TransType};
use crate::common::error::TransferError;
use crate::fabric::burst::BurstCursor;
use crate::fabric::signals::{MasterReply, MasterRequest};

/// One queued burst operation.
#[derive(Clone, Debug)]
struct BurstOp {
    write: bool,
    size: BeatSize,
    kind: BurstKind,
    cursor: BurstCursor,
    wdata: VecDeque<u64>,
    /// An address phase is on the wire awaiting acceptance.
    presented: bool,
    /// Address of the beat currently in its data phase.
    data_addr: Option<u32>,
    /// Write data currently driven, already lane-shifted.
    hwdata: u64,
}

/// Cycle-driven master-port stimulus.
///
/// Call [`drive`](Self::drive) once per tick with the previous tick's reply
/// and feed the returned request to the fabric.
#[derive(Clone, Debug)]
pub struct AhbMaster {
    name: String,
    width_bits: u32,
    ops: VecDeque<BurstOp>,
    current: Option<BurstOp>,
    reads: Vec<u64>,
}

impl AhbMaster {
    /// Creates an idle driver.
    pub fn new(name: &str, width_bits: u32) -> Self {
        Self {
            name: name.to_owned(),
            width_bits,
            ops: VecDeque::new(),
            current: None,
            reads: Vec::new(),
        }
    }

    /// Returns the driver's name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queues a burst write of one value per beat.
    ///
    /// Fixed-length kinds must be given exactly their beat count; an
    /// open-ended `Incr` takes its length from the data.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; nothing is queued.
    pub fn write(
        &mut self,
        addr: u32,
        data: &[u64],
        size: BeatSize,
        kind: BurstKind,
    ) -> Result<(), TransferError> {
        let beats = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let cursor = Self::sequence(addr, size, kind, beats, self.width_bits)?;
        self.ops.push_back(BurstOp {
            write: true,
            size,
            kind,
            cursor,
            wdata: data.iter().copied().collect(),
            presented: false,
            data_addr: None,
            hwdata: 0,
        });
        Ok(())
    }

    /// Queues a burst read of `len` beats.
    ///
    /// Completed beat values accumulate until [`take_read_data`]
    /// (Self::take_read_data) drains them.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; nothing is queued.
    pub fn read(
        &mut self,
        addr: u32,
        len: u32,
        size: BeatSize,
        kind: BurstKind,
    ) -> Result<(), TransferError> {
        let cursor = Self::sequence(addr, size, kind, len, self.width_bits)?;
        self.ops.push_back(BurstOp {
            write: false,
            size,
            kind,
            cursor,
            wdata: VecDeque::new(),
            presented: false,
            data_addr: None,
            hwdata: 0,
        });
        Ok(())
    }

    /// Computes this tick's port signals from the previous tick's reply.
    pub fn drive(&mut self, prev: &MasterReply) -> MasterRequest {
        let had_op = self.current.is_some();

        if let Some(op) = self.current.as_mut() {
            if prev.hresp.is_error() {
                trace!(driver = %self.name, "operation aborted on error response");
                self.current = None;
            } else if prev.hready {
                if let Some(addr) = op.data_addr.take() {
                    if !op.write {
                        let value =
                            (prev.hrdata >> lane_shift(addr, self.width_bits)) & op.size.lane_mask();
                        self.reads.push(value);
                    }
                }
                if op.presented {
                    let accepted = op.cursor.addr();
                    op.data_addr = Some(accepted);
                    if op.write {
                        let raw = op.wdata.pop_front().unwrap_or(0);
                        op.hwdata = (raw & op.size.lane_mask())
                            << lane_shift(accepted, self.width_bits);
                    }
                    op.cursor.advance();
                    op.presented = op.cursor.remaining() > 0;
                } else if op.data_addr.is_none() {
                    self.current = None;
                }
            }
        }

        if self.current.is_none() && !had_op && prev.hready && !prev.hresp.is_error() {
            if let Some(mut op) = self.ops.pop_front() {
                trace!(
                    driver = %self.name,
                    addr = format_args!("{:#010x}", op.cursor.addr()),
                    burst = %op.kind,
                    write = op.write,
                    "operation asserted"
                );
                op.presented = true;
                self.current = Some(op);
            }
        }

        match self.current.as_ref() {
            Some(op) => MasterRequest {
                htrans: if op.presented {
                    if op.cursor.accepted() == 0 {
                        TransType::NonSeq
                    } else {
                        TransType::Seq
                    }
                } else {
                    TransType::Idle
                },
                haddr: op.cursor.addr(),
                hwrite: op.write,
                hsize: op.size,
                hburst: op.kind,
                hwdata: op.hwdata,
                incr_len: op.cursor.total(),
            },
            None => MasterRequest::idle(),
        }
    }

    /// Drains the beat values collected from completed reads.
    pub fn take_read_data(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.reads)
    }

    /// Returns whether every queued operation has fully drained.
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.ops.is_empty()
    }

    fn sequence(
        addr: u32,
        size: BeatSize,
        kind: BurstKind,
        beats: u32,
        width_bits: u32,
    ) -> Result<BurstCursor, TransferError> {
        let cursor = BurstCursor::first(addr, size, kind, beats, width_bits)?;
        if cursor.total() != beats {
            return Err(TransferError::BeatCountMismatch {
                kind,
                expected: cursor.total(),
                got: beats,
            });
        }
        Ok(cursor)
    }
}
