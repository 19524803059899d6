//! Port-level signal bundles.
//!
//! Masters and slaves talk to the fabric through plain structs that mirror
//! the wire protocol one side presents during one cycle. It provides:
//! 1. **Master Ports:** [`MasterRequest`] sampled by the fabric each tick and
//!    [`MasterReply`] returned to the master at the end of the tick.
//! 2. **Slave Ports:** [`SlaveRequest`] presented to a selected slave and
//!    [`SlaveReply`] carrying its data-phase response.
//! 3. **Idle Defaults:** Every bundle defaults to the quiescent wire state,
//!    so unconnected ports behave like an idle bus.

use crate::common::data::{BeatSize, BurstKind, HResp, TransType};
use crate::common::error::TransferError;

use super::master::MasterState;

/// Address-phase command a master presents for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MasterRequest {
    /// Transfer type; only `NonSeq` opens a new burst at the port.
    pub htrans: TransType,
    /// Address of the first beat of the requested burst.
    pub haddr: u32,
    /// Direction flag; `true` drives write data, `false` samples read data.
    pub hwrite: bool,
    /// Width of every beat in the burst.
    pub hsize: BeatSize,
    /// Burst kind of the requested transfer.
    pub hburst: BurstKind,
    /// Write data for the first beat, already lane-aligned by the caller.
    pub hwdata: u64,
    /// Beat count for open-ended `Incr` bursts; ignored for fixed kinds.
    pub incr_len: u32,
}

impl MasterRequest {
    /// Returns the quiescent request an unconnected port drives.
    pub fn idle() -> Self {
        Self {
            htrans: TransType::Idle,
            haddr: 0,
            hwrite: false,
            hsize: BeatSize::Byte,
            hburst: BurstKind::Single,
            hwdata: 0,
            incr_len: 1,
        }
    }
}

impl Default for MasterRequest {
    fn default() -> Self {
        Self::idle()
    }
}

/// Per-tick response the fabric returns on a master port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MasterReply {
    /// Read data for the beat whose data phase completed this tick.
    pub hrdata: u64,
    /// Transfer-done flag; low stretches the current phase into the next tick.
    pub hready: bool,
    /// Response code paired with `hready`.
    pub hresp: HResp,
    /// Validation failure for a request refused at assertion, if any.
    pub rejected: Option<TransferError>,
    /// Port engine state observed during this tick.
    pub state: MasterState,
}

impl Default for MasterReply {
    fn default() -> Self {
        Self {
            hrdata: 0,
            hready: true,
            hresp: HResp::Okay,
            rejected: None,
            state: MasterState::Idle,
        }
    }
}

/// Address- and data-phase signals presented to one slave for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlaveRequest {
    /// Select flag; high means the address phase below targets this slave.
    pub hsel: bool,
    /// Beat address as decoded on the bus; slaves alias it onto their own
    /// storage.
    pub haddr: u32,
    /// Direction flag for the addressed beat.
    pub hwrite: bool,
    /// Transfer type of the address phase.
    pub htrans: TransType,
    /// Burst kind of the owning transfer.
    pub hburst: BurstKind,
    /// Width of the addressed beat.
    pub hsize: BeatSize,
    /// Write data for the beat whose data phase runs this cycle.
    pub hwdata: u64,
    /// Combined ready the slave samples; low extends the open data phase.
    pub hready: bool,
}

impl SlaveRequest {
    /// Returns the quiescent request an unselected slave samples.
    pub fn idle() -> Self {
        Self {
            hsel: false,
            haddr: 0,
            hwrite: false,
            htrans: TransType::Idle,
            hburst: BurstKind::Single,
            hsize: BeatSize::Byte,
            hwdata: 0,
            hready: true,
        }
    }
}

impl Default for SlaveRequest {
    fn default() -> Self {
        Self::idle()
    }
}

/// Data-phase response one slave drives for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlaveReply {
    /// Read data, lane-aligned to the beat address.
    pub hrdata: u64,
    /// Ready-out; low inserts a wait state into the open data phase.
    pub hreadyout: bool,
    /// Response code for the completing data phase.
    pub hresp: HResp,
}

impl Default for SlaveReply {
    fn default() -> Self {
        Self {
            hrdata: 0,
            hreadyout: true,
            hresp: HResp::Okay,
        }
    }
}
