//! Per-master transaction state machine.
//!
//! Each master port owns one engine that carries a transfer from assertion
//! through its final data phase. It provides:
//! 1. **Split-Phase Tracking:** Address phases are accepted one beat at a
//!    time; the trailing data phase drains before the port goes quiet.
//! 2. **Grant Coupling:** A denied beat parks the engine in a wait state and
//!    retries the same beat, so beats are never skipped or duplicated.
//! 3. **Error Sequencing:** Decode failures play the protocol's two-cycle
//!    error response and return the port to idle; validation failures reject
//!    the request without touching machine state.

use tracing::{trace, warn};

use crate::common::data::{BeatSize, BurstKind, HResp, TransType};
use crate::common::ids::{MasterId, SlaveId};

use super::burst::BurstCursor;
use super::router::Route;
use super::signals::{MasterReply, MasterRequest};

/// Engine state of one master port.
///
/// The wire encoding matches the classic layer FSM. The state reported in a
/// [`MasterReply`] is the one observed during the tick, before the
/// transition at its end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MasterState {
    /// No transfer in flight; the port accepts a new assertion.
    #[default]
    Idle,
    /// Presenting an address phase and holding or competing for the grant.
    Transfer,
    /// All address phases issued; the final data phase is draining.
    TransferFinish,
    /// Denied the grant last cycle; retrying the same beat.
    TransferWait,
    /// First error-response cycle.
    Error0,
    /// Second error-response cycle.
    Error1,
    /// Recovery cycle after the error response.
    Error2,
}

impl MasterState {
    /// Returns the FSM wire encoding.
    pub const fn encoding(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Transfer => 1,
            Self::TransferFinish => 2,
            Self::TransferWait => 3,
            Self::Error0 => 4,
            Self::Error1 => 5,
            Self::Error2 => 6,
        }
    }

    /// Returns whether the state is part of the error-response sequence.
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error0 | Self::Error1 | Self::Error2)
    }
}

impl std::fmt::Display for MasterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Transfer => "transfer",
            Self::TransferFinish => "transfer-finish",
            Self::TransferWait => "transfer-wait",
            Self::Error0 => "error0",
            Self::Error1 => "error1",
            Self::Error2 => "error2",
        };
        write!(f, "{name}")
    }
}

/// Validated in-flight burst.
#[derive(Clone, Copy, Debug)]
struct ActiveBurst {
    write: bool,
    size: BeatSize,
    kind: BurstKind,
    cursor: BurstCursor,
    slave: SlaveId,
}

/// Address-phase framing the scheduler presents to the granted slave.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BeatFrame {
    pub write: bool,
    pub size: BeatSize,
    pub kind: BurstKind,
    pub trans: TransType,
    pub addr: u32,
    pub slave: SlaveId,
}

/// What this port would do this tick, computed before arbitration.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Plan {
    /// Address phase the port presents, if any.
    pub addr: Option<u32>,
    /// True when the port competes for a grant (an in-flight beat).
    pub requests: bool,
    /// Slave bound to the in-flight burst, used to mux the data phase.
    pub bound: Option<SlaveId>,
}

/// Grant and ready signals resolved for one master this tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AdvanceCtx {
    /// Route of the presented address phase, `Route::None` without one.
    pub route: Route,
    /// True when this master won its routed slave this tick.
    pub granted: bool,
    /// Ready-out of the bound (or routed) slave this tick.
    pub slave_ready: bool,
    /// Read data from the bound slave this tick.
    pub rdata: u64,
    /// Response from the bound slave this tick.
    pub resp: HResp,
}

/// Side effects of one engine tick the scheduler applies to shared state.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Effects {
    /// An address phase was accepted and the cursor advanced.
    pub beat_accepted: bool,
    /// New keep-bit value for the bound slave's arbiter.
    pub keep: Option<(SlaveId, bool)>,
    /// The bound slave's grant should be dropped, if this master owns it.
    pub released: Option<SlaveId>,
    /// The engine entered the error-response sequence.
    pub entered_error: bool,
}

/// Transaction state machine of one master port.
#[derive(Clone, Debug)]
pub struct MasterEngine {
    id: MasterId,
    width_bits: u32,
    state: MasterState,
    burst: Option<ActiveBurst>,
}

impl MasterEngine {
    /// Creates an idle engine for one port.
    pub(crate) fn new(id: MasterId, width_bits: u32) -> Self {
        Self {
            id,
            width_bits,
            state: MasterState::Idle,
            burst: None,
        }
    }

    /// Returns the state observed during the last tick boundary.
    pub const fn state(&self) -> MasterState {
        self.state
    }

    /// Computes this tick's port intent from the sampled input.
    ///
    /// Pure with respect to engine state; the scheduler routes and arbitrates
    /// on the result before [`Self::advance`] commits anything.
    pub(crate) fn plan(&self, input: &MasterRequest) -> Plan {
        match self.state {
            MasterState::Idle => {
                if input.htrans == TransType::NonSeq {
                    let first = BurstCursor::first(
                        input.haddr,
                        input.hsize,
                        input.hburst,
                        input.incr_len,
                        self.width_bits,
                    );
                    if let Ok(cursor) = first {
                        return Plan {
                            addr: Some(cursor.addr()),
                            requests: false,
                            bound: None,
                        };
                    }
                }
                Plan::default()
            }
            MasterState::Transfer | MasterState::TransferWait => {
                let Some(burst) = self.burst.as_ref() else {
                    return Plan::default();
                };
                let continues = matches!(input.htrans, TransType::NonSeq | TransType::Seq);
                if continues && burst.cursor.remaining() > 0 {
                    Plan {
                        addr: Some(burst.cursor.addr()),
                        requests: true,
                        bound: Some(burst.slave),
                    }
                } else {
                    Plan {
                        addr: None,
                        requests: false,
                        bound: Some(burst.slave),
                    }
                }
            }
            MasterState::TransferFinish => Plan {
                addr: None,
                requests: false,
                bound: self.burst.as_ref().map(|b| b.slave),
            },
            MasterState::Error0 | MasterState::Error1 | MasterState::Error2 => Plan::default(),
        }
    }

    /// Returns the address-phase framing for the granted slave, if a burst
    /// is in flight.
    pub(crate) fn frame(&self) -> Option<BeatFrame> {
        self.burst.as_ref().map(|b| BeatFrame {
            write: b.write,
            size: b.size,
            kind: b.kind,
            trans: if b.cursor.accepted() == 0 {
                TransType::NonSeq
            } else {
                TransType::Seq
            },
            addr: b.cursor.addr(),
            slave: b.slave,
        })
    }

    /// Advances the machine by one tick and produces the port reply.
    pub(crate) fn advance(
        &mut self,
        input: &MasterRequest,
        ctx: &AdvanceCtx,
    ) -> (MasterReply, Effects) {
        let mut reply = MasterReply {
            hrdata: ctx.rdata,
            hready: true,
            hresp: ctx.resp,
            rejected: None,
            state: self.state,
        };
        let mut fx = Effects::default();

        match self.state {
            MasterState::Idle => self.tick_idle(input, ctx, &mut reply, &mut fx),
            MasterState::Transfer | MasterState::TransferWait => {
                self.tick_transfer(input, ctx, &mut reply, &mut fx);
            }
            MasterState::TransferFinish => self.tick_finish(ctx, &mut reply, &mut fx),
            MasterState::Error0 => {
                reply.hready = false;
                reply.hresp = HResp::Error;
                self.state = MasterState::Error1;
            }
            MasterState::Error1 => {
                reply.hready = true;
                reply.hresp = HResp::Error;
                self.state = MasterState::Error2;
            }
            MasterState::Error2 => {
                reply.hresp = HResp::Okay;
                reply.hready = input.htrans != TransType::NonSeq;
                self.state = MasterState::Idle;
            }
        }

        (reply, fx)
    }

    /// Forces the engine back to idle, dropping any in-flight burst.
    pub(crate) fn reset(&mut self) {
        self.state = MasterState::Idle;
        self.burst = None;
    }

    fn tick_idle(
        &mut self,
        input: &MasterRequest,
        ctx: &AdvanceCtx,
        reply: &mut MasterReply,
        fx: &mut Effects,
    ) {
        reply.hresp = HResp::Okay;
        match input.htrans {
            TransType::NonSeq => {
                let first = BurstCursor::first(
                    input.haddr,
                    input.hsize,
                    input.hburst,
                    input.incr_len,
                    self.width_bits,
                );
                let cursor = match first {
                    Ok(cursor) => cursor,
                    Err(err) => {
                        warn!(master = %self.id, %err, "transfer rejected");
                        reply.rejected = Some(err);
                        return;
                    }
                };
                match ctx.route {
                    Route::Hit { slave, .. } => {
                        trace!(
                            master = %self.id,
                            %slave,
                            addr = format_args!("{:#010x}", cursor.addr()),
                            burst = %input.hburst,
                            "transfer asserted"
                        );
                        self.burst = Some(ActiveBurst {
                            write: input.hwrite,
                            size: input.hsize,
                            kind: input.hburst,
                            cursor,
                            slave,
                        });
                        self.state = MasterState::Transfer;
                        reply.hready = false;
                    }
                    Route::DecodeError { .. } | Route::None => {
                        warn!(
                            master = %self.id,
                            addr = format_args!("{:#010x}", cursor.addr()),
                            "decode error on assertion"
                        );
                        self.state = MasterState::Error0;
                        fx.entered_error = true;
                        reply.hready = false;
                    }
                }
            }
            TransType::Busy | TransType::Seq => {
                warn!(master = %self.id, htrans = %input.htrans, "ignored while idle");
            }
            TransType::Idle => {}
        }
    }

    fn tick_transfer(
        &mut self,
        input: &MasterRequest,
        ctx: &AdvanceCtx,
        reply: &mut MasterReply,
        fx: &mut Effects,
    ) {
        let Some(burst) = self.burst.as_mut() else {
            debug_assert!(false, "transfer state without a burst");
            self.state = MasterState::Idle;
            return;
        };

        match input.htrans {
            TransType::Idle => {
                // Master walked away; drain whatever data phase is open.
                burst.cursor.truncate();
                if burst.cursor.accepted() == 0 {
                    fx.released = Some(burst.slave);
                    self.burst = None;
                    self.state = MasterState::Idle;
                } else if ctx.slave_ready {
                    fx.released = Some(burst.slave);
                    self.burst = None;
                    self.state = MasterState::Idle;
                } else {
                    fx.keep = Some((burst.slave, false));
                    self.state = MasterState::TransferFinish;
                    reply.hready = false;
                }
            }
            TransType::Busy => {
                warn!(master = %self.id, "busy cycle on a multilayer port");
                reply.hready = burst.cursor.accepted() == 0 || ctx.slave_ready;
            }
            TransType::NonSeq | TransType::Seq => {
                let on_course = matches!(ctx.route, Route::Hit { slave, .. } if slave == burst.slave);
                if on_course {
                    if ctx.granted && ctx.slave_ready {
                        let was_last = burst.cursor.remaining() == 1;
                        burst.cursor.advance();
                        fx.beat_accepted = true;
                        fx.keep = Some((burst.slave, !was_last));
                        reply.hready = true;
                        trace!(
                            master = %self.id,
                            slave = %burst.slave,
                            beat = burst.cursor.accepted(),
                            of = burst.cursor.total(),
                            "beat accepted"
                        );
                        self.state = if was_last {
                            MasterState::TransferFinish
                        } else {
                            MasterState::Transfer
                        };
                    } else if ctx.granted {
                        fx.keep = Some((burst.slave, true));
                        reply.hready = false;
                        self.state = MasterState::Transfer;
                    } else {
                        reply.hready = false;
                        self.state = MasterState::TransferWait;
                    }
                } else if burst.cursor.accepted() > 0 && !ctx.slave_ready {
                    // Open data phase must land before the error response.
                    reply.hready = false;
                } else {
                    warn!(
                        master = %self.id,
                        addr = format_args!("{:#010x}", burst.cursor.addr()),
                        "decode error mid-burst"
                    );
                    fx.released = Some(burst.slave);
                    fx.entered_error = true;
                    self.burst = None;
                    self.state = MasterState::Error0;
                    reply.hready = false;
                }
            }
        }
    }

    fn tick_finish(&mut self, ctx: &AdvanceCtx, reply: &mut MasterReply, fx: &mut Effects) {
        let Some(burst) = self.burst.as_ref() else {
            debug_assert!(false, "finish state without a burst");
            self.state = MasterState::Idle;
            return;
        };
        if ctx.slave_ready {
            trace!(master = %self.id, slave = %burst.slave, "transfer drained");
            fx.released = Some(burst.slave);
            self.burst = None;
            self.state = MasterState::Idle;
        } else {
            reply.hready = false;
        }
    }
}
