//! Fabric scheduler.
//!
//! [`Fabric`] owns every port-level component and advances the whole
//! interconnect one tick at a time. It provides:
//! 1. **A Fixed Phase Order:** Route all masters, arbitrate every slave, tick
//!    the slave models, then advance the master engines. Arbitration always
//!    sees the current tick's requests, and no component reads a value
//!    written later in the same tick.
//! 2. **Lockstep Evaluation:** Single-threaded discrete time; a denied master
//!    retries next tick instead of blocking anything.
//! 3. **Total Reset:** One call returns every port to idle and clears all
//!    grant state, leaving attached storage contents in place.

use tracing::debug;

use crate::common::data::{HResp, TransType};
use crate::common::error::ConfigError;
use crate::common::ids::{MasterId, SlaveId};
use crate::config::FabricConfig;
use crate::report::OverviewReport;
use crate::stats::FabricStats;

use super::addrmap::AddressTable;
use super::arbiter::SlaveArbiter;
use super::master::{AdvanceCtx, MasterEngine, MasterState};
use super::router::{self, Reachability, Route};
use super::signals::{MasterReply, MasterRequest, SlaveRequest};
use super::slave::{NullSlave, SlaveModel};

/// Everything the fabric drove out of its ports during one tick.
#[derive(Clone, Debug)]
pub struct TickOutput {
    /// Per-master port replies, indexed by master id.
    pub masters: Vec<MasterReply>,
    /// Master granted each slave this tick, indexed by slave id.
    pub selected: Vec<Option<MasterId>>,
}

/// The multilayer interconnect.
///
/// Built once from a [`FabricConfig`]; the address map and connectivity are
/// immutable afterwards. Slave models attach by id before the bench starts
/// ticking; unattached ports fall back to a null model that completes every
/// data phase immediately.
#[derive(Debug)]
pub struct Fabric {
    width_bits: u32,
    master_names: Vec<String>,
    slave_names: Vec<String>,
    table: AddressTable,
    reach: Reachability,
    engines: Vec<MasterEngine>,
    arbiters: Vec<SlaveArbiter>,
    models: Vec<Box<dyn SlaveModel>>,
    last_ready: Vec<bool>,
    stats: FabricStats,
}

impl Fabric {
    /// Validates the configuration and builds the fabric.
    ///
    /// The configuration is consumed and locked; automatic range bases
    /// resolve here, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found; no partial fabric is built.
    pub fn new(mut config: FabricConfig) -> Result<Self, ConfigError> {
        config.lock();
        let resolved = config.finalize()?;
        let table = AddressTable::build(&resolved.entries, &resolved.slaves)?;

        let mut reach = Reachability::new(resolved.masters.len(), resolved.slaves.len());
        for &(master, slave) in &resolved.links {
            reach.connect(master, slave);
        }

        let engines = (0..resolved.masters.len())
            .map(|i| MasterEngine::new(MasterId(i), resolved.width_bits))
            .collect();
        let arbiters = vec![SlaveArbiter::new(resolved.policy); resolved.slaves.len()];
        let models = (0..resolved.slaves.len())
            .map(|_| Box::new(NullSlave) as Box<dyn SlaveModel>)
            .collect();
        let stats = FabricStats::new(&resolved.masters, &resolved.slaves);
        let last_ready = vec![true; resolved.slaves.len()];

        debug!(
            masters = resolved.masters.len(),
            slaves = resolved.slaves.len(),
            ranges = table.ranges().len(),
            width_bits = resolved.width_bits,
            policy = ?resolved.policy,
            "fabric constructed"
        );

        Ok(Self {
            width_bits: resolved.width_bits,
            master_names: resolved.masters,
            slave_names: resolved.slaves,
            table,
            reach,
            engines,
            arbiters,
            models,
            last_ready,
            stats,
        })
    }

    /// Attaches a slave model to one port, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::UnknownSlave`] for a foreign id.
    pub fn attach(
        &mut self,
        slave: SlaveId,
        model: Box<dyn SlaveModel>,
    ) -> Result<(), ConfigError> {
        let Some(slot) = self.models.get_mut(slave.index()) else {
            return Err(ConfigError::UnknownSlave {
                name: slave.to_string(),
            });
        };
        debug!(%slave, model = model.name(), "slave model attached");
        *slot = model;
        Ok(())
    }

    /// Advances the fabric by one tick.
    ///
    /// `inputs` is indexed by master id; missing entries act as idle ports.
    /// Every slave model ticks exactly once, selected or not.
    pub fn tick(&mut self, inputs: &[MasterRequest]) -> TickOutput {
        let n_masters = self.engines.len();
        let n_slaves = self.arbiters.len();
        let input_of = |i: usize| inputs.get(i).copied().unwrap_or_default();

        // Route every master against its current beat.
        let plans: Vec<_> = self
            .engines
            .iter()
            .enumerate()
            .map(|(i, engine)| engine.plan(&input_of(i)))
            .collect();
        let routes: Vec<Route> = plans
            .iter()
            .enumerate()
            .map(|(i, plan)| match plan.addr {
                Some(addr) => router::route(&self.table, &self.reach, MasterId(i), addr),
                None => Route::None,
            })
            .collect();

        // Arbitrate each slave on this tick's requests.
        let mut requesters: Vec<Vec<MasterId>> = vec![Vec::new(); n_slaves];
        for (i, plan) in plans.iter().enumerate() {
            if !plan.requests {
                continue;
            }
            if let Route::Hit { slave, .. } = routes[i] {
                requesters[slave.index()].push(MasterId(i));
            }
        }
        let granted: Vec<Option<MasterId>> = self
            .arbiters
            .iter_mut()
            .enumerate()
            .map(|(s, arbiter)| {
                let fresh = arbiter.owner().is_none();
                let grant = arbiter.arbitrate(&requesters[s]);
                if fresh {
                    if let Some(master) = grant {
                        debug!(%master, slave = %SlaveId(s), "grant acquired");
                    }
                }
                grant
            })
            .collect();

        // Present each slave its mux'd port signals and tick the model.
        let mut slave_replies = Vec::with_capacity(n_slaves);
        for s in 0..n_slaves {
            let req = match granted[s] {
                Some(m) => {
                    let mi = m.index();
                    let presents = plans[mi].requests
                        && matches!(routes[mi], Route::Hit { slave, .. } if slave.index() == s);
                    match self.engines[mi].frame() {
                        Some(frame) => SlaveRequest {
                            hsel: presents,
                            haddr: frame.addr,
                            hwrite: frame.write,
                            htrans: if presents { frame.trans } else { TransType::Idle },
                            hburst: frame.kind,
                            hsize: frame.size,
                            hwdata: input_of(mi).hwdata,
                            hready: self.last_ready[s],
                        },
                        None => SlaveRequest {
                            hready: self.last_ready[s],
                            ..SlaveRequest::idle()
                        },
                    }
                }
                None => SlaveRequest {
                    hready: self.last_ready[s],
                    ..SlaveRequest::idle()
                },
            };
            let reply = self.models[s].tick(&req);
            self.last_ready[s] = reply.hreadyout;
            slave_replies.push(reply);
        }

        // Advance every master engine against this tick's grant and ready.
        let mut master_replies = Vec::with_capacity(n_masters);
        for i in 0..n_masters {
            let me = MasterId(i);
            let bound = plans[i].bound.or(match routes[i] {
                Route::Hit { slave, .. } => Some(slave),
                _ => None,
            });
            let (slave_ready, rdata, resp) = match bound {
                Some(s) => {
                    let reply = slave_replies[s.index()];
                    (reply.hreadyout, reply.hrdata, reply.hresp)
                }
                None => (true, 0, HResp::Okay),
            };
            let is_granted = plans[i].requests
                && matches!(routes[i], Route::Hit { slave, .. }
                    if granted[slave.index()] == Some(me));

            let ctx = AdvanceCtx {
                route: routes[i],
                granted: is_granted,
                slave_ready,
                rdata,
                resp,
            };
            let (reply, fx) = self.engines[i].advance(&input_of(i), &ctx);

            if let Some((slave, keep)) = fx.keep {
                self.arbiters[slave.index()].set_keep(keep);
            }
            if let Some(slave) = fx.released {
                let arbiter = &mut self.arbiters[slave.index()];
                if arbiter.owner() == Some(me) {
                    debug!(master = %me, %slave, "grant released");
                    arbiter.release();
                }
            }

            if fx.beat_accepted {
                self.stats.on_beat(me);
            }
            if fx.entered_error {
                self.stats.on_error_sequence(me);
            }
            if reply.rejected.is_some() {
                self.stats.on_rejected(me);
            }
            if !reply.hready
                && matches!(
                    reply.state,
                    MasterState::Transfer | MasterState::TransferWait | MasterState::TransferFinish
                )
            {
                self.stats.on_wait(me);
            }
            master_replies.push(reply);
        }

        for s in 0..n_slaves {
            if granted[s].is_some() {
                self.stats.on_slave_busy(SlaveId(s));
            }
            if requesters[s].len() > 1 {
                self.stats.on_contended(SlaveId(s));
            }
        }
        self.stats.on_tick();

        TickOutput {
            masters: master_replies,
            selected: granted,
        }
    }

    /// Returns every port to idle and clears all grant state.
    ///
    /// Slave models keep their backing storage; only transient latches and
    /// wait counters clear. Statistics survive a reset.
    pub fn reset(&mut self) {
        for engine in &mut self.engines {
            engine.reset();
        }
        for arbiter in &mut self.arbiters {
            arbiter.reset();
        }
        for model in &mut self.models {
            model.reset();
        }
        for ready in &mut self.last_ready {
            *ready = true;
        }
        debug!("fabric reset");
    }

    /// Returns the data path width in bits.
    pub fn data_width(&self) -> u32 {
        self.width_bits
    }

    /// Returns the number of master ports.
    pub fn master_count(&self) -> usize {
        self.engines.len()
    }

    /// Returns the number of slave ports.
    pub fn slave_count(&self) -> usize {
        self.arbiters.len()
    }

    /// Resolves a master name to its id.
    pub fn master_id(&self, name: &str) -> Option<MasterId> {
        self.master_names
            .iter()
            .position(|m| m.as_str() == name)
            .map(MasterId)
    }

    /// Resolves a slave name to its id.
    pub fn slave_id(&self, name: &str) -> Option<SlaveId> {
        self.slave_names
            .iter()
            .position(|s| s.as_str() == name)
            .map(SlaveId)
    }

    /// Returns a master's name.
    pub fn master_name(&self, master: MasterId) -> Option<&str> {
        self.master_names.get(master.index()).map(String::as_str)
    }

    /// Returns a slave's name.
    pub fn slave_name(&self, slave: SlaveId) -> Option<&str> {
        self.slave_names.get(slave.index()).map(String::as_str)
    }

    /// Returns the engine state a master port showed last tick.
    pub fn state_of(&self, master: MasterId) -> Option<MasterState> {
        self.engines.get(master.index()).map(MasterEngine::state)
    }

    /// Returns the master currently owning a slave's grant.
    pub fn owner_of(&self, slave: SlaveId) -> Option<MasterId> {
        self.arbiters
            .get(slave.index())
            .and_then(SlaveArbiter::owner)
    }

    /// Returns whether a slave's grant is held across remaining beats.
    pub fn is_kept(&self, slave: SlaveId) -> bool {
        self.arbiters
            .get(slave.index())
            .is_some_and(SlaveArbiter::is_kept)
    }

    /// Returns the model attached to a slave port.
    pub fn model_mut(&mut self, slave: SlaveId) -> Option<&mut dyn SlaveModel> {
        Some(self.models.get_mut(slave.index())?.as_mut())
    }

    /// Returns the address table the fabric decodes with.
    pub fn table(&self) -> &AddressTable {
        &self.table
    }

    /// Returns the accumulated statistics.
    pub fn stats(&self) -> &FabricStats {
        &self.stats
    }

    /// Renders the connectivity matrix and address map.
    pub fn overview(&self) -> OverviewReport<'_> {
        OverviewReport::new(
            &self.master_names,
            &self.slave_names,
            &self.table,
            &self.reach,
            self.width_bits,
        )
    }
}
