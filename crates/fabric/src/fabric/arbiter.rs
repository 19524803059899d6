//! Per-slave arbitration.
//!
//! Every slave port arbitrates independently; there is no global bus owner.
//! It provides:
//! 1. **Grant Register:** The winning master is registered and keeps the
//!    grant until its transfer drains, so a burst is never interleaved.
//! 2. **Keep Bit:** A sticky flag raised while the granted transfer still has
//!    beats outstanding, visible to benches and the stats collector.
//! 3. **Policies:** A pure request-set to grant function, selectable per
//!    fabric; priority is fixed by master index by default.

use serde::{Deserialize, Serialize};

use crate::common::ids::MasterId;

/// Grant selection rule applied when a slave has no registered owner.
///
/// Policies are pure: the same request set and history always pick the same
/// winner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArbitrationPolicy {
    /// Lowest master index wins. Simple and deterministic; a low-index master
    /// issuing back-to-back bursts can starve higher indices.
    #[default]
    #[serde(alias = "fixed-priority", alias = "fixed_priority")]
    FixedPriority,
    /// Scan starts after the previously granted index, wrapping once.
    #[serde(alias = "round-robin", alias = "round_robin")]
    RoundRobin,
}

impl ArbitrationPolicy {
    /// Picks a winner from this cycle's requesters.
    ///
    /// `requesters` must be sorted by ascending master index; `last` is the
    /// most recently granted master, if any.
    fn select(self, requesters: &[MasterId], last: Option<MasterId>) -> Option<MasterId> {
        match self {
            Self::FixedPriority => requesters.first().copied(),
            Self::RoundRobin => {
                let threshold = last.map_or(0, |m| m.index() + 1);
                requesters
                    .iter()
                    .find(|m| m.index() >= threshold)
                    .or_else(|| requesters.first())
                    .copied()
            }
        }
    }
}

/// Arbitration state of one slave port.
#[derive(Clone, Debug)]
pub struct SlaveArbiter {
    policy: ArbitrationPolicy,
    owner: Option<MasterId>,
    keep: bool,
    last_granted: Option<MasterId>,
}

impl SlaveArbiter {
    /// Creates an idle arbiter with the given policy.
    pub fn new(policy: ArbitrationPolicy) -> Self {
        Self {
            policy,
            owner: None,
            keep: false,
            last_granted: None,
        }
    }

    /// Grants the slave to one of this cycle's requesters.
    ///
    /// A registered owner keeps the grant unconditionally until released,
    /// regardless of who else requests. Otherwise the policy selects among
    /// `requesters` (sorted by ascending index) and the winner is registered.
    pub fn arbitrate(&mut self, requesters: &[MasterId]) -> Option<MasterId> {
        if self.owner.is_some() {
            return self.owner;
        }
        let winner = self.policy.select(requesters, self.last_granted);
        if let Some(master) = winner {
            self.owner = Some(master);
            self.last_granted = Some(master);
        }
        winner
    }

    /// Raises or clears the sticky keep bit for the current owner.
    pub fn set_keep(&mut self, keep: bool) {
        self.keep = keep;
    }

    /// Drops the registered owner once its transfer has drained.
    pub fn release(&mut self) {
        self.owner = None;
        self.keep = false;
    }

    /// Returns the registered owner, if any.
    #[inline]
    pub fn owner(&self) -> Option<MasterId> {
        self.owner
    }

    /// Returns whether the owner still has beats outstanding.
    #[inline]
    pub fn is_kept(&self) -> bool {
        self.keep
    }

    /// Clears all grant state, including the rotation history.
    pub fn reset(&mut self) {
        self.owner = None;
        self.keep = false;
        self.last_granted = None;
    }
}
