//! Per-cycle address routing.
//!
//! Every tick each master's current beat address is resolved against the
//! address table and the connectivity relation. It provides:
//! 1. **Pure Resolution:** [`route`] holds no state; the same inputs always
//!    produce the same route.
//! 2. **Reachability:** The sparse master-to-slave relation declared at
//!    configuration time; undeclared pairs never route.
//! 3. **Decode Errors:** Unmapped addresses and mapped-but-unreachable slaves
//!    both decode to an error, which the master engine turns into the wire
//!    error response.

use crate::common::ids::{MasterId, SlaveId};

use super::addrmap::AddressTable;

/// Outcome of routing one master port for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// The port has no address phase this cycle.
    None,
    /// The beat address decodes to a reachable slave.
    Hit {
        /// Slave that owns the decoded range.
        slave: SlaveId,
        /// Beat address being routed.
        addr: u32,
    },
    /// The beat address decodes to no reachable slave.
    DecodeError {
        /// Beat address that failed to decode.
        addr: u32,
    },
}

/// Master-to-slave connectivity relation.
///
/// A dense boolean matrix indexed by the dense id spaces. Pairs default to
/// unconnected; only declared links route.
#[derive(Clone, Debug)]
pub struct Reachability {
    links: Vec<Vec<bool>>,
}

impl Reachability {
    /// Creates an empty relation for the given port counts.
    pub fn new(masters: usize, slaves: usize) -> Self {
        Self {
            links: vec![vec![false; slaves]; masters],
        }
    }

    /// Declares that a master may address a slave.
    pub fn connect(&mut self, master: MasterId, slave: SlaveId) {
        if let Some(cell) = self
            .links
            .get_mut(master.index())
            .and_then(|row| row.get_mut(slave.index()))
        {
            *cell = true;
        }
    }

    /// Returns whether a master may address a slave.
    #[inline]
    pub fn permits(&self, master: MasterId, slave: SlaveId) -> bool {
        self.links
            .get(master.index())
            .and_then(|row| row.get(slave.index()))
            .copied()
            .unwrap_or(false)
    }

    /// Returns the number of master ports in the relation.
    pub fn masters(&self) -> usize {
        self.links.len()
    }

    /// Returns the number of slave ports in the relation.
    pub fn slaves(&self) -> usize {
        self.links.first().map_or(0, Vec::len)
    }
}

/// Resolves one beat address for one master.
///
/// A hit requires both a table match and a declared link; anything else is a
/// decode error for that master.
pub fn route(table: &AddressTable, reach: &Reachability, master: MasterId, addr: u32) -> Route {
    match table.lookup(addr) {
        Some(slave) if reach.permits(master, slave) => Route::Hit { slave, addr },
        _ => Route::DecodeError { addr },
    }
}
