//! Bus fabric components.
//!
//! This module organizes the pieces of the multilayer interconnect: the
//! address decoder, the burst sequencer, per-master transaction engines,
//! per-slave arbiters, the slave attachment seam, and the scheduler that
//! drives them all in lock-step.

/// Address map normalization, overlap checking, and decode lookup.
pub mod addrmap;

/// Per-slave grant state and arbitration policies.
pub mod arbiter;

/// Burst address sequencing and transfer validation.
pub mod burst;

/// Per-master transaction state machine.
pub mod master;

/// Per-cycle master-to-slave route resolution.
pub mod router;

/// The fabric scheduler and its tick loop.
pub mod scheduler;

/// Wire-level request and reply structs for both port directions.
pub mod signals;

/// The slave model trait and the default detached slave.
pub mod slave;

pub use addrmap::{AddressTable, MappedRange, RangeEntry};
pub use arbiter::ArbitrationPolicy;
pub use burst::BurstCursor;
pub use master::MasterState;
pub use scheduler::{Fabric, TickOutput};
pub use signals::{MasterReply, MasterRequest, SlaveReply, SlaveRequest};
pub use slave::{NullSlave, SlaveModel};
