//! Slave model seam.
//!
//! The fabric drives attached models through a narrow trait so benches can
//! swap memories, peripherals, and test doubles freely. It provides:
//! 1. **The Contract:** One [`SlaveModel::tick`] call per fabric tick with
//!    the mux'd port signals; the model answers with its data-phase response.
//! 2. **Downcasting:** An optional escape hatch for tests that need to reach
//!    a concrete model behind the trait object.
//! 3. **A Null Model:** Unattached slave ports decode and arbitrate normally
//!    but complete every data phase immediately with zero data.

use std::any::Any;

use super::signals::{SlaveRequest, SlaveReply};

/// One attached slave-port model.
///
/// The fabric calls [`tick`](Self::tick) exactly once per fabric tick, in
/// slave index order, whether or not the port is selected. Models latch
/// address phases and stretch data phases entirely on their side of the
/// seam; the fabric only forwards signals and samples the reply.
pub trait SlaveModel {
    /// Returns the model's name, used in logs.
    fn name(&self) -> &str;

    /// Advances the model by one tick against the presented port signals.
    fn tick(&mut self, req: &SlaveRequest) -> SlaveReply;

    /// Clears transient state (pipeline latches, wait counters).
    ///
    /// Backing storage is expected to survive a reset.
    fn reset(&mut self) {}

    /// Exposes the concrete model to callers that know its type.
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}

impl std::fmt::Debug for dyn SlaveModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SlaveModel({})", self.name())
    }
}

/// Model backing slave ports nothing was attached to.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSlave;

impl SlaveModel for NullSlave {
    fn name(&self) -> &str {
        "null"
    }

    fn tick(&mut self, _req: &SlaveRequest) -> SlaveReply {
        SlaveReply::default()
    }
}
