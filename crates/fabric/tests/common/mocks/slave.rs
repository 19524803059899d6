//! Slave-model doubles.
//!
//! `MockSlave` is the mockall double for expectation-style tests; the
//! hand-rolled [`ScriptedSlave`] answers `hreadyout` from a canned script
//! and logs every request it is shown, which suits tests that want to
//! replay a wait-state timeline and inspect the port signals afterwards.

use std::any::Any;
use std::collections::VecDeque;

use mockall::mock;

use ahbsim_core::{SlaveModel, SlaveReply, SlaveRequest};

mock! {
    pub Slave {}

    impl SlaveModel for Slave {
        fn name(&self) -> &'static str;
        fn tick(&mut self, req: &SlaveRequest) -> SlaveReply;
    }
}

/// Slave whose ready line follows a fixed per-tick script.
///
/// Each tick consumes one script entry; once the script runs dry the model
/// stays ready forever. Requests are logged in arrival order, selected or
/// not, so tests can assert exactly what the port drove each tick.
pub struct ScriptedSlave {
    ready: VecDeque<bool>,
    /// Every request seen, one entry per tick.
    pub log: Vec<SlaveRequest>,
}

impl ScriptedSlave {
    pub fn new(ready: &[bool]) -> Self {
        Self {
            ready: ready.iter().copied().collect(),
            log: Vec::new(),
        }
    }

    /// Addresses of the address phases presented while selected.
    pub fn selected_addrs(&self) -> Vec<u32> {
        self.log
            .iter()
            .filter(|req| req.hsel)
            .map(|req| req.haddr)
            .collect()
    }
}

impl SlaveModel for ScriptedSlave {
    fn name(&self) -> &str {
        "scripted"
    }

    fn tick(&mut self, req: &SlaveRequest) -> SlaveReply {
        self.log.push(*req);
        SlaveReply {
            hreadyout: self.ready.pop_front().unwrap_or(true),
            ..SlaveReply::default()
        }
    }

    fn reset(&mut self) {
        self.ready.clear();
        self.log.clear();
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
