//! Fabric statistics.
//!
//! Counters the scheduler bumps as it runs, cheap enough to leave on. It
//! provides:
//! 1. **Per-Master Counters:** Beats completed, wait cycles, error-response
//!    sequences, and rejected assertions.
//! 2. **Per-Slave Counters:** Cycles spent granted and cycles with more than
//!    one requester.
//! 3. **A Text Report:** An aligned table for bench output; statistics
//!    survive a fabric reset so a whole run can be summarized.

use std::fmt;

use crate::common::ids::{MasterId, SlaveId};

/// Counters for one master port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MasterStats {
    /// Beats whose address phase was accepted.
    pub beats: u64,
    /// Active cycles spent with ready low (denied, stalled, or draining).
    pub wait_cycles: u64,
    /// Error-response sequences entered after a decode failure.
    pub error_sequences: u64,
    /// Assertions refused by transfer validation.
    pub rejected: u64,
}

/// Counters for one slave port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlaveStats {
    /// Cycles the port was granted to some master.
    pub busy_cycles: u64,
    /// Cycles more than one master requested the port.
    pub contended_cycles: u64,
}

/// All counters of one fabric, indexed by the dense port ids.
#[derive(Clone, Debug)]
pub struct FabricStats {
    ticks: u64,
    master_names: Vec<String>,
    slave_names: Vec<String>,
    masters: Vec<MasterStats>,
    slaves: Vec<SlaveStats>,
}

impl FabricStats {
    /// Creates zeroed counters for the named ports.
    pub(crate) fn new(masters: &[String], slaves: &[String]) -> Self {
        Self {
            ticks: 0,
            master_names: masters.to_vec(),
            slave_names: slaves.to_vec(),
            masters: vec![MasterStats::default(); masters.len()],
            slaves: vec![SlaveStats::default(); slaves.len()],
        }
    }

    pub(crate) fn on_tick(&mut self) {
        self.ticks += 1;
    }

    pub(crate) fn on_beat(&mut self, master: MasterId) {
        if let Some(m) = self.masters.get_mut(master.index()) {
            m.beats += 1;
        }
    }

    pub(crate) fn on_wait(&mut self, master: MasterId) {
        if let Some(m) = self.masters.get_mut(master.index()) {
            m.wait_cycles += 1;
        }
    }

    pub(crate) fn on_error_sequence(&mut self, master: MasterId) {
        if let Some(m) = self.masters.get_mut(master.index()) {
            m.error_sequences += 1;
        }
    }

    pub(crate) fn on_rejected(&mut self, master: MasterId) {
        if let Some(m) = self.masters.get_mut(master.index()) {
            m.rejected += 1;
        }
    }

    pub(crate) fn on_slave_busy(&mut self, slave: SlaveId) {
        if let Some(s) = self.slaves.get_mut(slave.index()) {
            s.busy_cycles += 1;
        }
    }

    pub(crate) fn on_contended(&mut self, slave: SlaveId) {
        if let Some(s) = self.slaves.get_mut(slave.index()) {
            s.contended_cycles += 1;
        }
    }

    /// Returns the number of ticks recorded.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the per-master counters, indexed by master id.
    pub fn masters(&self) -> &[MasterStats] {
        &self.masters
    }

    /// Returns the per-slave counters, indexed by slave id.
    pub fn slaves(&self) -> &[SlaveStats] {
        &self.slaves
    }

    /// Renders the counters as an aligned text block.
    pub fn report(&self) -> String {
        self.to_string()
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for FabricStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .master_names
            .iter()
            .chain(self.slave_names.iter())
            .map(String::len)
            .chain(["master".len()])
            .max()
            .unwrap_or(0)
            + 2;

        writeln!(f, "fabric statistics ({} ticks)", self.ticks)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<name_width$}{:>8}{:>8}{:>8}{:>10}",
            "master", "beats", "waits", "errors", "rejected"
        )?;
        for (name, m) in self.master_names.iter().zip(self.masters.iter()) {
            writeln!(
                f,
                "{:<name_width$}{:>8}{:>8}{:>8}{:>10}",
                name, m.beats, m.wait_cycles, m.error_sequences, m.rejected
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:<name_width$}{:>8}{:>11}",
            "slave", "busy", "contended"
        )?;
        for (name, s) in self.slave_names.iter().zip(self.slaves.iter()) {
            writeln!(
                f,
                "{:<name_width$}{:>8}{:>11}",
                name, s.busy_cycles, s.contended_cycles
            )?;
        }
        Ok(())
    }
}
