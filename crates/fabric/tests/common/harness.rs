//! Standard two-master bench used across the scenario tests.
//!
//! The bench wires the topology most tests want: masters `ext` and `dsp`,
//! a 64 KiB RAM at `0xF000_0000`, a 64 KiB peripheral window behind it and
//! an auto-placed 32 KiB `misc` region that only `dsp` can reach.

use ahbsim_core::{
    AhbMaster, AhbMemory, Fabric, FabricConfig, MasterId, MasterReply, MasterRequest, MasterState,
    TickOutput,
};

/// Forwards `RUST_LOG` to the fabric's tracing output when a test fails.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds the standard bench configuration without constructing the fabric.
///
/// Layout:
/// - `ram`    64 KiB at `0xF000_0000`, linked to both masters
/// - `periph` 64 KiB at `0xF001_0000`, linked to both masters
/// - `misc`   32 KiB auto-placed (lands at `0x0000_0000`), `dsp` only
pub fn example_config() -> FabricConfig {
    let mut config = FabricConfig::new();
    let ext = config.add_master("ext").unwrap();
    let dsp = config.add_master("dsp").unwrap();
    let ram = config.add_slave("ram").unwrap();
    let periph = config.add_slave("periph").unwrap();
    let misc = config.add_slave("misc").unwrap();
    config.add_range(ram, Some(0xF000_0000), 0x1_0000).unwrap();
    config
        .add_range(periph, Some(0xF001_0000), 0x1_0000)
        .unwrap();
    config.add_range(misc, None, 0x8000).unwrap();
    config.connect(ext, ram).unwrap();
    config.connect(ext, periph).unwrap();
    config.connect(dsp, ram).unwrap();
    config.connect(dsp, periph).unwrap();
    config.connect(dsp, misc).unwrap();
    config
}

/// A fabric plus one driver per master port and the replies they saw last.
pub struct TestBench {
    pub fabric: Fabric,
    pub drivers: Vec<AhbMaster>,
    replies: Vec<MasterReply>,
}

impl TestBench {
    /// Builds the standard bench with zero-wait-state memories.
    pub fn new() -> Self {
        Self::with_ready_delay(0)
    }

    /// Builds the standard bench with `ram` and `periph` inserting
    /// `ready_delay` wait states into every data phase.
    pub fn with_ready_delay(ready_delay: u32) -> Self {
        init_tracing();
        let mut fabric = Fabric::new(example_config()).unwrap();
        for name in ["ram", "periph"] {
            let slave = fabric.slave_id(name).unwrap();
            let memory = AhbMemory::new(name, 0x1_0000, 32, ready_delay).unwrap();
            fabric.attach(slave, Box::new(memory)).unwrap();
        }
        let drivers = vec![AhbMaster::new("ext", 32), AhbMaster::new("dsp", 32)];
        let replies = vec![MasterReply::default(); drivers.len()];
        Self {
            fabric,
            drivers,
            replies,
        }
    }

    /// The driver sitting on the named master port.
    pub fn driver(&mut self, name: &str) -> &mut AhbMaster {
        let index = self
            .drivers
            .iter()
            .position(|d| d.name() == name)
            .unwrap_or_else(|| panic!("no driver named '{name}'"));
        &mut self.drivers[index]
    }

    /// The reply the named master port saw on the previous tick.
    pub fn reply(&self, name: &str) -> MasterReply {
        let index = self
            .drivers
            .iter()
            .position(|d| d.name() == name)
            .unwrap_or_else(|| panic!("no driver named '{name}'"));
        self.replies[index]
    }

    /// Drives every master once and advances the fabric one tick.
    pub fn tick(&mut self) -> TickOutput {
        let requests: Vec<MasterRequest> = self
            .drivers
            .iter_mut()
            .zip(&self.replies)
            .map(|(driver, reply)| driver.drive(reply))
            .collect();
        let out = self.fabric.tick(&requests);
        self.replies.copy_from_slice(&out.masters);
        out
    }

    /// Ticks until every driver has drained and every engine is idle.
    ///
    /// Returns the number of ticks spent. Panics when the bench fails to
    /// quiesce within `max_ticks`.
    pub fn run(&mut self, max_ticks: u64) -> u64 {
        for n in 1..=max_ticks {
            let _ = self.tick();
            if self.quiescent() {
                return n;
            }
        }
        panic!("bench still active after {max_ticks} ticks");
    }

    /// Whether every driver has drained and every engine sits in `Idle`.
    pub fn quiescent(&self) -> bool {
        self.drivers.iter().all(AhbMaster::is_idle)
            && (0..self.fabric.master_count())
                .all(|i| self.fabric.state_of(MasterId(i)) == Some(MasterState::Idle))
    }

    /// Reads raw bytes back out of an attached memory model.
    pub fn memory_bytes(&mut self, slave: &str, offset: usize, len: usize) -> Vec<u8> {
        let id = self.fabric.slave_id(slave).unwrap();
        let model = self.fabric.model_mut(id).unwrap();
        let memory = model
            .as_any_mut()
            .and_then(|any| any.downcast_mut::<AhbMemory>())
            .unwrap_or_else(|| panic!("slave '{slave}' is not an AhbMemory"));
        memory.data()[offset..offset + len].to_vec()
    }

    /// Overwrites bytes inside an attached memory model.
    pub fn preload(&mut self, slave: &str, offset: u32, bytes: &[u8]) {
        let id = self.fabric.slave_id(slave).unwrap();
        let model = self.fabric.model_mut(id).unwrap();
        let memory = model
            .as_any_mut()
            .and_then(|any| any.downcast_mut::<AhbMemory>())
            .unwrap_or_else(|| panic!("slave '{slave}' is not an AhbMemory"));
        memory.set_data(offset, bytes);
    }
}

impl Default for TestBench {
    fn default() -> Self {
        Self::new()
    }
}
