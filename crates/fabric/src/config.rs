//! Fabric configuration.
//!
//! A [`FabricConfig`] names the ports, declares the address map, and picks
//! the fabric-wide knobs before anything runs. It provides:
//! 1. **A Builder Surface:** Incremental `add_*`/`connect` calls handing back
//!    the dense ids the rest of the API speaks.
//! 2. **A Declarative Form:** The same shape deserializes from JSON, so a
//!    bench can load its platform description from a file.
//! 3. **A One-Way Lock:** Construction consumes and locks the configuration;
//!    every later mutation attempt fails instead of silently diverging from
//!    the built fabric.
//!
//! ```
//! use ahbsim_core::FabricConfig;
//!
//! let cfg = FabricConfig::from_json(
//!     r#"{
//!         "masters": ["ext", "dsp"],
//!         "slaves": [
//!             { "name": "ram", "ranges": [{ "base": 4026531840, "size": 65536 }] },
//!             { "name": "misc", "ranges": [{ "size": 32768 }] }
//!         ],
//!         "links": [["ext", "ram"], ["dsp", "ram"], ["dsp", "misc"]]
//!     }"#,
//! )?;
//! assert_eq!(cfg.data_width(), 32);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::Deserialize;

use crate::common::error::ConfigError;
use crate::common::ids::{MasterId, SlaveId};
use crate::fabric::addrmap::{self, RangeEntry};
use crate::fabric::arbiter::ArbitrationPolicy;

/// Configuration values applied when the input does not specify them.
pub mod defaults {
    /// Data path width in bits.
    pub const DATA_WIDTH_BITS: u32 = 32;
}

/// One declared address range of a slave.
///
/// A missing `base` asks for automatic placement: the lowest size-aligned
/// slot, scanning upward from zero past every range declared before it.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RangeConfig {
    /// First address of the range; `None` requests automatic placement.
    #[serde(default)]
    pub base: Option<u32>,
    /// Length of the range in bytes; a power of two of at least 1 KiB.
    pub size: u32,
}

/// One declared slave port.
#[derive(Clone, Debug, Deserialize)]
pub struct SlaveConfig {
    /// Port name, unique among slaves.
    pub name: String,
    /// Address ranges the slave owns, in declaration order.
    #[serde(default)]
    pub ranges: Vec<RangeConfig>,
}

/// Complete fabric description, mutable until locked.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FabricConfig {
    data_width_bits: u32,
    arbitration: ArbitrationPolicy,
    masters: Vec<String>,
    slaves: Vec<SlaveConfig>,
    links: Vec<(String, String)>,
    #[serde(skip)]
    locked: bool,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            data_width_bits: defaults::DATA_WIDTH_BITS,
            arbitration: ArbitrationPolicy::default(),
            masters: Vec::new(),
            slaves: Vec::new(),
            links: Vec::new(),
            locked: false,
        }
    }
}

impl FabricConfig {
    /// Creates an empty configuration with default knobs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the declarative JSON form.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error; structural validation (unknown
    /// names, bad ranges) happens when the fabric is built.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the configured data path width in bits.
    pub fn data_width(&self) -> u32 {
        self.data_width_bits
    }

    /// Sets the data path width in bits; one of 8, 16, 32 or 64.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Locked`] after the fabric is built, or
    /// [`ConfigError::InvalidDataWidth`] for an unsupported width.
    pub fn set_data_width(&mut self, bits: u32) -> Result<(), ConfigError> {
        self.ensure_unlocked()?;
        if !matches!(bits, 8 | 16 | 32 | 64) {
            return Err(ConfigError::InvalidDataWidth { bits });
        }
        self.data_width_bits = bits;
        Ok(())
    }

    /// Returns the configured arbitration policy.
    pub fn arbitration(&self) -> ArbitrationPolicy {
        self.arbitration
    }

    /// Sets the arbitration policy applied by every slave arbiter.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Locked`] after the fabric is built.
    pub fn set_arbitration(&mut self, policy: ArbitrationPolicy) -> Result<(), ConfigError> {
        self.ensure_unlocked()?;
        self.arbitration = policy;
        Ok(())
    }

    /// Declares a master port and returns its id.
    ///
    /// Ids are dense indices in declaration order; the index doubles as the
    /// fixed arbitration priority, lower winning.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Locked`] after the fabric is built, or
    /// [`ConfigError::DuplicateName`] when a master of that name exists.
    pub fn add_master(&mut self, name: &str) -> Result<MasterId, ConfigError> {
        self.ensure_unlocked()?;
        if self.masters.iter().any(|m| m.as_str() == name) {
            return Err(ConfigError::DuplicateName {
                name: name.to_owned(),
            });
        }
        self.masters.push(name.to_owned());
        Ok(MasterId(self.masters.len() - 1))
    }

    /// Declares a slave port and returns its id.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Locked`] after the fabric is built, or
    /// [`ConfigError::DuplicateName`] when a slave of that name exists.
    pub fn add_slave(&mut self, name: &str) -> Result<SlaveId, ConfigError> {
        self.ensure_unlocked()?;
        if self.slaves.iter().any(|s| s.name == name) {
            return Err(ConfigError::DuplicateName {
                name: name.to_owned(),
            });
        }
        self.slaves.push(SlaveConfig {
            name: name.to_owned(),
            ranges: Vec::new(),
        });
        Ok(SlaveId(self.slaves.len() - 1))
    }

    /// Declares an address range for a slave.
    ///
    /// `base: None` requests automatic placement (resolved when the fabric
    /// is built, against every range declared before this one).
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Locked`] after the fabric is built,
    /// [`ConfigError::UnknownSlave`] for a foreign id, or a size/bounds
    /// error for an invalid range.
    pub fn add_range(
        &mut self,
        slave: SlaveId,
        base: Option<u32>,
        size: u32,
    ) -> Result<(), ConfigError> {
        self.ensure_unlocked()?;
        let Some(decl) = self.slaves.get_mut(slave.index()) else {
            return Err(ConfigError::UnknownSlave {
                name: slave.to_string(),
            });
        };
        addrmap::validate_size(&decl.name, size)?;
        if let Some(base) = base {
            addrmap::validate_bounds(&decl.name, base, size)?;
        }
        decl.ranges.push(RangeConfig { base, size });
        Ok(())
    }

    /// Permits a master to address a slave.
    ///
    /// Undeclared pairs never route; a master reaching a mapped but
    /// unconnected slave takes a decode error.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Locked`] after the fabric is built, or an
    /// unknown-port error for a foreign id.
    pub fn connect(&mut self, master: MasterId, slave: SlaveId) -> Result<(), ConfigError> {
        self.ensure_unlocked()?;
        let Some(master) = self.masters.get(master.index()) else {
            return Err(ConfigError::UnknownMaster {
                name: master.to_string(),
            });
        };
        let Some(slave) = self.slaves.get(slave.index()) else {
            return Err(ConfigError::UnknownSlave {
                name: slave.to_string(),
            });
        };
        self.links.push((master.clone(), slave.name.clone()));
        Ok(())
    }

    /// Permits a master to address a slave, both given by name.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::Locked`] after the fabric is built, or an
    /// unknown-port error for an undeclared name.
    pub fn connect_by_name(&mut self, master: &str, slave: &str) -> Result<(), ConfigError> {
        self.ensure_unlocked()?;
        let master = self
            .masters
            .iter()
            .find(|m| m.as_str() == master)
            .ok_or_else(|| ConfigError::UnknownMaster {
                name: master.to_owned(),
            })?
            .clone();
        let slave = self
            .slaves
            .iter()
            .find(|s| s.name == slave)
            .ok_or_else(|| ConfigError::UnknownSlave {
                name: slave.to_owned(),
            })?
            .name
            .clone();
        self.links.push((master, slave));
        Ok(())
    }

    /// Resolves a master name to its id.
    pub fn master_id(&self, name: &str) -> Option<MasterId> {
        self.masters
            .iter()
            .position(|m| m.as_str() == name)
            .map(MasterId)
    }

    /// Resolves a slave name to its id.
    pub fn slave_id(&self, name: &str) -> Option<SlaveId> {
        self.slaves.iter().position(|s| s.name == name).map(SlaveId)
    }

    /// Freezes the configuration; every later mutation fails.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Returns whether the configuration has been locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn ensure_unlocked(&self) -> Result<(), ConfigError> {
        if self.locked {
            return Err(ConfigError::Locked);
        }
        Ok(())
    }

    /// Validates everything and lowers the declaration into dense form.
    ///
    /// Automatic range bases resolve here, in declaration order, so the
    /// resulting map depends only on the input order.
    pub(crate) fn finalize(self) -> Result<ResolvedConfig, ConfigError> {
        if !matches!(self.data_width_bits, 8 | 16 | 32 | 64) {
            return Err(ConfigError::InvalidDataWidth {
                bits: self.data_width_bits,
            });
        }
        for (i, name) in self.masters.iter().enumerate() {
            if self.masters[..i].contains(name) {
                return Err(ConfigError::DuplicateName { name: name.clone() });
            }
        }
        for (i, slave) in self.slaves.iter().enumerate() {
            if self.slaves[..i].iter().any(|s| s.name == slave.name) {
                return Err(ConfigError::DuplicateName {
                    name: slave.name.clone(),
                });
            }
        }

        let mut entries = Vec::new();
        for (idx, slave) in self.slaves.iter().enumerate() {
            let id = SlaveId(idx);
            for range in &slave.ranges {
                addrmap::validate_size(&slave.name, range.size)?;
                let base = match range.base {
                    Some(base) => {
                        addrmap::validate_bounds(&slave.name, base, range.size)?;
                        base
                    }
                    None => addrmap::first_fit(&entries, range.size).ok_or_else(|| {
                        ConfigError::AddressSpaceExhausted {
                            slave: slave.name.clone(),
                            size: range.size,
                        }
                    })?,
                };
                entries.push(RangeEntry {
                    slave: id,
                    base,
                    size: range.size,
                });
            }
        }

        let mut links = Vec::with_capacity(self.links.len());
        for (master, slave) in &self.links {
            let m = self
                .masters
                .iter()
                .position(|name| name == master)
                .map(MasterId)
                .ok_or_else(|| ConfigError::UnknownMaster {
                    name: master.clone(),
                })?;
            let s = self
                .slaves
                .iter()
                .position(|decl| decl.name == *slave)
                .map(SlaveId)
                .ok_or_else(|| ConfigError::UnknownSlave {
                    name: slave.clone(),
                })?;
            links.push((m, s));
        }

        Ok(ResolvedConfig {
            width_bits: self.data_width_bits,
            policy: self.arbitration,
            masters: self.masters,
            slaves: self.slaves.into_iter().map(|s| s.name).collect(),
            entries,
            links,
        })
    }
}

/// Dense, fully validated form the fabric is built from.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedConfig {
    pub width_bits: u32,
    pub policy: ArbitrationPolicy,
    pub masters: Vec<String>,
    pub slaves: Vec<String>,
    pub entries: Vec<RangeEntry>,
    pub links: Vec<(MasterId, SlaveId)>,
}
