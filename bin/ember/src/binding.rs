use std::collections::btree_map::{self, BTreeMap, Entry};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, LocalId, Result};

/// Remote address a host device mirrors: a whole FireBoard or one of its
/// probe channels.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Channel { hardware_id: String, channel: u32 },
    Device { hardware_id: String },
}

impl Binding {
    pub fn device(hardware_id: impl Into<String>) -> Binding {
        Binding::Device {
            hardware_id: hardware_id.into(),
        }
    }

    pub fn channel(hardware_id: impl Into<String>, channel: u32) -> Binding {
        Binding::Channel {
            hardware_id: hardware_id.into(),
            channel,
        }
    }

    pub fn hardware_id(&self) -> &str {
        match self {
            Binding::Device { hardware_id } | Binding::Channel { hardware_id, .. } => hardware_id,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Device { hardware_id } => write!(f, "{hardware_id}"),
            Binding::Channel {
                hardware_id,
                channel,
            } => write!(f, "{hardware_id}-{channel}"),
        }
    }
}

/// Each remote address maps to at most one host device.
#[derive(Debug, Default)]
pub struct Bindings {
    devices: BTreeMap<Binding, LocalId>,
}

impl Bindings {
    pub fn bind(&mut self, binding: Binding, id: LocalId) -> Result<()> {
        match self.devices.entry(binding) {
            Entry::Occupied(entry) => Err(Error::AlreadyBound(entry.key().clone(), *entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(id);
                Ok(())
            }
        }
    }

    pub fn unbind(&mut self, binding: &Binding) -> Result<LocalId> {
        self.devices
            .remove(binding)
            .ok_or_else(|| Error::NotBound(binding.clone()))
    }

    pub fn get(&self, binding: &Binding) -> Option<LocalId> {
        self.devices.get(binding).copied()
    }

    pub fn is_bound(&self, binding: &Binding) -> bool {
        self.devices.contains_key(binding)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Binding, LocalId> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
