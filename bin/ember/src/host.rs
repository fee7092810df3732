use std::collections::BTreeMap;

use log::{info, trace};

use crate::{Host, LocalId, StateUpdate};

/// Keeps the latest written value of every state key per host device.
#[derive(Debug, Default)]
pub struct MemoryHost {
    devices: BTreeMap<LocalId, BTreeMap<&'static str, StateUpdate>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self, id: LocalId) -> Option<&BTreeMap<&'static str, StateUpdate>> {
        self.devices.get(&id)
    }

    pub fn state(&self, id: LocalId, key: &str) -> Option<&StateUpdate> {
        self.devices.get(&id)?.get(key)
    }
}

impl Host for MemoryHost {
    fn update_states(&mut self, id: LocalId, states: Vec<StateUpdate>) {
        let device = self.devices.entry(id).or_default();

        for state in states {
            if device.get(state.key) == Some(&state) {
                trace!("{id}: {} unchanged", state.key);
                continue;
            }

            info!("{id}: {state}");
            device.insert(state.key, state);
        }
    }
}
