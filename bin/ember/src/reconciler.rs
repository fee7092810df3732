use std::collections::BTreeMap;
use std::fmt;

use fireboard::{DegreeType, Device, DriveLog};
use log::{debug, trace, warn};

use crate::{Binding, Bindings, Host, LocalId, Result, StateUpdate, StateValue};

/// An expected field was absent from a remote record. The matching state is
/// left untouched on the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingError {
    pub hardware_id: String,
    pub field: &'static str,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: missing field {}", self.hardware_id, self.field)
    }
}

impl std::error::Error for MappingError {}

/// Mirrors the latest FireBoard snapshot into the host devices bound to it.
#[derive(Debug, Default)]
pub struct Reconciler {
    devices: BTreeMap<String, Device>,
    bindings: Bindings,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, binding: Binding, id: LocalId) -> Result<()> {
        debug!("binding {binding} to {id}");
        self.bindings.bind(binding, id)
    }

    pub fn unbind(&mut self, binding: &Binding) -> Result<LocalId> {
        let id = self.bindings.unbind(binding)?;
        debug!("unbound {binding} from {id}");
        Ok(id)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn known_devices(&self) -> &BTreeMap<String, Device> {
        &self.devices
    }

    /// Known devices that no host device mirrors yet, as `(hardware_id, title)`.
    pub fn unbound_devices(&self) -> Vec<(&str, &str)> {
        self.devices
            .values()
            .filter(|device| !self.bindings.is_bound(&Binding::device(&device.hardware_id)))
            .map(|device| {
                let title = device.title.as_deref().unwrap_or(&device.hardware_id);
                (device.hardware_id.as_str(), title)
            })
            .collect()
    }

    pub fn dump(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.devices)
    }

    pub fn apply<H: Host>(&mut self, devices: Vec<Device>, host: &mut H) {
        self.devices = devices
            .into_iter()
            .map(|device| (device.hardware_id.clone(), device))
            .collect();

        debug!("{} devices", self.devices.len());

        for (binding, id) in self.bindings.iter() {
            let device = match self.devices.get(binding.hardware_id()) {
                Some(device) => device,
                None => {
                    debug!("{binding} is bound to {id} but was not reported");
                    continue;
                }
            };

            trace!("{binding}: {device:?}");

            let mapped = match binding {
                Binding::Device { .. } => map_device(device),
                Binding::Channel { channel, .. } => map_channel(device, *channel),
            };

            for err in &mapped.errors {
                warn!("{err}");
            }

            host.update_states(*id, mapped.states);
        }
    }
}

#[derive(Debug)]
struct Mapped {
    states: Vec<StateUpdate>,
    errors: Vec<MappingError>,
}

impl Mapped {
    fn new() -> Self {
        Self {
            states: vec![],
            errors: vec![],
        }
    }

    fn push(&mut self, state: StateUpdate) {
        self.states.push(state);
    }

    fn required<V: Into<StateValue>>(&mut self, device: &Device, key: &'static str, value: Option<V>) {
        match value {
            Some(value) => self.states.push(StateUpdate::new(key, value)),
            None => self.missing(device, key),
        }
    }

    fn optional<V: Into<StateValue>>(&mut self, key: &'static str, value: Option<V>) {
        if let Some(value) = value {
            self.states.push(StateUpdate::new(key, value));
        }
    }

    fn missing(&mut self, device: &Device, field: &'static str) {
        self.errors.push(MappingError {
            hardware_id: device.hardware_id.clone(),
            field,
        });
    }
}

fn map_device(device: &Device) -> Mapped {
    let mut mapped = Mapped::new();

    mapped.required(device, "uuid", device.uuid.as_deref());
    mapped.required(device, "title", device.title.as_deref());
    mapped.required(device, "model", device.model.as_deref());
    mapped.required(device, "created", device.created.as_deref());
    mapped.required(device, "channel_count", device.channel_count);
    mapped.required(device, "degreetype", device.degreetype.map(|d| d.code()));
    mapped.optional("last_templog", device.last_templog.as_deref());
    mapped.optional("probe_config", device.probe_config.as_ref().map(|c| c.to_string()));
    mapped.required(device, "id", device.id);
    mapped.push(StateUpdate::new("hardware_id", device.hardware_id.as_str()));
    mapped.required(device, "version", device.version.as_deref());
    mapped.optional("fbj_version", device.fbj_version.as_deref());
    mapped.optional("fbn_version", device.fbn_version.as_deref());
    mapped.optional("fbu_version", device.fbu_version.as_deref());

    // devices without a battery report 0
    if let Some(battery) = device.last_battery_reading.filter(|battery| *battery != 0.0) {
        mapped.push(StateUpdate::new("batteryLevel", battery).with_display(format!("{battery}%")));
    }

    if let Some(drivelog) = &device.last_drivelog {
        map_drivelog(&mut mapped, drivelog, device.degreetype);
    }

    mapped
}

fn map_drivelog(mapped: &mut Mapped, drivelog: &DriveLog, degree_type: Option<DegreeType>) {
    mapped.optional("drive_mode", drivelog.modetype);
    mapped.optional("drive_type", drivelog.drivetype);
    mapped.optional("drive_percent", drivelog.driveper);

    if let Some(setpoint) = drivelog.setpoint {
        let setpoint = round_to_tenth(setpoint);
        mapped.push(
            StateUpdate::new("drive_setpoint", setpoint)
                .with_display(display_temperature(setpoint, degree_type))
                .with_precision(1),
        );
    }

    mapped.optional("drive_lid_paused", drivelog.lidpaused);
    mapped.optional("drive_created", drivelog.created.as_deref());
}

fn map_channel(device: &Device, number: u32) -> Mapped {
    let mut mapped = Mapped::new();

    match device.channel(number) {
        Some(channel) => {
            mapped.optional("id", channel.id);
            mapped.push(StateUpdate::new("channel", channel.channel));
            mapped.required(device, "channel_label", channel.channel_label.as_deref());
            mapped.optional("created", channel.created.as_deref());
            mapped.optional("enabled", channel.enabled);
        }
        None => mapped.missing(device, "channels"),
    }

    let reading = device.latest_temp(number);
    let value = round_to_tenth(reading.and_then(|reading| reading.temp).unwrap_or(0.0));

    let degree_type = reading
        .and_then(|reading| reading.degreetype)
        .or(device.degreetype);

    match degree_type {
        Some(DegreeType::Unknown(code)) => {
            warn!(
                "{}-{number}: unknown degree type {code}, showing reading without unit",
                device.hardware_id
            );
        }
        Some(_) => (),
        None => mapped.missing(device, "degreetype"),
    }

    mapped.push(
        StateUpdate::new("sensorValue", value)
            .with_display(display_temperature(value, degree_type))
            .with_precision(1),
    );
    mapped.optional("reading_time", reading.and_then(|reading| reading.created.as_deref()));

    mapped
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn display_temperature(value: f64, degree_type: Option<DegreeType>) -> String {
    match degree_type.and_then(|degree_type| degree_type.suffix()) {
        Some(suffix) => format!("{value:.1} {suffix}"),
        None => format!("{value:.1}"),
    }
}
