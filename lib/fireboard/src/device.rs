use std::fmt;

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "i64", into = "i64")]
pub enum DegreeType {
    Celsius,
    Fahrenheit,
    Unknown(i64),
}

impl DegreeType {
    pub fn code(&self) -> i64 {
        match self {
            DegreeType::Celsius => 1,
            DegreeType::Fahrenheit => 2,
            DegreeType::Unknown(code) => *code,
        }
    }

    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            DegreeType::Celsius => Some("°C"),
            DegreeType::Fahrenheit => Some("°F"),
            DegreeType::Unknown(_) => None,
        }
    }
}

impl From<i64> for DegreeType {
    fn from(code: i64) -> Self {
        match code {
            1 => DegreeType::Celsius,
            2 => DegreeType::Fahrenheit,
            other => DegreeType::Unknown(other),
        }
    }
}

impl From<DegreeType> for i64 {
    fn from(degree_type: DegreeType) -> Self {
        degree_type.code()
    }
}

impl fmt::Display for DegreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suffix() {
            Some(suffix) => write!(f, "{suffix}"),
            None => write!(f, "unknown degree type {}", self.code()),
        }
    }
}

/// A FireBoard thermometer as returned by `devices.json`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Device {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub uuid: Option<String>,
    pub hardware_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub channel_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub degreetype: Option<DegreeType>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_templog: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub probe_config: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub fbj_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub fbn_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub fbu_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_battery_reading: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub latest_temps: Vec<Temperature>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_drivelog: Option<DriveLog>,
    #[serde(default, deserialize_with = "lenient")]
    pub channels: Vec<Channel>,
}

impl Device {
    pub fn channel(&self, number: u32) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.channel == number)
    }

    pub fn latest_temp(&self, channel: u32) -> Option<&Temperature> {
        self.latest_temps.iter().find(|temp| temp.channel == channel)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Channel {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    pub channel: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub channel_label: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Temperature {
    pub channel: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub degreetype: Option<DegreeType>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<String>,
}

/// State of a blower or other drive accessory attached to the device.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DriveLog {
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub drivetype: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub driveper: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub modetype: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub setpoint: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lidpaused: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub tiedchannel: Option<u32>,
}

/// Falls back to the default for a field the service sent with an unexpected
/// type, so one odd value does not reject the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    match T::deserialize(value) {
        Ok(value) => Ok(value),
        Err(err) => {
            debug!("ignoring malformed field: {err}");
            Ok(T::default())
        }
    }
}
