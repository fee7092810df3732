use serde::{Deserialize, Serialize};

use crate::{DegreeType, Device};

/// A recorded cook.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// One channel's history within a session chart; `x` holds unix timestamps
/// and `y` the readings taken at those times.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ChartSeries {
    pub label: Option<String>,
    pub channel: Option<u32>,
    pub degreetype: Option<DegreeType>,
    #[serde(default)]
    pub x: Vec<i64>,
    #[serde(default)]
    pub y: Vec<f64>,
}

impl ChartSeries {
    pub fn points(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}
