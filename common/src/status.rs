use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Every sensor the dashboard reports health for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sensor {
    #[serde(rename = "GNSS")]
    Gnss,
    Altimetry,
    Pressure,
    Temperature,
    Gyro,
    Power,
    AirQuality,
}

impl Sensor {
    pub const ALL: [Sensor; 7] = [
        Sensor::Gnss,
        Sensor::Altimetry,
        Sensor::Pressure,
        Sensor::Temperature,
        Sensor::Gyro,
        Sensor::Power,
        Sensor::AirQuality,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sensor::Gnss => "GNSS",
            Sensor::Altimetry => "Altimetry",
            Sensor::Pressure => "Pressure",
            Sensor::Temperature => "Temperature",
            Sensor::Gyro => "Gyro",
            Sensor::Power => "Power",
            Sensor::AirQuality => "AirQuality",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tri-state health indicator.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorHealth {
    #[default]
    Active,
    Error,
    Standby,
}

impl SensorHealth {
    /// Colour of the status dot next to the readout.
    pub fn color(&self) -> &'static str {
        match self {
            SensorHealth::Active => "green",
            SensorHealth::Error => "red",
            SensorHealth::Standby => "blue",
        }
    }
}

/// Health of every sensor. Nothing injects faults yet, so all start active.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SensorStatus(BTreeMap<Sensor, SensorHealth>);

impl SensorStatus {
    pub fn all_active() -> Self {
        Self(
            Sensor::ALL
                .into_iter()
                .map(|sensor| (sensor, SensorHealth::Active))
                .collect(),
        )
    }

    pub fn get(&self, sensor: Sensor) -> SensorHealth {
        self.0.get(&sensor).copied().unwrap_or_default()
    }

    pub fn set(&mut self, sensor: Sensor, health: SensorHealth) {
        self.0.insert(sensor, health);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sensor, SensorHealth)> + '_ {
        self.0.iter().map(|(sensor, health)| (*sensor, *health))
    }
}

impl Default for SensorStatus {
    fn default() -> Self {
        Self::all_active()
    }
}
