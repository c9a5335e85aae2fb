use serde::{Deserialize, Serialize};

/// Fixed geographic origin all relative positions are measured from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LaunchReference {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// The launch station. Never mutated.
pub const LAUNCH: LaunchReference = LaunchReference {
    latitude: 28.6139,
    longitude: 77.2090,
    altitude: 1000.0,
};

/// Gyro orientation in degrees, each axis kept in `[0, 360)`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Orientation {
    /// Rotation in radians as `[pitch, yaw, roll]`, the order the 3D model expects.
    pub fn to_radians(&self) -> [f64; 3] {
        [
            self.pitch.to_radians(),
            self.yaw.to_radians(),
            self.roll.to_radians(),
        ]
    }
}

/// Accelerometer reading, arbitrary units in `[-1, 1]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The instantaneous state of every simulated sensor.
///
/// Exactly one of these is live per session. It is replaced on every tick and
/// reset by calibration; no history is kept for it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SensorState {
    /// Meters.
    pub altitude: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Hectopascal.
    pub pressure: f64,
    /// Percent, `0..=100`.
    pub humidity: f64,
    /// Percent, `0..=100`.
    pub battery: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub orientation: Orientation,
    pub acceleration: Acceleration,
    /// µg/m³, never negative.
    pub air_quality: f64,
}

impl SensorState {
    /// The state right after calibration, derived from the launch reference.
    pub fn launch_defaults(reference: &LaunchReference) -> Self {
        Self {
            altitude: reference.altitude,
            temperature: 25.0,
            pressure: 1013.0,
            humidity: 50.0,
            battery: 100.0,
            latitude: reference.latitude,
            longitude: reference.longitude,
            orientation: Orientation::default(),
            acceleration: Acceleration::default(),
            air_quality: 10.0,
        }
    }

    /// Name of the first field holding NaN or infinity, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        let fields = [
            ("altitude", self.altitude),
            ("temperature", self.temperature),
            ("pressure", self.pressure),
            ("humidity", self.humidity),
            ("battery", self.battery),
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("orientation.pitch", self.orientation.pitch),
            ("orientation.yaw", self.orientation.yaw),
            ("orientation.roll", self.orientation.roll),
            ("acceleration.x", self.acceleration.x),
            ("acceleration.y", self.acceleration.y),
            ("acceleration.z", self.acceleration.z),
            ("air_quality", self.air_quality),
        ];

        fields
            .into_iter()
            .find(|(_, value)| !value.is_finite())
            .map(|(name, _)| name)
    }
}

impl Default for SensorState {
    fn default() -> Self {
        Self::launch_defaults(&LAUNCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sit_on_the_launch_pad() {
        let state = SensorState::default();

        assert_eq!(state.altitude, 1000.0);
        assert_eq!(state.latitude, LAUNCH.latitude);
        assert_eq!(state.longitude, LAUNCH.longitude);
        assert_eq!(state.battery, 100.0);
        assert_eq!(state.air_quality, 10.0);
        assert_eq!(state.orientation, Orientation::default());
    }

    #[test]
    fn non_finite_field_is_named() {
        let mut state = SensorState::default();
        assert_eq!(state.first_non_finite(), None);

        state.orientation.yaw = f64::NAN;
        assert_eq!(state.first_non_finite(), Some("orientation.yaw"));
    }

    #[test]
    fn orientation_in_radians() {
        let orientation = Orientation {
            pitch: 180.0,
            yaw: 90.0,
            roll: 0.0,
        };
        let [pitch, yaw, roll] = orientation.to_radians();

        assert!((pitch - std::f64::consts::PI).abs() < 1e-12);
        assert!((yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(roll, 0.0);
    }
}
