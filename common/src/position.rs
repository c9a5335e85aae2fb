//! GNSS position relative to the launch reference.
//!
//! Degrees are turned into meters with constant per-degree factors taken at
//! the launch latitude. This flat-Earth approximation holds for displacements
//! of a few kilometers; no geodesic correction is applied.

use serde::{Deserialize, Serialize};

use crate::sensor::{LaunchReference, SensorState};

/// Meters per degree of longitude at the launch latitude.
pub const METERS_PER_DEGREE_LONGITUDE: f64 = 111_320.0;
/// Meters per degree of latitude at the launch latitude.
pub const METERS_PER_DEGREE_LATITUDE: f64 = 110_540.0;

/// Offset from the launch reference in meters.
///
/// `x` is east, `y` is up and `z` is north.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct RelativePosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub fn project(state: &SensorState, reference: &LaunchReference) -> RelativePosition {
    RelativePosition {
        x: (state.longitude - reference.longitude) * METERS_PER_DEGREE_LONGITUDE,
        y: state.altitude - reference.altitude,
        z: (state.latitude - reference.latitude) * METERS_PER_DEGREE_LATITUDE,
    }
}

/// A position in some renderer's units.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Per-axis divisors mapping meters to a consumer's render units.
///
/// Each consumer picks its own scale; the projection itself stays in meters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RenderScale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RenderScale {
    /// The 3D position graph.
    pub const POSITION_GRAPH: RenderScale = RenderScale {
        x: 100_000.0,
        y: 100.0,
        z: 100_000.0,
    };

    /// The 3D simulation viewport.
    pub const VIEWPORT: RenderScale = RenderScale {
        x: 1_000.0,
        y: 100.0,
        z: 1_000.0,
    };

    pub fn apply(&self, position: &RelativePosition) -> RenderPoint {
        RenderPoint {
            x: position.x / self.x,
            y: position.y / self.y,
            z: position.z / self.z,
        }
    }
}
