//! Synthesises the next sensor sample from the previous one.
//!
//! Every field is an independent Markov update: the next value depends only on
//! the current one and fresh draws from the injected [`RandomSource`].

use crate::error::SimulationError;
use crate::random::RandomSourcePointer;
use crate::sensor::{Acceleration, LaunchReference, Orientation, SensorState, LAUNCH};

/// Pressure is resampled around this mean every tick rather than walked.
const MEAN_PRESSURE_HPA: f64 = 1013.0;
const DESCENT_PER_TICK_M: f64 = 5.0;
const BATTERY_DRAIN_PER_TICK: f64 = 0.2;

pub struct SensorSimulator {
    source: RandomSourcePointer,
    reference: LaunchReference,
}

impl SensorSimulator {
    pub fn new(source: RandomSourcePointer) -> Self {
        Self::with_reference(source, LAUNCH)
    }

    pub fn with_reference(source: RandomSourcePointer, reference: LaunchReference) -> Self {
        Self { source, reference }
    }

    pub fn reference(&self) -> &LaunchReference {
        &self.reference
    }

    /// Produces the state following `prev`.
    ///
    /// Draws happen in a fixed order (altitude, temperature, pressure, humidity,
    /// battery, latitude, longitude, pitch, yaw, roll, acceleration x/y/z, air
    /// quality) so a seeded source replays identically.
    ///
    /// Bounded fields are clamped after the update. A candidate holding NaN or
    /// infinity is rejected as a whole.
    pub fn advance(&mut self, prev: &SensorState) -> Result<SensorState, SimulationError> {
        let source = &mut self.source;

        let candidate = SensorState {
            altitude: prev.altitude - DESCENT_PER_TICK_M + source.uniform(-5.0, 5.0),
            temperature: prev.temperature + source.uniform(-0.5, 0.5),
            pressure: MEAN_PRESSURE_HPA + source.uniform(-2.5, 2.5),
            humidity: prev.humidity + source.uniform(-1.5, 1.5),
            battery: prev.battery - BATTERY_DRAIN_PER_TICK - source.uniform(0.0, 0.2),
            latitude: prev.latitude + source.uniform(-0.00005, 0.00005),
            longitude: prev.longitude + source.uniform(-0.00005, 0.00005),
            orientation: Orientation {
                pitch: prev.orientation.pitch + source.uniform(0.0, 5.0),
                yaw: prev.orientation.yaw + source.uniform(0.0, 5.0),
                roll: prev.orientation.roll + source.uniform(0.0, 5.0),
            },
            acceleration: Acceleration {
                x: source.uniform(-1.0, 1.0),
                y: source.uniform(-1.0, 1.0),
                z: source.uniform(-1.0, 1.0),
            },
            air_quality: prev.air_quality + source.uniform(-1.0, 1.0),
        };

        if let Some(field) = candidate.first_non_finite() {
            return Err(SimulationError::NonFinite { field });
        }

        Ok(bounded(candidate, prev))
    }

    /// The launch defaults, as set by an operator-triggered calibration.
    pub fn calibrate(&self) -> SensorState {
        SensorState::launch_defaults(&self.reference)
    }
}

fn bounded(mut state: SensorState, prev: &SensorState) -> SensorState {
    state.altitude = state.altitude.max(0.0);
    state.humidity = state.humidity.clamp(0.0, 100.0);
    state.battery = state.battery.min(prev.battery).clamp(0.0, 100.0);
    state.air_quality = state.air_quality.max(0.0);
    state.orientation = Orientation {
        pitch: wrap_degrees(state.orientation.pitch),
        yaw: wrap_degrees(state.orientation.yaw),
        roll: wrap_degrees(state.orientation.roll),
    };
    state.acceleration = Acceleration {
        x: state.acceleration.x.clamp(-1.0, 1.0),
        y: state.acceleration.y.clamp(-1.0, 1.0),
        z: state.acceleration.z.clamp(-1.0, 1.0),
    };
    state
}

fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SequenceSource};

    fn simulator_with(values: Vec<f64>) -> SensorSimulator {
        SensorSimulator::new(Box::new(SequenceSource::new(values)))
    }

    #[test]
    fn midpoint_draws_follow_the_update_rules() {
        let mut simulator = simulator_with(vec![0.5]);
        let prev = SensorState::default();
        let next = simulator.advance(&prev).unwrap();

        assert_eq!(next.altitude, 995.0);
        assert_eq!(next.temperature, 25.0);
        assert_eq!(next.pressure, 1013.0);
        assert_eq!(next.humidity, 50.0);
        assert!((next.battery - 99.7).abs() < 1e-9);
        assert_eq!(next.latitude, prev.latitude);
        assert_eq!(next.longitude, prev.longitude);
        assert_eq!(next.orientation.pitch, 2.5);
        assert_eq!(next.acceleration, Acceleration::default());
        assert_eq!(next.air_quality, 10.0);
    }

    #[test]
    fn bounded_fields_are_clamped() {
        let mut simulator = simulator_with(vec![0.0]);
        let prev = SensorState {
            altitude: 3.0,
            humidity: 0.5,
            battery: 0.1,
            air_quality: 0.2,
            ..SensorState::default()
        };
        let next = simulator.advance(&prev).unwrap();

        assert_eq!(next.altitude, 0.0);
        assert_eq!(next.humidity, 0.0);
        assert_eq!(next.battery, 0.0);
        assert_eq!(next.air_quality, 0.0);

        let mut simulator = simulator_with(vec![0.999_999]);
        let prev = SensorState {
            humidity: 99.5,
            ..SensorState::default()
        };
        assert_eq!(simulator.advance(&prev).unwrap().humidity, 100.0);
    }

    #[test]
    fn orientation_wraps_at_full_turn() {
        let mut simulator = simulator_with(vec![0.8]);
        let prev = SensorState {
            orientation: Orientation {
                pitch: 358.0,
                yaw: 359.0,
                roll: 0.0,
            },
            ..SensorState::default()
        };
        let next = simulator.advance(&prev).unwrap();

        assert!((next.orientation.pitch - 2.0).abs() < 1e-9);
        assert!((next.orientation.yaw - 3.0).abs() < 1e-9);
        assert!((next.orientation.roll - 4.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_degrees_stays_below_full_turn() {
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-1e-20), 0.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
    }

    #[test]
    fn misbehaving_source_is_rejected() {
        let mut simulator = simulator_with(vec![f64::NAN]);
        let err = simulator.advance(&SensorState::default()).unwrap_err();

        assert_eq!(err, SimulationError::NonFinite { field: "altitude" });
    }

    #[test]
    fn out_of_range_source_cannot_raise_battery() {
        let mut simulator = simulator_with(vec![-10.0]);
        let prev = SensorState {
            battery: 40.0,
            ..SensorState::default()
        };
        let next = simulator.advance(&prev).unwrap();

        assert!(next.battery <= prev.battery);
        assert!((0.0..=100.0).contains(&next.humidity));
    }

    #[test]
    fn long_runs_keep_invariants() {
        let mut simulator = SensorSimulator::new(Box::new(RngSource::seeded(2024)));
        let mut state = SensorState::default();

        for _ in 0..5_000 {
            let next = simulator.advance(&state).unwrap();

            assert!((0.0..=100.0).contains(&next.humidity));
            assert!((0.0..=100.0).contains(&next.battery));
            assert!(next.altitude >= 0.0);
            assert!(next.air_quality >= 0.0);
            assert!(next.battery <= state.battery);
            for axis in [next.orientation.pitch, next.orientation.yaw, next.orientation.roll] {
                assert!((0.0..360.0).contains(&axis));
            }
            for axis in [next.acceleration.x, next.acceleration.y, next.acceleration.z] {
                assert!((-1.0..=1.0).contains(&axis));
            }
            assert!((1010.5..1015.5).contains(&next.pressure));

            state = next;
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = |seed| {
            let mut simulator = SensorSimulator::new(Box::new(RngSource::seeded(seed)));
            let mut state = SensorState::default();
            let mut states = Vec::new();
            for _ in 0..50 {
                state = simulator.advance(&state).unwrap();
                states.push(state);
            }
            states
        };

        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }

    #[test]
    fn calibrate_returns_launch_defaults() {
        let simulator = simulator_with(vec![0.3]);
        assert_eq!(simulator.calibrate(), SensorState::default());
    }
}
