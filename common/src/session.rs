use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::SimulationError;
use crate::history::{HistoryBuffer, HistorySample};
use crate::position::{project, RelativePosition};
use crate::random::{source_for_seed, RandomSourcePointer};
use crate::sensor::{LaunchReference, SensorState};
use crate::simulator::SensorSimulator;
use crate::status::{Sensor, SensorHealth, SensorStatus};

/// The session is shared between the timer task and whoever renders it.
pub type SharedSession = Arc<Mutex<TelemetrySession>>;

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Advanced,
    /// The previous state was kept.
    Skipped(SimulationError),
}

/// Everything a renderer needs after a tick.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TelemetrySnapshot {
    pub tick: u64,
    pub state: SensorState,
    pub status: SensorStatus,
    pub history: Vec<HistorySample>,
    pub position: RelativePosition,
}

/// Owns all live telemetry of one dashboard session.
///
/// Only [`TelemetrySession::tick`] and [`TelemetrySession::calibrate`] change
/// the sensor state.
pub struct TelemetrySession {
    simulator: SensorSimulator,
    state: SensorState,
    history: HistoryBuffer,
    status: SensorStatus,
    position: RelativePosition,
    ticks: u64,
    skipped: u64,
}

impl TelemetrySession {
    /// A session at the launch defaults, drawing from the source `config` asks for.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_source(config, source_for_seed(config.seed))
    }

    pub fn with_source(config: &EngineConfig, source: RandomSourcePointer) -> Self {
        let simulator = SensorSimulator::new(source);
        let state = simulator.calibrate();
        let position = project(&state, simulator.reference());

        Self {
            simulator,
            state,
            history: HistoryBuffer::new(config.history_capacity),
            status: SensorStatus::all_active(),
            position,
            ticks: 0,
            skipped: 0,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Advances the simulation by one tick.
    ///
    /// The current state is read once up front; history and position are both
    /// derived from the new state. A failed update is logged and skipped.
    pub fn tick(&mut self) -> TickOutcome {
        let current = self.state;

        match self.simulator.advance(&current) {
            Ok(next) => {
                self.state = next;
                self.history.record(&next);
                self.position = project(&next, self.simulator.reference());
                self.ticks += 1;

                log::debug!(
                    "Tick {}: alt {:.2} m, battery {:.2}%, offset ({:.1}, {:.1}, {:.1}) m",
                    self.ticks,
                    next.altitude,
                    next.battery,
                    self.position.x,
                    self.position.y,
                    self.position.z
                );
                TickOutcome::Advanced
            }
            Err(e) => {
                self.skipped += 1;
                log::warn!("Skipping tick: {e}");
                TickOutcome::Skipped(e)
            }
        }
    }

    /// Resets every sensor to the launch defaults.
    pub fn calibrate(&mut self) {
        self.state = self.simulator.calibrate();
        self.position = project(&self.state, self.simulator.reference());
        log::info!("Sensors calibrated to launch reference");
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn status(&self) -> &SensorStatus {
        &self.status
    }

    pub fn set_sensor_health(&mut self, sensor: Sensor, health: SensorHealth) {
        self.status.set(sensor, health);
    }

    pub fn position(&self) -> RelativePosition {
        self.position
    }

    pub fn reference(&self) -> &LaunchReference {
        self.simulator.reference()
    }

    /// Successful ticks so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn skipped_ticks(&self) -> u64 {
        self.skipped
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            tick: self.ticks,
            state: self.state,
            status: self.status.clone(),
            history: self.history.to_vec(),
            position: self.position,
        }
    }
}
