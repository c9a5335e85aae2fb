//! Telemetry engine of the CanSat ground-control dashboard.
//!
//! A [`TelemetrySession`] owns the simulated sensor state. Each tick advances
//! the [`SensorSimulator`], records a chart sample in the [`HistoryBuffer`] and
//! reprojects the GNSS fix relative to the launch site. Operator commands go
//! through a separate [`CommandSink`].

pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod position;
pub mod random;
pub mod sensor;
pub mod session;
pub mod simulator;
pub mod status;

#[cfg(feature = "timer")]
pub mod timer;

pub use command::{CommandHandler, CommandHandlerPointer, CommandLogEntry, CommandSink};
pub use config::EngineConfig;
pub use error::{ConfigError, SimulationError};
pub use history::{ChartMetric, HistoryBuffer, HistorySample};
pub use position::{project, RelativePosition, RenderPoint, RenderScale};
pub use random::{RandomSource, RandomSourcePointer, RngSource, SequenceSource};
pub use sensor::{Acceleration, LaunchReference, Orientation, SensorState, LAUNCH};
pub use session::{SharedSession, TelemetrySession, TelemetrySnapshot, TickOutcome};
pub use simulator::SensorSimulator;
pub use status::{Sensor, SensorHealth, SensorStatus};

#[cfg(feature = "timer")]
pub use timer::TelemetryTimer;
