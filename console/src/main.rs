use std::path::PathBuf;

use cansat_gcs_common::{
    ChartMetric, CommandSink, EngineConfig, RenderScale, SharedSession, TelemetrySession,
    TelemetrySnapshot, TelemetryTimer, TickOutcome,
};
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Headless ground station: telemetry frames go to stdout as JSON lines,
/// operator commands are read from stdin.
#[derive(Parser, Debug)]
#[command(name = "cansat-gcs")]
#[command(about = "Headless CanSat ground-control station")]
#[command(version)]
struct Args {
    /// Engine config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the simulator for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Number of chart samples to keep
    #[arg(long)]
    history: Option<usize>,

    /// Exit after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Third chart series
    #[arg(long, value_enum, default_value = "humidity")]
    metric: MetricArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricArg {
    Humidity,
    Pressure,
}

impl From<MetricArg> for ChartMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Humidity => ChartMetric::Humidity,
            MetricArg::Pressure => ChartMetric::Pressure,
        }
    }
}

impl Args {
    /// The config file (or defaults) with command line overrides applied.
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(history) = self.history {
            config.history_capacity = history;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Console lines the app handles itself instead of forwarding.
const CALIBRATE: &str = ":calibrate";
const QUIT: &str = ":quit";

/// Our App struct that holds the telemetry session and the command terminal.
struct App {
    config: EngineConfig,
    session: SharedSession,
    commands: CommandSink,
    metric: ChartMetric,
    tick_limit: Option<u64>,
}

impl App {
    fn new(args: &Args) -> anyhow::Result<Self> {
        let config = args.engine_config()?;
        log::info!("Engine config: {config:?}");

        let session = TelemetrySession::new(&config).into_shared();

        // There is no radio link yet, so commands only end up in the log.
        let commands = CommandSink::new(Box::new(|command: &str| {
            log::info!("Command sent to client: {command}");
        }));

        Ok(Self {
            config,
            session,
            commands,
            metric: args.metric.into(),
            tick_limit: args.ticks,
        })
    }

    /// Run the App until `:quit`, Ctrl-C or the tick limit.
    async fn run(&mut self) -> anyhow::Result<()> {
        let (done, mut finished) = tokio::sync::mpsc::unbounded_channel::<()>();
        let tick_limit = self.tick_limit;
        let metric = self.metric;

        let timer = TelemetryTimer::start(
            self.session.clone(),
            self.config.tick_interval(),
            move |session, outcome| {
                if let TickOutcome::Advanced = outcome {
                    emit_frame(&session.snapshot(), metric);
                }
                if tick_limit.is_some_and(|limit| session.ticks() >= limit) {
                    let _ = done.send(());
                }
            },
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                line = lines.next_line(), if stdin_open => match line? {
                    Some(line) => {
                        if !self.handle_line(&line)? {
                            break;
                        }
                    }
                    None => stdin_open = false,
                },
                _ = finished.recv() => break,
                _ = &mut ctrl_c => break,
            }
        }

        timer.stop().await;

        for entry in self.commands.log() {
            log::debug!(
                "[{}] {}",
                entry.submitted_at.format("%Y-%m-%d %H:%M:%S"),
                entry.display_line()
            );
        }
        Ok(())
    }

    /// Returns `false` once the operator asked to quit.
    fn handle_line(&mut self, line: &str) -> anyhow::Result<bool> {
        match line.trim() {
            QUIT => Ok(false),
            CALIBRATE => {
                self.session
                    .lock()
                    .map_err(|_| anyhow::anyhow!("telemetry session lock poisoned"))?
                    .calibrate();
                Ok(true)
            }
            _ => {
                self.commands.submit(line);
                Ok(true)
            }
        }
    }
}

/// Writes one frame for an external renderer.
fn emit_frame(snapshot: &TelemetrySnapshot, metric: ChartMetric) {
    let frame = serde_json::json!({
        "telemetry": snapshot,
        "position_graph": RenderScale::POSITION_GRAPH.apply(&snapshot.position),
        "viewport": RenderScale::VIEWPORT.apply(&snapshot.position),
        "rotation": snapshot.state.orientation.to_radians(),
        "chart": {
            "metric": metric,
            "unit": metric.unit(),
            "domain": metric.domain(),
            "values": snapshot.history.iter().map(|sample| metric.value(sample)).collect::<Vec<_>>(),
        },
    });

    println!("{frame}");
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut app = App::new(&args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(app.run());

    // The stdin reader may still be blocked on a read.
    runtime.shutdown_background();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["cansat-gcs"];
        argv.extend(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = args(&["--seed", "9", "--tick-ms", "250", "--history", "5"])
            .engine_config()
            .unwrap();

        assert_eq!(config.seed, Some(9));
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.history_capacity, 5);
    }

    #[test]
    fn invalid_override_is_rejected() {
        assert!(args(&["--tick-ms", "0"]).engine_config().is_err());
    }

    #[test]
    fn console_lines() {
        let mut app = App::new(&args(&["--seed", "1"])).unwrap();

        app.session.lock().unwrap().tick();
        assert!(app.handle_line("  :calibrate ").unwrap());
        assert_eq!(
            *app.session.lock().unwrap().state(),
            cansat_gcs_common::SensorState::default()
        );

        assert!(app.handle_line("arm").unwrap());
        assert!(app.handle_line("   ").unwrap());
        assert_eq!(app.commands.log().len(), 1);

        assert!(!app.handle_line(":quit").unwrap());
    }
}
