//! Fixed-period driver for a [`SharedSession`].

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::session::{SharedSession, TelemetrySession, TickOutcome};

/// Ticks a session every period until stopped or dropped.
///
/// Dropping the timer cancels it, so it never outlives its owner.
pub struct TelemetryTimer {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl TelemetryTimer {
    /// Starts ticking `session`, the first tick one `period` from now.
    ///
    /// `on_tick` runs after every tick while the session is still locked.
    /// A tick that overruns the period delays the next one instead of
    /// queueing extra ticks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(session: SharedSession, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(&TelemetrySession, &TickOutcome) + Send + 'static,
    {
        let (shutdown, mut stopped) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = stopped.changed() => break,
                    _ = interval.tick() => {}
                }
                if *stopped.borrow() {
                    break;
                }

                // the guard must be gone before the next await
                {
                    let Ok(mut guard) = session.lock() else {
                        log::error!("Telemetry session lock poisoned, stopping timer");
                        break;
                    };
                    let outcome = guard.tick();
                    on_tick(&*guard, &outcome);
                }
            }

            log::debug!("Telemetry timer stopped");
        });

        log::info!("Telemetry timer started with a {period:?} period");

        Self {
            shutdown,
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the timer. Once this returns no further tick will happen.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TelemetryTimer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use std::sync::{Arc, Mutex};

    fn shared_session() -> SharedSession {
        crate::session::TelemetrySession::new(&EngineConfig {
            seed: Some(17),
            ..EngineConfig::default()
        })
        .into_shared()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let session = shared_session();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_timer = seen.clone();

        let timer = TelemetryTimer::start(
            session.clone(),
            Duration::from_millis(1000),
            move |session, outcome| {
                assert_eq!(*outcome, TickOutcome::Advanced);
                seen_by_timer.lock().unwrap().push(session.ticks());
            },
        );

        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(session.lock().unwrap().history().len(), 3);
        assert!(timer.is_running());

        timer.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_stop() {
        let session = shared_session();
        let timer = TelemetryTimer::start(session.clone(), Duration::from_millis(100), |_, _| {});

        tokio::time::sleep(Duration::from_millis(250)).await;
        timer.stop().await;
        let ticks = session.lock().unwrap().ticks();
        assert_eq!(ticks, 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.lock().unwrap().ticks(), ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels() {
        let session = shared_session();
        {
            let _timer =
                TelemetryTimer::start(session.clone(), Duration::from_millis(100), |_, _| {});
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        assert_eq!(session.lock().unwrap().ticks(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.lock().unwrap().ticks(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn accelerated_clock_uses_configured_interval() {
        let config = EngineConfig {
            tick_interval_ms: 10,
            seed: Some(4),
            ..EngineConfig::default()
        };
        let session = crate::session::TelemetrySession::new(&config).into_shared();
        let timer = TelemetryTimer::start(session.clone(), config.tick_interval(), |_, _| {});

        tokio::time::sleep(Duration::from_millis(1005)).await;
        timer.stop().await;

        let session = session.lock().unwrap();
        assert_eq!(session.ticks(), 100);
        assert_eq!(session.history().len(), config.history_capacity);
    }
}
