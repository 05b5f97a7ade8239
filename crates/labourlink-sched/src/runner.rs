//! Background sweep driver on a tokio interval.

use std::sync::Arc;

use tokio::task::JoinHandle;

use labourlink_accounts::AccountDirectory;
use labourlink_core::Clock;
use labourlink_engine::{BookingService, BookingStore, NotificationSink};

use crate::config::SchedulerConfig;
use crate::sweep::run_sweep;

/// Handle to the spawned sweep loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct Sweeper {
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn a sweep loop on the current tokio runtime. Each tick reads
    /// the clock once and runs a full pass; a slow pass delays the next
    /// tick rather than stacking passes.
    pub fn spawn<S, D, N, C>(
        service: Arc<BookingService<S, D, N, C>>,
        config: SchedulerConfig,
    ) -> Self
    where
        S: BookingStore + 'static,
        D: AccountDirectory + 'static,
        N: NotificationSink + 'static,
        C: Clock + 'static,
    {
        let handle = tokio::spawn(async move {
            let period = std::time::Duration::from_secs(config.tick_interval_secs.max(1));
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let now = service.now();
                run_sweep(&service, &config, now);
            }
        });
        tracing::info!(
            tick_interval_secs = config.tick_interval_secs,
            "sweep scheduler started"
        );
        Self { handle }
    }

    /// Stop the loop immediately.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
