use std::{panic::AssertUnwindSafe, time::Duration};

use futures_util::FutureExt;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::price_monitor::PriceMonitor;

/// Drives `PriceMonitor` on a fixed interval from a background task.
///
/// Cycles run one after another inside the task, so two cycles never
/// overlap. Ticks that come due while a cycle is still running are skipped.
pub struct Scheduler {
    monitor: PriceMonitor,
    interval: Duration,
    running: Option<Running>,
}

struct Running {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    pub fn new(monitor: PriceMonitor, interval: Duration) -> Self {
        Self {
            monitor,
            interval,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Spawns the loop and returns immediately. Calling it twice is a no-op.
    pub fn start(&mut self) {
        if self.running.is_some() {
            return;
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(self.monitor.clone(), self.interval, stop_rx));

        tracing::info!(interval_secs = self.interval.as_secs_f64(), "price monitor started");
        self.running = Some(Running { stop_tx, handle });
    }

    /// Signals the loop to end and waits for it. A cycle already in progress
    /// runs to completion first.
    pub async fn stop(&mut self) {
        let Some(Running { stop_tx, handle }) = self.running.take() else {
            return;
        };

        let _ = stop_tx.send(true);
        if let Err(e) = handle.await {
            tracing::error!("price monitor task ended abnormally: {e}");
        }

        tracing::info!("price monitor stopped");
    }
}

async fn run_loop(monitor: PriceMonitor, period: Duration, mut stop_rx: watch::Receiver<bool>) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        match AssertUnwindSafe(monitor.run_scan_cycle()).catch_unwind().await {
            Ok(Ok(report)) => tracing::info!(
                scanned = report.scanned,
                alerts = report.alerts,
                no_data = report.no_data,
                failed = report.failed,
                "scan cycle finished"
            ),
            Ok(Err(e)) => tracing::error!("scan cycle abandoned: {e}"),
            Err(_) => tracing::error!("scan cycle panicked, waiting for the next tick"),
        }
    }
}
