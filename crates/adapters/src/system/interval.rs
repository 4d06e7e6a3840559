use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chronodeck_application::{ApplicationError, IntervalHandle, IntervalScheduler};
use tracing::debug;

/// Runs each interval on its own thread and hands ticks back over a channel,
/// so the owning thread only ever sees them when it drains the handle.
#[derive(Debug, Default)]
pub struct ThreadIntervalScheduler;

impl IntervalScheduler for ThreadIntervalScheduler {
    fn every(&self, period: Duration) -> Result<Box<dyn IntervalHandle>, ApplicationError> {
        if period.is_zero() {
            return Err(ApplicationError::InvalidInput(
                "interval period must be greater than zero".to_string(),
            ));
        }

        let (tick_tx, tick_rx) = mpsc::channel::<()>();
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker = spawn_ticker(period, tick_tx, Arc::clone(&cancelled))?;
        debug!(period_ms = period.as_millis() as u64, "interval started");

        Ok(Box::new(ThreadIntervalHandle {
            tick_rx,
            cancelled,
            worker: Some(worker),
        }))
    }
}

pub struct ThreadIntervalHandle {
    tick_rx: mpsc::Receiver<()>,
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

#[cfg(test)]
impl ThreadIntervalHandle {
    fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl IntervalHandle for ThreadIntervalHandle {
    fn drain_ticks(&mut self) -> u64 {
        if !self.is_active() {
            return 0;
        }
        let mut ticks = 0;
        while self.tick_rx.try_recv().is_ok() {
            ticks += 1;
        }
        ticks
    }

    /// Wakes the ticker thread so it exits now instead of after its current
    /// period.
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(worker) = &self.worker {
            worker.thread().unpark();
        }
    }

    fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for ThreadIntervalHandle {
    fn drop(&mut self) {
        self.cancel();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                debug!("interval thread panicked");
            }
        }
    }
}

fn spawn_ticker(
    period: Duration,
    tick_tx: mpsc::Sender<()>,
    cancelled: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, ApplicationError> {
    thread::Builder::new()
        .name("chronodeck-interval".to_string())
        .spawn(move || {
            let mut deadline = Instant::now() + period;
            loop {
                // park_timeout may wake spuriously, so re-check both conditions.
                loop {
                    if cancelled.load(Ordering::SeqCst) {
                        return;
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    thread::park_timeout(deadline - now);
                }
                if tick_tx.send(()).is_err() {
                    return;
                }
                // A late wakeup delivers one tick, not a burst of catch-up ticks.
                deadline = (deadline + period).max(Instant::now());
            }
        })
        .map_err(|error| ApplicationError::Io(format!("failed to spawn interval thread: {error}")))
}
