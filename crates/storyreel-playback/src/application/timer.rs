//! Cancellable timers that deliver signals to the session loop.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A scheduled signal. Dropping the handle cancels it.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Sends `signal` once after `delay`.
    pub fn once<S>(delay: Duration, signals: UnboundedSender<S>, signal: S) -> Self
    where
        S: Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = signals.send(signal);
        });
        Self { task }
    }

    /// Sends a signal built by `make` every `period`, starting one period
    /// from now. Stops when the receiver is gone.
    pub fn repeating<S, F>(period: Duration, signals: UnboundedSender<S>, mut make: F) -> Self
    where
        S: Send + 'static,
        F: FnMut() -> S + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if signals.send(make()).is_err() {
                    break;
                }
            }
        });
        Self { task }
    }

    /// Stops the timer. Signals already delivered stay in the channel.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the timer has fired (one-shot) or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
