//! Countdown scheduling and display.
//!
//! The countdown is a repeating one-second task that pushes
//! [`ExamEvent::Tick`] into the controller's event channel. Each started
//! countdown is tagged with the session epoch so ticks that were already
//! queued when it was cancelled can be told apart from the live one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::controller::ExamEvent;

/// Interval between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Format remaining seconds as `MM:SS`.
pub fn format_remaining(remaining_secs: u64) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Starts countdowns.
pub trait Ticker: Send {
    /// Start a countdown that reports ticks for `epoch`.
    fn start(&self, epoch: u64) -> Box<dyn TimerHandle>;
}

/// Handle to a running countdown.
pub trait TimerHandle: Send {
    /// Stop the countdown. Cancelling twice is a no-op.
    fn cancel(&mut self);

    /// Whether the countdown is still scheduled.
    fn is_active(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Tokio-backed ticker
// ---------------------------------------------------------------------------

/// Countdown backed by a spawned tokio task.
///
/// `start` must be called from within a tokio runtime.
pub struct TokioTicker {
    events: mpsc::UnboundedSender<ExamEvent>,
    period: Duration,
}

impl TokioTicker {
    pub fn new(events: mpsc::UnboundedSender<ExamEvent>) -> Self {
        Self {
            events,
            period: TICK_PERIOD,
        }
    }

    /// Override the tick interval.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }
}

impl Ticker for TokioTicker {
    fn start(&self, epoch: u64) -> Box<dyn TimerHandle> {
        let events = self.events.clone();
        let period = self.period;

        let task = tokio::spawn(async move {
            // First tick one full period after start.
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if events.send(ExamEvent::Tick { epoch }).is_err() {
                    tracing::debug!(epoch, "event channel closed, stopping countdown");
                    break;
                }
            }
        });

        Box::new(TokioTimerHandle { task: Some(task) })
    }
}

/// Aborts its task on cancel or drop.
pub struct TokioTimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle for TokioTimerHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TokioTimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Manual ticker
// ---------------------------------------------------------------------------

/// A ticker that never fires on its own; callers deliver ticks by hand.
///
/// Counts started and cancelled countdowns so tests can check that no
/// countdown outlives its session.
#[derive(Clone, Default)]
pub struct ManualTicker {
    started: Arc<AtomicUsize>,
    cancelled: Arc<AtomicUsize>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of countdowns started so far.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::Relaxed)
    }

    /// Number of countdowns cancelled so far.
    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Countdowns started and not yet cancelled.
    pub fn active(&self) -> usize {
        self.started() - self.cancelled()
    }
}

impl Ticker for ManualTicker {
    fn start(&self, _epoch: u64) -> Box<dyn TimerHandle> {
        self.started.fetch_add(1, Ordering::Relaxed);
        Box::new(ManualTimerHandle {
            active: true,
            cancelled: Arc::clone(&self.cancelled),
        })
    }
}

struct ManualTimerHandle {
    active: bool,
    cancelled: Arc<AtomicUsize>,
}

impl TimerHandle for ManualTimerHandle {
    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.cancelled.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for ManualTimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
