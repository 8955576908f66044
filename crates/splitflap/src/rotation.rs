//! Title rotation.
//!
//! [`RotationState`] is the pure index arithmetic. [`RotationScheduler`]
//! owns the periodic timer that drives it and its cancellation signal. The
//! scheduler only posts [`Tick`]s into a channel; whoever drains the channel
//! applies them, so state changes stay on a single task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Time between rotations unless configured otherwise.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(4000);

/// Current position in the title list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationState {
    current_index: usize,
    len: usize,
    last_advance: DateTime<Utc>,
}

impl RotationState {
    /// State over `len` titles starting at `seed % len`.
    ///
    /// A `len` of zero is treated as one so the index is always valid.
    #[must_use]
    pub fn new(len: usize, seed: u64) -> Self {
        let len = len.max(1);
        // usize -> u64 is lossless on supported targets, and the remainder
        // is below len so it fits back into usize.
        let start = (seed % len as u64) as usize;
        Self::starting_at(len, start)
    }

    /// State over `len` titles starting at `index` (reduced modulo `len`).
    #[must_use]
    pub fn starting_at(len: usize, index: usize) -> Self {
        let len = len.max(1);
        Self {
            current_index: index % len,
            len,
            last_advance: Utc::now(),
        }
    }

    /// Index of the title currently shown.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of titles being rotated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; the list length is at least one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// When the index last moved (or the state was created).
    #[must_use]
    pub fn last_advance(&self) -> DateTime<Utc> {
        self.last_advance
    }

    /// Move to the next title, wrapping at the end. Returns the new index.
    pub fn advance(&mut self) -> usize {
        self.current_index = (self.current_index + 1) % self.len;
        self.last_advance = Utc::now();
        self.current_index
    }

    /// Adopt a new list length, keeping the index in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.max(1);
        self.current_index %= self.len;
    }
}

/// A seed for the initial rotation index that differs between runs.
///
/// Hashes the wall-clock time, the process id and a per-process counter, so
/// two widgets created in the same instant still get different seeds.
#[must_use]
pub fn entropy_seed() -> u64 {
    static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

    let now = Utc::now();
    let mut hasher = blake3::Hasher::new();
    hasher.update(&now.timestamp().to_le_bytes());
    hasher.update(&now.timestamp_subsec_nanos().to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    hasher.update(&COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());

    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// One firing of the rotation timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 1-based count of firings since the scheduler started.
    pub sequence: u64,
    /// Wall-clock time of the firing.
    pub at: DateTime<Utc>,
}

/// Lifecycle of a [`RotationScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created, timer not armed.
    Unstarted,
    /// Timer armed and firing.
    Running,
    /// Timer disarmed for good.
    Cancelled,
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unstarted => write!(f, "unstarted"),
            Self::Running => write!(f, "running"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Cloneable stop signal shared with the timer task.
#[derive(Debug, Clone, Default)]
pub struct SchedulerHandle {
    stop_signal: Arc<AtomicBool>,
}

impl SchedulerHandle {
    /// Create a handle that has not been stopped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the timer task to stop.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }
}

/// Periodic rotation timer: started once, cancelled once.
#[derive(Debug)]
pub struct RotationScheduler {
    period: Duration,
    state: SchedulerState,
    handle: SchedulerHandle,
    task: Option<JoinHandle<()>>,
}

impl RotationScheduler {
    /// A scheduler firing every `period`.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: SchedulerState::Unstarted,
            handle: SchedulerHandle::new(),
            task: None,
        }
    }

    /// The firing period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// A clone of the stop signal.
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Arm the timer. The first tick arrives one full period from now.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchedulerAlreadyStarted`] if running, or
    /// [`Error::SchedulerCancelled`] after [`cancel`](Self::cancel).
    pub fn start(&mut self, tx: mpsc::Sender<Tick>) -> Result<()> {
        match self.state {
            SchedulerState::Running => return Err(Error::SchedulerAlreadyStarted),
            SchedulerState::Cancelled => return Err(Error::SchedulerCancelled),
            SchedulerState::Unstarted => {}
        }
        if self.period.is_zero() {
            return Err(Error::config_validation("rotation period must be non-zero"));
        }

        let period = self.period;
        let first = Instant::now() + period;
        let handle = self.handle.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sequence = 0u64;

            loop {
                ticker.tick().await;
                if handle.should_stop() {
                    break;
                }
                sequence += 1;
                let tick = Tick {
                    sequence,
                    at: Utc::now(),
                };
                if tx.send(tick).await.is_err() {
                    debug!("tick receiver dropped, stopping rotation timer");
                    break;
                }
            }
        }));

        self.state = SchedulerState::Running;
        info!(period_ms = period.as_millis(), "rotation scheduler started");
        Ok(())
    }

    /// Disarm the timer. Terminal: the scheduler cannot be restarted.
    ///
    /// Takes effect immediately; no tick is sent after this returns.
    pub fn cancel(&mut self) {
        if self.state == SchedulerState::Cancelled {
            return;
        }
        self.handle.stop();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if self.state == SchedulerState::Running {
            info!("rotation scheduler cancelled");
        }
        self.state = SchedulerState::Cancelled;
    }
}

impl Drop for RotationScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
