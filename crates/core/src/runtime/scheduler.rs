//! Decides when enough of the workspace has arrived to build the index.
//!
//! Pure state machine: callers pass the current `Instant` in and arm their own
//! timer from [`InitScheduler::next_deadline`].

use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(1500);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);
pub const DEFAULT_MANIFEST_POLL_ATTEMPTS: u32 = 5;
pub const DEFAULT_MANIFEST_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// How long the file count must stay unchanged before initializing.
    pub quiescence: Duration,
    /// Upper bound between the first arrival and initialization.
    pub max_wait: Duration,
    pub manifest_poll_attempts: u32,
    pub manifest_poll_interval: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            quiescence: DEFAULT_QUIESCENCE,
            max_wait: DEFAULT_MAX_WAIT,
            manifest_poll_attempts: DEFAULT_MANIFEST_POLL_ATTEMPTS,
            manifest_poll_interval: DEFAULT_MANIFEST_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    Idle,
    Accumulating,
    Stabilizing { deadline: Instant },
    Initializing,
    Ready,
}

/// How an initialization attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Indexed(usize),
    ManifestMissing,
    Failed(String),
}

#[derive(Debug)]
pub struct InitScheduler {
    options: SchedulerOptions,
    phase: InitPhase,
    known_files: usize,
    first_arrival: Option<Instant>,
    arrivals_while_initializing: bool,
}

impl InitScheduler {
    pub fn new(options: SchedulerOptions) -> Self {
        Self {
            options,
            phase: InitPhase::Idle,
            known_files: 0,
            first_arrival: None,
            arrivals_while_initializing: false,
        }
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    pub fn phase(&self) -> InitPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == InitPhase::Ready
    }

    /// Start listening for arrivals.
    pub fn start(&mut self) {
        if self.phase == InitPhase::Idle {
            self.phase = InitPhase::Accumulating;
        }
    }

    fn deadline_from(&self, now: Instant) -> Instant {
        let quiet = now + self.options.quiescence;
        match self.first_arrival {
            Some(first) => quiet.min(first + self.options.max_wait),
            None => quiet,
        }
    }

    /// Report the number of files currently known. The quiescence timer is
    /// re-armed only when the count changed. Returns whether it was re-armed.
    pub fn record_arrival(&mut self, now: Instant, known_files: usize) -> bool {
        let changed = known_files != self.known_files;
        self.known_files = known_files;
        match self.phase {
            InitPhase::Ready => false,
            InitPhase::Initializing => {
                self.arrivals_while_initializing |= changed;
                false
            }
            InitPhase::Idle | InitPhase::Accumulating | InitPhase::Stabilizing { .. } => {
                if !changed && self.phase != InitPhase::Idle {
                    return false;
                }
                self.first_arrival.get_or_insert(now);
                self.phase = InitPhase::Stabilizing {
                    deadline: self.deadline_from(now),
                };
                true
            }
        }
    }

    /// An immediate initialization succeeded outside the timer.
    pub fn force_ready(&mut self) {
        self.phase = InitPhase::Ready;
        self.first_arrival = None;
        self.arrivals_while_initializing = false;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            InitPhase::Stabilizing { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Move to `Initializing` when the deadline passed. Returns true exactly
    /// once per deadline; the caller must then run initialization and report
    /// back through [`InitScheduler::complete`].
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.phase {
            InitPhase::Stabilizing { deadline } if now >= deadline => {
                self.phase = InitPhase::Initializing;
                self.arrivals_while_initializing = false;
                true
            }
            _ => false,
        }
    }

    /// Record the result of an attempt. Only a non-empty index is final;
    /// anything else goes back to waiting for more files.
    pub fn complete(&mut self, now: Instant, outcome: &InitOutcome) -> InitPhase {
        match outcome {
            InitOutcome::Indexed(count) if *count > 0 => {
                self.phase = InitPhase::Ready;
                self.first_arrival = None;
            }
            _ => {
                self.first_arrival = None;
                if std::mem::take(&mut self.arrivals_while_initializing) {
                    self.first_arrival = Some(now);
                    self.phase = InitPhase::Stabilizing {
                        deadline: self.deadline_from(now),
                    };
                } else {
                    self.phase = InitPhase::Accumulating;
                }
            }
        }
        self.phase
    }
}

impl Default for InitScheduler {
    fn default() -> Self {
        Self::new(SchedulerOptions::default())
    }
}
