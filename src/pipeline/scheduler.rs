//! Cycle scheduler: runs all task generators concurrently, sleeps, repeats.
//!
//! Fault isolation is layered: one generator failing (or panicking) never
//! touches its siblings, and a failed cycle only shortens the following
//! sleep to a cooldown instead of terminating the process. Shutdown is
//! observed at every suspend point.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::generate::TaskGenerator;

use super::queue::WorkQueue;

/// Sleep before retrying after a failed cycle.
const ERROR_BACKOFF: Duration = Duration::from_secs(60);

/// Outcome of one ingestion cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleOutcome {
    /// All generators ran to completion (individual failures included).
    Finished,
    /// The cycle could not make progress (work queue closed).
    Failed,
    /// Shutdown fired mid-cycle; in-flight generators were cancelled.
    Interrupted,
}

/// Runs the registered task generators in repeated cycles.
pub struct Scheduler {
    generators: Vec<Arc<dyn TaskGenerator>>,
    queue: WorkQueue,
    cycle_interval: Duration,
    error_backoff: Duration,
}

impl Scheduler {
    /// Creates a scheduler over the given generators and work queue.
    #[must_use]
    pub fn new(
        generators: Vec<Arc<dyn TaskGenerator>>,
        queue: WorkQueue,
        cycle_interval: Duration,
    ) -> Self {
        Self {
            generators,
            queue,
            cycle_interval,
            error_backoff: ERROR_BACKOFF,
        }
    }

    /// Overrides the post-failure cooldown (shortened in tests).
    #[must_use]
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Runs cycles forever until `shutdown` fires.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            info!("starting new ingestion cycle");
            let outcome = self.run_cycle(&mut shutdown).await;

            let wait = match outcome {
                CycleOutcome::Interrupted => break,
                CycleOutcome::Finished => {
                    info!(
                        interval_secs = self.cycle_interval.as_secs(),
                        "cycle finished; sleeping until next cycle"
                    );
                    self.cycle_interval
                }
                CycleOutcome::Failed => {
                    error!(
                        backoff_secs = self.error_backoff.as_secs(),
                        "cycle failed; backing off before retry"
                    );
                    self.error_backoff
                }
            };

            tokio::select! {
                _ = shutdown.changed() => break,
                () = tokio::time::sleep(wait) => {}
            }
            if *shutdown.borrow() {
                break;
            }
        }
        info!("scheduler stopped");
    }

    /// Runs exactly one cycle. Used by the `--once` operating mode.
    pub async fn run_once(&self, mut shutdown: watch::Receiver<bool>) {
        info!("starting single ingestion cycle");
        self.run_cycle(&mut shutdown).await;
    }

    async fn run_cycle(&self, shutdown: &mut watch::Receiver<bool>) -> CycleOutcome {
        let mut tasks = JoinSet::new();
        for generator in &self.generators {
            let generator = Arc::clone(generator);
            let queue = self.queue.clone();
            tasks.spawn(async move {
                let name = generator.name();
                (name, generator.run(&queue).await)
            });
        }

        let mut outcome = CycleOutcome::Finished;
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("shutdown during cycle; cancelling generators");
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    return CycleOutcome::Interrupted;
                }
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok((name, Ok(())))) => {
                        debug!(generator = name, "generator finished");
                    }
                    Some(Ok((name, Err(generator_error)))) => {
                        // Isolated: siblings keep running.
                        error!(generator = name, %generator_error, "generator failed");
                        outcome = CycleOutcome::Failed;
                    }
                    Some(Err(join_error)) => {
                        error!(%join_error, "generator panicked");
                    }
                },
            }
        }
        outcome
    }
}
