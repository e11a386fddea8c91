//! Fixed-interval driver for the ingest job.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use scenelog_capture::FrameSource;
use scenelog_describer::SceneDescriber;
use scenelog_store::ScenePersistence;

use crate::services::ingest::IngestJob;

/// Drives [`IngestJob`] once per fixed interval until shut down.
///
/// At most one tick executes at a time: the job is awaited inside the
/// timer loop and missed ticks are skipped, never queued or run in
/// parallel. A hung describer call therefore delays the next tick instead
/// of piling up concurrent work. A failed tick is logged and the cadence
/// continues; there is no backoff.
pub struct Scheduler<S, D, P> {
    job: IngestJob<S, D, P>,
    tick_interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl<S, D, P> Scheduler<S, D, P>
where
    S: FrameSource,
    D: SceneDescriber,
    P: ScenePersistence,
{
    pub fn new(
        job: IngestJob<S, D, P>,
        tick_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            job,
            tick_interval,
            shutdown,
        }
    }

    /// Run until the shutdown signal fires. An in-flight tick finishes
    /// naturally; only the timer stops.
    pub async fn run(mut self) {
        info!(interval = ?self.tick_interval, "starting ingest scheduler");

        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // Biased so a pending shutdown wins over an overdue tick.
            tokio::select! {
                biased;

                _ = self.shutdown.changed() => {
                    info!("ingest scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.job.run().await {
                        Ok(record) => {
                            debug!(captured_at = %record.captured_at, "ingest tick complete");
                        }
                        Err(e) => error!("ingest tick failed: {e}"),
                    }
                }
            }
        }
    }
}
