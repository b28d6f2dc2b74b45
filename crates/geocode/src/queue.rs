//! Serial, rate-limited geocoding.
//!
//! Requests go through a bounded channel to a single worker task, so at most
//! one lookup is in flight and dispatches are at least `delay` apart.

use std::sync::Arc;
use std::time::Duration;

use foundation::LatLng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::provider::Geocoder;

struct Job {
    place: String,
    reply: oneshot::Sender<Option<LatLng>>,
}

/// Handle to the geocoding worker. Dropping it closes the channel; the worker
/// finishes the job it is on and exits.
#[derive(Debug)]
pub struct GeocodeQueue {
    tx: mpsc::Sender<Job>,
    worker: JoinHandle<()>,
}

impl GeocodeQueue {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(
        cache: Arc<SharedCache>,
        geocoder: Arc<dyn Geocoder>,
        delay: Duration,
        capacity: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(rx, cache, geocoder, delay));
        Self { tx, worker }
    }

    /// Queues `place` and waits for its turn. `None` covers no match, a failed
    /// request and a stopped worker alike.
    pub async fn submit(&self, place: impl Into<String>) -> Option<LatLng> {
        let (reply, rx) = oneshot::channel();
        let job = Job {
            place: place.into(),
            reply,
        };
        if self.tx.send(job).await.is_err() {
            warn!("geocode worker stopped; dropping request");
            return None;
        }
        rx.await.ok().flatten()
    }

    /// Closes the queue and waits for queued jobs to drain.
    pub async fn shutdown(self) {
        let Self { tx, worker } = self;
        drop(tx);
        if let Err(e) = worker.await {
            warn!("geocode worker ended abnormally: {e}");
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<Job>,
    cache: Arc<SharedCache>,
    geocoder: Arc<dyn Geocoder>,
    delay: Duration,
) {
    while let Some(job) = rx.recv().await {
        // An earlier job may have resolved the same place.
        if let Some(coords) = cache.fresh(&job.place) {
            let _ = job.reply.send(Some(coords));
            continue;
        }

        tokio::time::sleep(delay).await;
        debug!(place = %job.place, "geocode dispatch");
        let result = match geocoder.lookup(&job.place).await {
            Ok(Some(coords)) => {
                cache.record(&job.place, coords);
                Some(coords)
            }
            Ok(None) => {
                debug!(place = %job.place, "no geocode match");
                None
            }
            Err(e) => {
                warn!(place = %job.place, "geocoding failed: {e}");
                None
            }
        };
        // The caller may have gone away; the result is cached regardless.
        let _ = job.reply.send(result);

        tokio::time::sleep(delay).await;
    }
    debug!("geocode queue closed");
}
