use super::source::TileSource;
use crate::core::geo::TileCoord;
use crate::http::HTTP_CLIENT;
use crate::prelude::{HashMap, HashSet};
use crate::{MapError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

const MAX_ATTEMPTS: usize = 2;
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Wait after the first failed download of a tile; doubles with every further failure
pub const FAILURE_BACKOFF: Duration = Duration::from_secs(30);
const MAX_FAILURE_BACKOFF: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy)]
struct Failure {
    count: u32,
    retry_at: Instant,
}

type FailureMap = Arc<Mutex<HashMap<TileCoord, Failure>>>;

/// Fetches tiles on the tokio runtime and reports the bytes back over a channel.
///
/// The loader is created from UI code that may not run inside the runtime, so
/// it captures a runtime handle at construction. Without one, downloads are
/// skipped and the layer simply shows no imagery.
///
/// A tile that could not be fetched is not requested again until its backoff
/// has passed.
pub struct TileLoader {
    tx: Sender<(TileCoord, Vec<u8>)>,
    rx: Receiver<(TileCoord, Vec<u8>)>,
    in_flight: Arc<Mutex<HashSet<TileCoord>>>,
    failed: FailureMap,
    runtime: Option<Handle>,
    timeout: Duration,
    backoff: Duration,
}

impl TileLoader {
    pub fn new(timeout: Duration) -> Self {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            log::warn!("no tokio runtime available, tiles will not be downloaded");
        }
        Self::with_runtime(runtime, timeout)
    }

    pub fn with_runtime(runtime: Option<Handle>, timeout: Duration) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            tx,
            rx,
            in_flight: Arc::new(Mutex::new(HashSet::default())),
            failed: Arc::new(Mutex::new(HashMap::default())),
            runtime,
            timeout,
            backoff: FAILURE_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Start downloading the specified tile unless it is pending or backing off.
    /// Returns whether a download was started.
    pub fn start_download(&self, source: &dyn TileSource, coord: TileCoord) -> bool {
        let Some(runtime) = &self.runtime else {
            return false;
        };
        if self.is_backing_off(&coord) {
            return false;
        }

        match self.in_flight.lock() {
            Ok(mut pending) => {
                if !pending.insert(coord) {
                    return false;
                }
            }
            Err(_) => return false,
        }

        let url = source.url(coord);
        let tx = self.tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let failed = Arc::clone(&self.failed);
        let timeout = self.timeout;
        let backoff = self.backoff;

        runtime.spawn(async move {
            for attempt in 1..=MAX_ATTEMPTS {
                log::debug!("fetch tile {:?} attempt {}", coord, attempt);
                match fetch_tile(&url, timeout).await {
                    Ok(data) => {
                        log::debug!("downloaded tile {:?} ({} bytes)", coord, data.len());
                        if let Ok(mut failed) = failed.lock() {
                            failed.remove(&coord);
                        }
                        let _ = tx.send((coord, data));
                        break;
                    }
                    Err(e) => {
                        log::warn!(
                            "tile {:?} download failed on attempt {}: {}",
                            coord,
                            attempt,
                            e
                        );
                        if attempt == MAX_ATTEMPTS || is_client_error(&e) {
                            record_failure(&failed, coord, backoff);
                            break;
                        }
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
            if let Ok(mut pending) = in_flight.lock() {
                pending.remove(&coord);
            }
        });
        true
    }

    /// Drain every tile that finished downloading since the last call.
    pub fn drain_completed(&self) -> Vec<(TileCoord, Vec<u8>)> {
        self.rx.try_iter().collect()
    }

    pub fn is_pending(&self, coord: &TileCoord) -> bool {
        self.in_flight
            .lock()
            .map(|pending| pending.contains(coord))
            .unwrap_or(false)
    }

    pub fn is_backing_off(&self, coord: &TileCoord) -> bool {
        self.failed
            .lock()
            .ok()
            .and_then(|failed| failed.get(coord).map(|f| f.retry_at > Instant::now()))
            .unwrap_or(false)
    }

    /// Consecutive failed downloads of a tile
    pub fn failure_count(&self, coord: &TileCoord) -> u32 {
        self.failed
            .lock()
            .ok()
            .and_then(|failed| failed.get(coord).map(|f| f.count))
            .unwrap_or(0)
    }

    pub fn has_runtime(&self) -> bool {
        self.runtime.is_some()
    }
}

fn record_failure(failed: &Mutex<HashMap<TileCoord, Failure>>, coord: TileCoord, backoff: Duration) {
    let Ok(mut failed) = failed.lock() else {
        return;
    };
    let count = failed.get(&coord).map_or(1, |f| f.count.saturating_add(1));
    let delay = backoff
        .saturating_mul(1u32 << (count - 1).min(16))
        .min(MAX_FAILURE_BACKOFF.max(backoff));
    log::warn!("giving up on tile {:?} for {:?}", coord, delay);
    failed.insert(
        coord,
        Failure {
            count,
            retry_at: Instant::now() + delay,
        },
    );
}

/// 4xx answers will not change on a retry
fn is_client_error(error: &MapError) -> bool {
    match error {
        MapError::Network(e) => e.status().map_or(false, |s| s.is_client_error()),
        _ => false,
    }
}

async fn fetch_tile(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let resp = HTTP_CLIENT
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
