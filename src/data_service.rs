use crate::{cities_matching, closest_station, networks_in, Error, Gateway, Network, Station};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    Idle,
    Fetching,
    Success,
    Failed(Error),
    /// The fetch was dropped before it finished.
    Cancelled,
}

/// Latest value of a collection together with the status of the most recent fetch. A failed or
/// cancelled fetch leaves `value` as it was.
#[derive(Debug)]
pub struct Published<T> {
    pub value: Arc<T>,
    pub status: FetchStatus,
}

impl<T> Clone for Published<T> {
    fn clone(&self) -> Self {
        Published {
            value: self.value.clone(),
            status: self.status.clone(),
        }
    }
}

impl<T: Default> Default for Published<T> {
    fn default() -> Self {
        Published {
            value: Arc::new(T::default()),
            status: FetchStatus::Idle,
        }
    }
}

/// One published collection. Requests are numbered so that only the latest may publish.
struct Slot<T> {
    sender: watch::Sender<Published<T>>,
    latest: AtomicU64,
}

impl<T: Default> Slot<T> {
    fn new() -> Self {
        let (sender, _) = watch::channel(Published::default());
        Slot {
            sender,
            latest: AtomicU64::new(0),
        }
    }

    fn value(&self) -> Arc<T> {
        self.sender.borrow().value.clone()
    }
}

fn begin<T>(slot: &Arc<Slot<T>>) -> Pending<T> {
    let seq = slot.latest.fetch_add(1, Ordering::SeqCst) + 1;
    slot.sender.send_modify(|p| p.status = FetchStatus::Fetching);
    Pending {
        slot: slot.clone(),
        seq,
        settled: false,
    }
}

/// An unfinished fetch. Marks the slot cancelled if dropped before it settles.
struct Pending<T> {
    slot: Arc<Slot<T>>,
    seq: u64,
    settled: bool,
}

impl<T> Pending<T> {
    /// Only meaningful while holding the channel's write lock, since `begin` bumps `latest`
    /// before taking it.
    fn is_current(&self) -> bool {
        self.slot.latest.load(Ordering::SeqCst) == self.seq
    }

    fn settle(mut self, result: Result<T, Error>) -> Result<Arc<T>, Error> {
        self.settled = true;
        let result = result.map(Arc::new);
        let published = self.slot.sender.send_if_modified(|p| {
            if !self.is_current() {
                return false;
            }
            match &result {
                Ok(value) => {
                    p.value = value.clone();
                    p.status = FetchStatus::Success;
                }
                Err(err) => p.status = FetchStatus::Failed(err.clone()),
            }
            true
        });
        if !published {
            trace!(seq = self.seq, "superseded, not publishing");
        }
        result
    }
}

impl<T> Drop for Pending<T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let seq = self.seq;
        let latest = &self.slot.latest;
        self.slot.sender.send_if_modified(|p| {
            if latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            p.status = FetchStatus::Cancelled;
            true
        });
    }
}

struct Inner {
    gateway: Gateway,
    networks: Arc<Slot<Vec<Network>>>,
    stations: Arc<Slot<Vec<Station>>>,
}

/// Fetches networks and stations and publishes them to subscribers.
///
/// Cloning is cheap; clones share the same published state.
#[derive(Clone)]
pub struct DataService {
    inner: Arc<Inner>,
}

impl DataService {
    pub fn new(gateway: Gateway) -> Self {
        DataService {
            inner: Arc::new(Inner {
                gateway,
                networks: Arc::new(Slot::new()),
                stations: Arc::new(Slot::new()),
            }),
        }
    }

    pub fn subscribe_networks(&self) -> watch::Receiver<Published<Vec<Network>>> {
        self.inner.networks.sender.subscribe()
    }

    pub fn subscribe_stations(&self) -> watch::Receiver<Published<Vec<Station>>> {
        self.inner.stations.sender.subscribe()
    }

    pub fn networks(&self) -> Arc<Vec<Network>> {
        self.inner.networks.value()
    }

    pub fn stations(&self) -> Arc<Vec<Station>> {
        self.inner.stations.value()
    }

    /// Fetches all networks, replacing the published list on success.
    pub async fn fetch_networks(&self) -> Result<Arc<Vec<Network>>, Error> {
        let pending = begin(&self.inner.networks);
        self.run_networks(pending).await
    }

    /// Fetches the stations of `network_id`, replacing the published list on success. A result
    /// is dropped if another station fetch was started in the meantime.
    pub async fn fetch_stations(&self, network_id: &str) -> Result<Arc<Vec<Station>>, Error> {
        let pending = begin(&self.inner.stations);
        self.run_stations(pending, network_id).await
    }

    async fn run_networks(
        &self,
        pending: Pending<Vec<Network>>,
    ) -> Result<Arc<Vec<Network>>, Error> {
        let result = self.inner.gateway.get_networks().await;
        if let Err(err) = &result {
            warn!("Failed to fetch networks: {}", err);
        }
        pending.settle(result)
    }

    async fn run_stations(
        &self,
        pending: Pending<Vec<Station>>,
        network_id: &str,
    ) -> Result<Arc<Vec<Station>>, Error> {
        let result = self.inner.gateway.get_stations(network_id).await;
        if let Err(err) = &result {
            warn!("Failed to fetch stations of {}: {}", network_id, err);
        }
        pending.settle(result)
    }

    /// Runs [`fetch_networks`](Self::fetch_networks) on the runtime. Dropping the handle
    /// cancels it.
    pub fn spawn_fetch_networks(&self) -> FetchHandle<Vec<Network>> {
        let service = self.clone();
        let pending = begin(&self.inner.networks);
        debug!(seq = pending.seq, "spawning network fetch");

        let handle = tokio::spawn(async move { service.run_networks(pending).await });
        FetchHandle {
            handle: Some(handle),
        }
    }

    /// Runs [`fetch_stations`](Self::fetch_stations) on the runtime. The request supersedes
    /// earlier station fetches as soon as this returns. Dropping the handle cancels it.
    pub fn spawn_fetch_stations(&self, network_id: &str) -> FetchHandle<Vec<Station>> {
        let service = self.clone();
        let network_id = network_id.to_string();
        let pending = begin(&self.inner.stations);
        debug!(%network_id, seq = pending.seq, "spawning station fetch");

        let handle =
            tokio::spawn(async move { service.run_stations(pending, &network_id).await });
        FetchHandle {
            handle: Some(handle),
        }
    }

    pub fn cities_matching(&self, query: &str) -> Vec<String> {
        cities_matching(&self.networks(), query)
    }

    pub fn networks_in(&self, city: &str) -> Vec<Network> {
        networks_in(&self.networks(), city)
    }

    pub fn closest_station(&self, latitude: f64, longitude: f64) -> Option<(Station, f64)> {
        closest_station(&self.stations(), latitude, longitude)
    }
}

/// A spawned fetch, aborted when dropped.
pub struct FetchHandle<T> {
    handle: Option<JoinHandle<Result<Arc<T>, Error>>>,
}

impl<T> FetchHandle<T> {
    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Waits for the fetch. Returns `None` if it was cancelled or panicked.
    pub async fn finished(mut self) -> Option<Result<Arc<T>, Error>> {
        let handle = self.handle.take()?;
        match handle.await {
            Ok(result) => Some(result),
            Err(err) => {
                warn!("Fetch did not finish: {}", err);
                None
            }
        }
    }
}

impl<T> Drop for FetchHandle<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
