// ── Polling coordinator ──
//
// Owns the shutter snapshot for one gateway. Refreshes run on a timer
// and on demand after commands; at most one `GetStates` is in flight and
// concurrent callers share its outcome.

mod commands;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use mediola_api::{GatewayClient, TransportConfig};

use crate::config::GatewayConfig;
use crate::convert::filter_shutters;
use crate::error::CoreError;
use crate::model::Shutter;
use crate::store::{ShutterStore, Snapshot};

pub use commands::{get_manufacturer, parse_position, supports_position};

/// Pending refresh requests beyond this are coalesced into the queued one.
const REFRESH_QUEUE_SIZE: usize = 1;

// ── RefreshState ─────────────────────────────────────────────────

/// Refresh activity observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

// ── Coordinator ──────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Create with
/// [`new`](Self::new), then call [`start`](Self::start) to perform the
/// first refresh and spawn the polling tasks.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: GatewayConfig,
    client: GatewayClient,
    store: ShutterStore,
    refresh_state: watch::Sender<RefreshState>,
    /// Serializes fetches and remembers the last outcome.
    refresh_slot: Mutex<RefreshSlot>,
    /// Generation of the last finished refresh, readable without the lock.
    completed: AtomicU64,
    refresh_tx: mpsc::Sender<()>,
    refresh_rx: Mutex<Option<mpsc::Receiver<()>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

struct RefreshSlot {
    generation: u64,
    outcome: Result<(), CoreError>,
}

impl Coordinator {
    /// Validate the configuration and build the HTTP client.
    /// Does NOT contact the gateway.
    pub fn new(config: GatewayConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = GatewayClient::new(
            &config.host,
            config.username.clone(),
            config.password.clone(),
            &transport,
        )?;
        Ok(Self::with_client(config, client))
    }

    /// Build a coordinator around an existing client.
    pub fn with_client(config: GatewayConfig, client: GatewayClient) -> Self {
        let (refresh_state, _) = watch::channel(RefreshState::Idle);
        let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_QUEUE_SIZE);

        Self {
            inner: Arc::new(CoordinatorInner {
                config,
                client,
                store: ShutterStore::new(),
                refresh_state,
                refresh_slot: Mutex::new(RefreshSlot {
                    generation: 0,
                    outcome: Ok(()),
                }),
                completed: AtomicU64::new(0),
                refresh_tx,
                refresh_rx: Mutex::new(Some(refresh_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &ShutterStore {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Perform the first refresh, then spawn the poll timer and the
    /// refresh worker.
    ///
    /// A failed first refresh is reported as [`CoreError::CannotConnect`]
    /// and no background task is started.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.initial_refresh().await?;

        let mut handles = self.inner.task_handles.lock().await;
        if let Some(rx) = self.inner.refresh_rx.lock().await.take() {
            handles.push(tokio::spawn(refresh_worker(self.clone(), rx)));
            handles.push(tokio::spawn(poll_timer(
                self.inner.refresh_tx.clone(),
                self.inner.config.scan_interval,
                self.inner.cancel.clone(),
            )));
        }

        info!(
            host = %self.inner.config.host,
            shutters = self.inner.store.snapshot().len(),
            interval_secs = self.inner.config.scan_interval.as_secs(),
            "coordinator started"
        );
        Ok(())
    }

    /// Stop background tasks and wait for them to exit.
    ///
    /// A fetch already in flight runs to completion first.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("coordinator stopped");
    }

    /// One-shot: refresh once, run closure, shut down.
    ///
    /// No background tasks are spawned, so post-command refresh requests
    /// stay queued and are dropped with the coordinator.
    pub async fn oneshot<F, Fut, T>(config: GatewayConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Coordinator) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let coordinator = Coordinator::new(config)?;
        coordinator.initial_refresh().await?;
        let result = f(coordinator.clone()).await;
        coordinator.shutdown().await;
        result
    }

    async fn initial_refresh(&self) -> Result<(), CoreError> {
        self.refresh().await.map_err(|e| CoreError::CannotConnect {
            host: self.inner.config.host.clone(),
            source: Box::new(e),
        })
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch all states and replace the snapshot.
    ///
    /// If another refresh is in flight, waits for it and returns its
    /// outcome instead of issuing a second request. On failure the
    /// previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let observed = self.inner.completed.load(Ordering::Acquire);
        let mut slot = self.inner.refresh_slot.lock().await;

        if slot.generation > observed {
            trace!(generation = slot.generation, "joined in-flight refresh");
            return slot.outcome.clone();
        }

        self.inner.refresh_state.send_replace(RefreshState::Refreshing);
        let outcome = self.fetch_and_apply().await;

        slot.generation += 1;
        slot.outcome = outcome.clone();
        self.inner.completed.store(slot.generation, Ordering::Release);
        self.inner.refresh_state.send_replace(RefreshState::Idle);

        outcome
    }

    async fn fetch_and_apply(&self) -> Result<(), CoreError> {
        let raw = match self.inner.client.get_states().await {
            Ok(raw) => raw,
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "refresh failed, keeping previous snapshot");
                return Err(err);
            }
        };

        let snapshot = self.inner.store.replace(filter_shutters(raw));
        debug!(
            version = snapshot.version,
            shutters = snapshot.len(),
            "refresh complete"
        );
        Ok(())
    }

    /// Queue a refresh for the background worker without waiting.
    ///
    /// Requests made while one is already queued are merged into it.
    pub fn request_refresh(&self) {
        match self.inner.refresh_tx.try_send(()) {
            Ok(()) => trace!("refresh requested"),
            Err(TrySendError::Full(())) => trace!("refresh already queued"),
            Err(TrySendError::Closed(())) => debug!("refresh worker stopped, request dropped"),
        }
    }

    // ── State observation ────────────────────────────────────────

    /// Cached shutter list from the last successful refresh.
    pub fn get_states(&self) -> Vec<Shutter> {
        self.inner.store.snapshot().shutters.clone()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.store.snapshot()
    }

    pub fn shutter(&self, sid: &str) -> Option<Shutter> {
        self.inner.store.shutter(sid)
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.inner.store.subscribe()
    }

    /// Subscribe to refresh activity.
    pub fn refresh_state(&self) -> watch::Receiver<RefreshState> {
        self.inner.refresh_state.subscribe()
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Drain the refresh queue, one refresh per request.
///
/// Cancellation is only checked between refreshes so an in-flight fetch
/// is never abandoned.
async fn refresh_worker(coordinator: Coordinator, mut rx: mpsc::Receiver<()>) {
    let cancel = coordinator.inner.cancel.clone();

    loop {
        let request = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            request = rx.recv() => request,
        };
        if request.is_none() {
            break;
        }

        if let Err(e) = coordinator.refresh().await {
            warn!(error = %e, "queued refresh failed");
        }
    }
}

/// Enqueue a refresh every `interval`.
async fn poll_timer(tx: mpsc::Sender<()>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if tx.try_send(()).is_err() {
                    trace!("poll tick coalesced");
                }
            }
        }
    }
}
