use crate::clock::{SessionClock, TimeSource};
use crate::errors::AppError;
use crate::storage::KvStore;
use crate::tracker::Tracker;
use chrono::NaiveDateTime;
use std::{path::Path, sync::Arc};
use tokio::sync::{Mutex, MutexGuard};

pub struct Inner {
    pub tracker: Tracker,
    pub store: KvStore,
}

#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<Mutex<Inner>>,
    pub clock: Arc<SessionClock>,
}

impl AppState {
    pub fn new(store: KvStore, time: TimeSource) -> Self {
        let clock = SessionClock::new(time);
        let tracker = Tracker::load(&store, clock.now());
        clock.restart(tracker.ledger.running());
        Self {
            inner: Arc::new(Mutex::new(Inner { tracker, store })),
            clock: Arc::new(clock),
        }
    }

    /// Loads the store file and writes back whatever the load rolled over.
    pub async fn open(path: &Path, time: TimeSource) -> Result<Self, AppError> {
        let state = Self::new(KvStore::open(path).await, time);
        state.inner.lock().await.persist().await?;
        Ok(state)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Locks the state and runs the day-transition bookkeeping, persisting
    /// it when a day boundary was crossed.
    pub async fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        let mut inner = self.inner.lock().await;
        if inner.tracker.observe(self.now()) {
            inner.persist().await?;
        }
        Ok(inner)
    }
}

impl Inner {
    /// Writes every key back and flushes the store file.
    pub async fn persist(&mut self) -> Result<(), AppError> {
        self.tracker.save(&mut self.store)?;
        self.store.flush().await
    }
}
