use std::time::Duration;

use jamii_shared::{NewListing, NewUser, Property, User};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::db::RecordStore;

/// A closure scheduled to run once after a delay on the tokio runtime.
///
/// Cancelling before the delay elapses means the closure never runs. Once
/// it has started it runs to completion.
#[derive(Debug)]
pub struct Deferred<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(delay: Duration, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work()
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// The closure's result, or `None` if the task was cancelled first.
    pub async fn wait(self) -> Option<T> {
        match self.handle.await {
            Ok(value) => Some(value),
            Err(err) if err.is_cancelled() => {
                debug!("deferred task cancelled");
                None
            }
            Err(err) => {
                warn!(error = %err, "deferred task panicked");
                None
            }
        }
    }
}

/// Record-store operations behind an artificial network delay, for showing
/// loading states.
#[derive(Clone)]
pub struct SimulatedNetwork {
    records: RecordStore,
    delay: Duration,
}

impl SimulatedNetwork {
    pub fn new(records: RecordStore, delay: Duration) -> Self {
        Self { records, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn login(&self, email: impl Into<String>) -> Deferred<Option<User>> {
        let records = self.records.clone();
        let email = email.into();
        Deferred::schedule(self.delay, move || records.login(&email))
    }

    pub fn register(&self, new_user: NewUser) -> Deferred<User> {
        let records = self.records.clone();
        Deferred::schedule(self.delay, move || records.register_user(new_user))
    }

    pub fn submit_listing(&self, owner: User, listing: NewListing) -> Deferred<Property> {
        let records = self.records.clone();
        Deferred::schedule(self.delay, move || records.create_listing(&owner, listing))
    }
}
