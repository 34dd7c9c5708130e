//! Fetches transactions whenever the filters change, keeping only the newest result.
//!
//! Each change aborts the fetch started for the previous change. Results are
//! tagged with the store revision that requested them and a result is never
//! published after one for a newer revision.

use std::sync::Arc;

use tokio::{
    sync::watch,
    task::{JoinHandle, JoinSet},
};

use crate::{
    backend::{FetchResult, TransactionSource},
    filter::Subscription,
};

/// The result of the fetch for one store revision.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// The store revision the fetch was made for.
    pub revision: u64,
    /// The query string the fetch was made with.
    pub query: String,
    /// What the backend returned.
    pub result: FetchResult,
}

/// A background task that refetches on every filter change.
///
/// Dropping the handle stops the task and any fetch in flight.
#[derive(Debug)]
pub struct LatestFetch {
    results: watch::Receiver<Option<FetchOutcome>>,
    task: JoinHandle<()>,
}

impl LatestFetch {
    /// Start fetching for `subscription`.
    ///
    /// The subscription's current snapshot is fetched straight away.
    pub fn spawn<S>(mut subscription: Subscription, source: S) -> Self
    where
        S: TransactionSource + Clone + Send + Sync + 'static,
    {
        let (sender, results) = watch::channel(None);
        let sender = Arc::new(sender);
        subscription.mark_changed();

        let task = tokio::spawn(async move {
            let mut in_flight = JoinSet::new();

            while let Some(snapshot) = subscription.changed().await {
                tracing::debug!("fetching transactions for revision {}", snapshot.revision);
                // Dropping the set aborts the superseded fetch.
                in_flight = JoinSet::new();

                let source = source.clone();
                let sender = Arc::clone(&sender);

                in_flight.spawn(async move {
                    let result = source.fetch_transactions(&snapshot.query).await;

                    sender.send_if_modified(|latest: &mut Option<FetchOutcome>| {
                        let is_stale = latest
                            .as_ref()
                            .is_some_and(|outcome: &FetchOutcome| {
                                outcome.revision > snapshot.revision
                            });

                        if is_stale {
                            tracing::debug!(
                                "dropping stale result for revision {}",
                                snapshot.revision
                            );
                            return false;
                        }

                        *latest = Some(FetchOutcome {
                            revision: snapshot.revision,
                            query: snapshot.query,
                            result,
                        });
                        true
                    });
                });
            }
        });

        Self { results, task }
    }

    /// Wait for the result of `revision` or a newer one.
    ///
    /// Returns `None` if the store was disposed before such a result arrived.
    pub async fn wait_for(&self, revision: u64) -> Option<FetchOutcome> {
        let mut results = self.results.clone();

        results
            .wait_for(|latest| {
                latest
                    .as_ref()
                    .is_some_and(|outcome| outcome.revision >= revision)
            })
            .await
            .ok()
            .and_then(|latest| latest.clone())
    }

    /// The newest result published so far.
    #[cfg(test)]
    pub fn latest(&self) -> Option<FetchOutcome> {
        self.results.borrow().clone()
    }
}

impl Drop for LatestFetch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
