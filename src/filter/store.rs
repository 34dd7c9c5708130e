//! The filter store: the single source of truth for the active filters.
//!
//! A store is created per consumer. Its lifecycle is
//! [FilterStore::new], [FilterStore::initialize], any number of
//! [FilterStore::subscribe] calls and finally [FilterStore::dispose].

use time::Date;
use tokio::sync::watch;

use crate::Error;

use super::{
    defaults::initial_state,
    event::FilterEvent,
    history::History,
    query::{decode, encode},
    state::FilterState,
};

/// Options passed to [FilterStore::initialize].
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Whether the store writes to and restores from the history.
    pub sync_url: bool,
}

/// The state published to subscribers after each change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSnapshot {
    /// The store revision that produced this snapshot.
    pub revision: u64,
    /// The filter values.
    pub values: FilterState,
    /// The query string for the values.
    pub query: String,
}

/// A subscription to store changes.
///
/// Dropping the subscription unsubscribes it.
#[derive(Debug, Clone)]
pub struct Subscription {
    receiver: watch::Receiver<FilterSnapshot>,
}

impl Subscription {
    /// The latest snapshot, whether or not it has been seen.
    pub fn current(&self) -> FilterSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next unseen snapshot.
    ///
    /// Returns `None` once the store has been disposed.
    pub async fn changed(&mut self) -> Option<FilterSnapshot> {
        self.receiver.changed().await.ok()?;

        Some(self.receiver.borrow_and_update().clone())
    }

    /// Mark the current snapshot as unseen so that the next call to
    /// [Subscription::changed] returns it immediately.
    pub(crate) fn mark_changed(&mut self) {
        self.receiver.mark_changed();
    }
}

/// Owns the [FilterState] and keeps the history in step with it.
#[derive(Debug)]
pub struct FilterStore<H> {
    history: H,
    today: Date,
    values: FilterState,
    revision: u64,
    sync_url: bool,
    sender: Option<watch::Sender<FilterSnapshot>>,
}

impl<H: History> FilterStore<H> {
    /// Create a store over `history`. `today` is the local date used for defaults.
    ///
    /// The store holds the default state until [FilterStore::initialize] is called.
    pub fn new(history: H, today: Date) -> Self {
        let values = initial_state(today);
        let snapshot = FilterSnapshot {
            revision: 0,
            query: encode(&values),
            values: values.clone(),
        };
        let (sender, _) = watch::channel(snapshot);

        Self {
            history,
            today,
            values,
            revision: 0,
            sync_url: false,
            sender: Some(sender),
        }
    }

    /// Load the state from the current location, or from the defaults if the
    /// location carries no filter parameters.
    ///
    /// When `options.sync_url` is set, the current history entry is replaced
    /// with the canonical query string.
    pub fn initialize(&mut self, options: StoreOptions) {
        self.sync_url = options.sync_url;
        self.values = self.values_from_location();

        if self.sync_url {
            let query = encode(&self.values);
            self.history.replace(&query);
        }

        tracing::debug!("filter store initialized with {:?}", self.values);
        self.notify();
    }

    /// Subscribe to changes.
    ///
    /// # Errors
    /// Returns [Error::StoreDisposed] if the store has been disposed.
    pub fn subscribe(&self) -> Result<Subscription, Error> {
        self.sender
            .as_ref()
            .map(|sender| Subscription {
                receiver: sender.subscribe(),
            })
            .ok_or(Error::StoreDisposed)
    }

    /// The query string for the current state.
    ///
    /// Falls back to the location's query string if the state encodes to nothing.
    pub fn get_query_string(&self) -> String {
        let query = encode(&self.values);

        if query.is_empty() {
            self.history.query().to_owned()
        } else {
            query
        }
    }

    /// A copy of the current state.
    pub fn get_values(&self) -> FilterState {
        self.values.clone()
    }

    /// The number of changes made so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The history this store writes to.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access to the history, e.g. for navigating back and forward.
    #[cfg(test)]
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Replace the state with `values`, push a history entry and notify subscribers.
    pub fn apply(&mut self, values: FilterState) {
        self.values = values;

        if self.sync_url {
            let query = encode(&self.values);
            self.history.push(&query);
        }

        self.notify();
    }

    /// Reduce `event` into a new state and [apply](FilterStore::apply) it.
    pub fn dispatch(&mut self, event: FilterEvent) {
        tracing::debug!("dispatching {event:?}");
        let values = event.reduce(self.today);
        self.apply(values);
    }

    /// Reload the state from the current location after a back or forward
    /// navigation. Does nothing unless URL sync is enabled.
    pub fn restore_from_location(&mut self) {
        if !self.sync_url {
            return;
        }

        self.values = self.values_from_location();
        let query = encode(&self.values);
        self.history.replace(&query);
        self.notify();
    }

    /// Close the store. Subscribers see the end of their subscription.
    pub fn dispose(&mut self) {
        self.sender = None;
    }

    fn values_from_location(&self) -> FilterState {
        decode(self.history.query()).unwrap_or_else(|| initial_state(self.today))
    }

    fn notify(&mut self) {
        self.revision += 1;

        let Some(sender) = &self.sender else {
            return;
        };

        sender.send_replace(FilterSnapshot {
            revision: self.revision,
            values: self.values.clone(),
            query: self.get_query_string(),
        });
    }
}
