//! Filter state shared by the dashboard and transactions pages.
//!
//! The [FilterStore] owns the active [FilterState], keeps the address bar in
//! step with it through a [History] and notifies subscribers of each change.

mod controls;
mod defaults;
mod event;
mod history;
mod query;
mod state;
mod store;

pub use controls::{FILTER_FORM_ID, FilterTargets, filter_controls};
pub use defaults::{dates_for_mode, initial_state, range_defaults, ym_defaults};
pub use event::{DATE_MODE_CONTROL, FilterEvent, RESET_CONTROL, rewrites_controls};
#[cfg(test)]
pub use history::MemoryHistory;
pub use history::{History, HistoryUpdate, ResponseHistory, url_for};
pub use query::{FilterParams, NO_TYPES_SENTINEL, RECOGNIZED_PARAMS, decode, encode};
pub use state::{DateMode, FilterState, TransactionType, TypeSelection};
pub use store::{FilterSnapshot, FilterStore, StoreOptions, Subscription};
