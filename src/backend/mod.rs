//! Access to the external transactions backend.

mod client;
mod transaction;

pub use client::{
    BackendClient, FetchProblem, FetchResult, TRANSACTIONS_PATH, TransactionSource,
    UPDATE_TRANSACTION_PATH, UpdateOutcome,
};
pub use transaction::{EditableField, Transaction, TransactionPatch};
