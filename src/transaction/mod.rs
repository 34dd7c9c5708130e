//! The transactions table.
//!
//! This module contains:
//! - Route handlers for the transactions page and the fragment requested by the filter form
//! - Inline editing of the category and description of a transaction
//! - Sorting the table by date or amount
//! - HTML view functions for rendering the table

mod edit;
mod row;
mod sort;
mod transactions_page;
mod view;

pub use edit::{get_field_editor, update_transaction_field};
pub use transactions_page::{get_transactions_content, get_transactions_page};
