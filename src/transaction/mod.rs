//! Income and expense records of a store.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its table
//! - Filtering a month's transactions for the list and the master report
//! - View handlers and endpoints for listing, creating, editing and deleting them

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod filter;
mod form;
mod transactions_page;

pub use core::{Transaction, TransactionType, create_transaction_table, editable_transaction};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use filter::{TransactionQuery, filter_form};
pub use transactions_page::{
    TransactionTableRow, get_transactions_page, net_total_view, transactions_table,
};
