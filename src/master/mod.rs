//! The master panel: every store's month at a glance and a report per store.

mod page;
mod stores_table;

pub use page::{StoreQuery, get_master_page};
