//! Sales on store credit and the down payment transactions linked to them.
//!
//! A sale with a positive down payment owns exactly one entry transaction.
//! Saving the sale creates, updates or removes that transaction to match, and
//! deleting the sale deletes it too.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod linkage;
mod list;

pub use core::{CreditSale, create_credit_sale_table};
pub use create::{create_credit_sale_endpoint, get_create_credit_sale_page};
pub use delete::delete_credit_sale_endpoint;
pub use edit::{edit_credit_sale_endpoint, get_edit_credit_sale_page};
pub use linkage::{CreditSaleForm, build_credit_sale};
pub use list::get_credit_sales_page;
