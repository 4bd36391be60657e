//! The ways a store is paid or pays, e.g. cash or Pix.

mod core;

pub use core::{PaymentMethod, create_payment_method_table};
