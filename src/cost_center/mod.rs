//! Cost centers and their subgroups, used to classify transactions.

mod core;

pub use core::{CostCenter, Subgroup, create_cost_center_table};
