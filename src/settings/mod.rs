//! The settings shared by every store: cost centers with their subgroups, and payment methods.

mod cost_centers;
mod page;
mod payment_methods;

pub use cost_centers::{
    create_cost_center_endpoint, create_subgroup_endpoint, delete_cost_center_endpoint,
    delete_subgroup_endpoint, rename_cost_center_endpoint,
};
pub use page::get_settings_page;
pub use payment_methods::{
    create_payment_method_endpoint, delete_payment_method_endpoint,
    rename_payment_method_endpoint,
};

use serde::Deserialize;

/// The form for naming a cost center, subgroup or payment method.
#[derive(Debug, Clone, Deserialize)]
pub struct NameForm {
    pub name: String,
}
