//! User accounts: the model, the master's user administration and each user's profile.

mod active_endpoint;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod profile;
mod users_page;

pub use active_endpoint::toggle_user_active_endpoint;
pub use core::{MASTER_USER_ID, Role, User, create_user_table};
pub use create_endpoint::create_user_endpoint;
pub use delete_endpoint::delete_user_endpoint;
pub use profile::{get_profile_page, update_profile_endpoint};
pub use users_page::get_users_page;
