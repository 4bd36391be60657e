//! Sessions, log-in and log-out, and the role checks for protected pages.

mod cookie;
mod credentials;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod role;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use redirect::home_page;
pub use role::{require_master, require_store_user};
pub(super) use token::Token;

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;
