//! Which pages and actions each role may use.

use crate::{Error, user::User};

/// Only the master account may manage users and see every store.
pub fn require_master(user: &User) -> Result<(), Error> {
    if user.is_master() {
        Ok(())
    } else {
        tracing::warn!("{} tried to use a master-only page", user.username);
        Err(Error::Forbidden)
    }
}

/// The bookkeeping pages belong to a store, which the master account does not have.
pub fn require_store_user(user: &User) -> Result<(), Error> {
    if user.is_master() {
        tracing::warn!("{} tried to use a store-only page", user.username);
        Err(Error::Forbidden)
    } else {
        Ok(())
    }
}
