//! Checks a username and password against the registered users.

use crate::{Error, user::User};

/// Find the user with `username` and `password`.
///
/// Usernames and passwords are compared exactly as entered.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if no user matches, or
/// [Error::InactiveAccount] if the matching user has been deactivated.
pub fn authenticate<'a>(
    users: &'a [User],
    username: &str,
    password: &str,
) -> Result<&'a User, Error> {
    let user = users
        .iter()
        .find(|user| user.username == username && user.password == password)
        .ok_or(Error::InvalidCredentials)?;

    if !user.active {
        return Err(Error::InactiveAccount);
    }

    Ok(user)
}
