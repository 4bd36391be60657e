//! Validation helpers shared by the forms.

use crate::Error;

/// Trim `value` and reject it if nothing is left.
///
/// # Errors
///
/// Returns [Error::EmptyField] naming `field` if `value` is empty or whitespace.
pub fn required(value: &str, field: &'static str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::EmptyField(field))
    } else {
        Ok(value.to_owned())
    }
}

/// Reject negative or non-finite amounts.
pub fn non_negative(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::NegativeAmount)
    }
}
