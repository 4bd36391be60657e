//! The month bucket that transactions and credit sales are filed under.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime, UtcOffset};

use crate::Error;

/// A month in the format `YYYY-MM`, e.g. "2024-05".
///
/// Records carry the month that was selected in the UI when they were saved,
/// which is not necessarily the month of their date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthRef(String);

impl MonthRef {
    /// Parse a month reference from text.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMonth] if `text` is not a four digit year and a
    /// two digit month between 01 and 12 separated by a dash.
    pub fn new(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonth(text.to_owned());

        let (year, month) = text.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u8 = month.parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self(text.to_owned()))
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self(format!("{:04}-{:02}", date.year(), u8::from(date.month())))
    }

    /// The current month at the UTC offset `local_offset`.
    pub fn current(local_offset: UtcOffset) -> Self {
        Self::from_date(OffsetDateTime::now_utc().to_offset(local_offset).date())
    }

    /// Parse an optional month from a query string, falling back to the
    /// current month when it is missing or malformed.
    pub fn from_query(text: Option<&str>, local_offset: UtcOffset) -> Self {
        match text.filter(|text| !text.is_empty()) {
            None => Self::current(local_offset),
            Some(text) => Self::new(text).unwrap_or_else(|error| {
                tracing::warn!("{error}, falling back to the current month");
                Self::current(local_offset)
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.0[..4].parse().unwrap_or_default()
    }

    pub fn month(&self) -> Month {
        self.0[5..]
            .parse::<u8>()
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .unwrap_or(Month::January)
    }

    /// The twelve months of this month's year, January first.
    pub fn months_of_year(&self) -> Vec<MonthRef> {
        let year = self.year();

        (1..=12)
            .map(|month| Self(format!("{year:04}-{month:02}")))
            .collect()
    }

    /// A human readable label, e.g. "May 2024".
    pub fn label(&self) -> String {
        format!("{} {}", self.month(), self.year())
    }
}

impl TryFrom<String> for MonthRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<MonthRef> for String {
    fn from(value: MonthRef) -> Self {
        value.0
    }
}

impl Display for MonthRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append the selected month to `path` as the query parameter `month`.
pub fn with_month(path: &str, month: &MonthRef) -> String {
    match serde_urlencoded::to_string([("month", month.as_str())]) {
        Ok(query) => format!("{path}?{query}"),
        Err(error) => {
            tracing::error!("could not encode month query parameter: {error}");
            path.to_owned()
        }
    }
}
