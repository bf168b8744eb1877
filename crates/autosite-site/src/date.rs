//! Publication dates encoded in page paths.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A rough point in time: the year and month a page was published.
///
/// `Date::default()` (year 0) means the page has no date. It orders before
/// every dated page, and `Date.Year` is falsy in templates.
///
/// Templates see `Date.Year` as a number and `Date.Month` as the English
/// month name (`March`), empty when absent.
///
/// Field order matters: the derived ordering compares year, then month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    /// Year, or 0 when absent.
    pub year: u32,
    /// Month in 1..=12, or 0 when absent.
    pub month: u8,
}

impl Date {
    /// Create a date from a year and a month.
    #[must_use]
    pub const fn new(year: u32, month: u8) -> Self {
        Self { year, month }
    }

    /// Whether this date was encoded in the page path.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.year != 0
    }

    /// Whether this date is before `other`.
    #[must_use]
    pub fn before(&self, other: &Self) -> bool {
        self < other
    }

    /// English month name, if the month is set.
    #[must_use]
    pub fn month_name(&self) -> Option<&'static str> {
        usize::from(self.month)
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i))
            .copied()
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Date", 2)?;
        state.serialize_field("Year", &self.year)?;
        state.serialize_field("Month", self.month_name().unwrap_or_default())?;
        state.end()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month_name() {
            Some(month) => write!(f, "{}, {month}", self.year),
            None => write!(f, "{}", self.year),
        }
    }
}
