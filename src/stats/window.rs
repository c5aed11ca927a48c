//! Calendar month windows for the dashboard.

use serde::Serialize;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

/// The first and last day of a calendar month, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    /// The first day of the month.
    pub start: Date,
    /// The last day of the month.
    pub end: Date,
}

impl MonthWindow {
    /// The month that `date` falls in.
    pub fn containing(date: Date) -> Self {
        let start = date - Duration::days(i64::from(date.day()) - 1);
        let length = date.month().length(date.year());
        let end = start + Duration::days(i64::from(length) - 1);

        Self { start, end }
    }

    /// The month before this one, wrapping into the previous year after January.
    pub fn previous(&self) -> Self {
        Self::containing(self.start - Duration::days(1))
    }

    /// The instants the month starts and ends at in a timezone `offset` from
    /// UTC, converted to UTC.
    ///
    /// The start is inclusive and the end is exclusive, i.e. the end is
    /// midnight at the start of the following month.
    pub fn utc_bounds(&self, offset: UtcOffset) -> (OffsetDateTime, OffsetDateTime) {
        let start = self.start.midnight().assume_offset(offset);
        let end = (self.end + Duration::days(1)).midnight().assume_offset(offset);

        (start.to_offset(UtcOffset::UTC), end.to_offset(UtcOffset::UTC))
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}
