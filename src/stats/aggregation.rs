//! Per-month aggregates that feed the dashboard.
//!
//! Timestamps are stored in UTC. A record belongs to the month its creation
//! time falls in once shifted to the dashboard's local offset.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use time::UtcOffset;

use crate::{Error, money::decimal_from_row, stats::MonthWindow, transaction::RentalStatus};

/// The status whose transactions count towards revenue.
pub const REVENUE_STATUS: RentalStatus = RentalStatus::Completed;

/// The number of completed transactions in a month and what they earned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    /// How many completed transactions were booked.
    pub count: u64,
    /// The sum of their total prices.
    pub revenue: Decimal,
}

/// Count the listings created inside `window`, a month in the timezone
/// `offset` from UTC.
///
/// Trashed listings are still counted, they were created in that month all
/// the same.
pub fn count_listings_created(
    window: MonthWindow,
    offset: UtcOffset,
    connection: &Connection,
) -> Result<u64, Error> {
    let (start, end) = window.utc_bounds(offset);

    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM listing
        WHERE datetime(created_at) >= datetime(?1) AND datetime(created_at) < datetime(?2)",
        params![start, end],
        |row| row.get(0),
    )?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Count and sum the completed transactions booked inside `window`, a month
/// in the timezone `offset` from UTC.
///
/// # Errors
/// Returns [Error::AmountOverflow] if the revenue is too large to add up, or
/// [Error::SqlError] if the query fails.
pub fn completed_transaction_totals(
    window: MonthWindow,
    offset: UtcOffset,
    connection: &Connection,
) -> Result<PeriodTotals, Error> {
    let (start, end) = window.utc_bounds(offset);
    let mut statement = connection.prepare(
        "SELECT total_price FROM \"transaction\"
        WHERE status = ?1
            AND datetime(created_at) >= datetime(?2) AND datetime(created_at) < datetime(?3)",
    )?;

    let prices = statement.query_map(params![REVENUE_STATUS, start, end], |row| {
        decimal_from_row(row, 0)
    })?;

    let mut totals = PeriodTotals::default();

    for price in prices {
        totals.count += 1;
        totals.revenue = totals
            .revenue
            .checked_add(price?)
            .ok_or(Error::AmountOverflow)?;
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{
        UtcOffset,
        macros::{date, datetime, offset},
    };

    use crate::{
        Error,
        listing::delete_listing,
        stats::MonthWindow,
        transaction::{
            RentalStatus,
            test_utils::{get_test_connection, must_book, must_create_customer, must_create_listing},
        },
    };

    use super::{PeriodTotals, completed_transaction_totals, count_listings_created};

    #[test]
    fn counts_listings_in_month_only() {
        let connection = get_test_connection();
        must_create_listing("Jan", dec!(10), datetime!(2025-01-31 23:59 UTC), &connection);
        must_create_listing("Feb 1", dec!(10), datetime!(2025-02-01 00:00 UTC), &connection);
        must_create_listing("Feb 2", dec!(10), datetime!(2025-02-28 23:59 UTC), &connection);
        must_create_listing("Mar", dec!(10), datetime!(2025-03-01 00:00 UTC), &connection);

        let count = count_listings_created(
            MonthWindow::containing(date!(2025 - 02 - 14)),
            UtcOffset::UTC,
            &connection,
        );

        assert_eq!(count, Ok(2));
    }

    #[test]
    fn trashed_listings_still_count() {
        let connection = get_test_connection();
        let listing =
            must_create_listing("Feb", dec!(10), datetime!(2025-02-10 00:00 UTC), &connection);
        delete_listing(listing.id, datetime!(2025-02-11 00:00 UTC), &connection).unwrap();

        let count = count_listings_created(
            MonthWindow::containing(date!(2025 - 02 - 14)),
            UtcOffset::UTC,
            &connection,
        );

        assert_eq!(count, Ok(1));
    }

    #[test]
    fn sums_only_completed_transactions() {
        let connection = get_test_connection();
        let user = must_create_customer("Alice", &connection);
        let listing =
            must_create_listing("Villa", dec!(100), datetime!(2025-01-01 00:00 UTC), &connection);
        let days = (date!(2025 - 03 - 01), date!(2025 - 03 - 03));
        for status in [
            RentalStatus::Completed,
            RentalStatus::Completed,
            RentalStatus::Pending,
            RentalStatus::Cancelled,
        ] {
            must_book(
                &user,
                &listing,
                days,
                datetime!(2025-02-10 00:00 UTC),
                status,
                &connection,
            );
        }
        // Booked in a different month.
        must_book(
            &user,
            &listing,
            days,
            datetime!(2025-01-10 00:00 UTC),
            RentalStatus::Completed,
            &connection,
        );

        let totals = completed_transaction_totals(
            MonthWindow::containing(date!(2025 - 02 - 01)),
            UtcOffset::UTC,
            &connection,
        );

        assert_eq!(
            totals,
            Ok(PeriodTotals {
                count: 2,
                revenue: dec!(660),
            })
        );
    }

    #[test]
    fn empty_month_has_zero_totals() {
        let connection = get_test_connection();

        let totals = completed_transaction_totals(
            MonthWindow::containing(date!(2025 - 02 - 01)),
            UtcOffset::UTC,
            &connection,
        );

        assert_eq!(totals, Ok(PeriodTotals::default()));
    }

    #[test]
    fn months_follow_the_local_offset() {
        let connection = get_test_connection();
        // 03:00 on the 1st of February in Jakarta, still January in UTC.
        must_create_listing("Feb", dec!(10), datetime!(2025-02-01 03:00 +7), &connection);
        // 23:00 on the 31st of January in Jakarta, 16:00 UTC.
        must_create_listing("Jan", dec!(10), datetime!(2025-01-31 23:00 +7), &connection);

        let february = MonthWindow::containing(date!(2025 - 02 - 01));

        assert_eq!(
            count_listings_created(february, offset!(+7), &connection),
            Ok(1)
        );
        assert_eq!(
            count_listings_created(february.previous(), offset!(+7), &connection),
            Ok(1)
        );
        assert_eq!(
            count_listings_created(february, UtcOffset::UTC, &connection),
            Ok(0)
        );
    }

    #[test]
    fn revenue_too_large_to_sum_is_an_error() {
        let connection = get_test_connection();
        let user = must_create_customer("Alice", &connection);
        // A one day rental at this rate totals more than half of Decimal::MAX.
        let listing = must_create_listing(
            "Palace",
            Decimal::MAX / dec!(2),
            datetime!(2025-01-01 00:00 UTC),
            &connection,
        );
        for _ in 0..2 {
            must_book(
                &user,
                &listing,
                (date!(2025 - 03 - 01), date!(2025 - 03 - 01)),
                datetime!(2025-02-10 00:00 UTC),
                RentalStatus::Completed,
                &connection,
            );
        }

        let totals = completed_transaction_totals(
            MonthWindow::containing(date!(2025 - 02 - 01)),
            UtcOffset::UTC,
            &connection,
        );

        assert_eq!(totals, Err(Error::AmountOverflow));
    }
}
