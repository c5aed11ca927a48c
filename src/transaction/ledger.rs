//! The read-only transaction ledger shown in the back-office.

use rusqlite::{Connection, Row, named_params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    transaction::{RentalStatus, Transaction, core::map_transaction_row_with_offset},
};

/// Narrows down which transactions are listed.
///
/// Every field is optional and unset fields do not filter anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    /// Only list transactions with this status.
    pub status: Option<RentalStatus>,
    /// Only list rentals starting on or after this date.
    pub from: Option<Date>,
    /// Only list rentals ending on or before this date.
    pub to: Option<Date>,
}

/// A transaction with the names needed to display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// The transaction itself.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The name of the customer who booked the rental.
    pub customer_name: String,
    /// The title of the rented listing, even if it has since been trashed.
    pub listing_title: String,
}

/// Get the transactions matching `filter`, most recently booked first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_ledger(filter: &LedgerFilter, connection: &Connection) -> Result<Vec<LedgerEntry>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.user_id, t.listing_id, t.start_date, t.end_date, t.total_days, \
                t.price_per_day, t.fee, t.total_price, t.status, t.created_at, \
                u.name, l.title
            FROM \"transaction\" t
            INNER JOIN user u ON u.id = t.user_id
            INNER JOIN listing l ON l.id = t.listing_id
            WHERE (:status IS NULL OR t.status = :status)
                AND (:from IS NULL OR t.start_date >= :from)
                AND (:to IS NULL OR t.end_date <= :to)
            ORDER BY t.created_at DESC, t.id DESC",
        )?
        .query_map(
            named_params! {
                ":status": filter.status,
                ":from": filter.from,
                ":to": filter.to,
            },
            map_row,
        )?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

fn map_row(row: &Row) -> Result<LedgerEntry, rusqlite::Error> {
    let transaction = map_transaction_row_with_offset(row, 0)?;

    Ok(LedgerEntry {
        transaction,
        customer_name: row.get(11)?,
        listing_title: row.get(12)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    use crate::transaction::{
        RentalStatus, Transaction,
        test_utils::{get_test_connection, must_book, must_create_customer, must_create_listing},
    };

    use super::{LedgerFilter, get_ledger};

    /// Books three rentals and returns them oldest first.
    fn seed(connection: &Connection) -> [Transaction; 3] {
        let alice = must_create_customer("Alice", connection);
        let bob = must_create_customer("Bob", connection);
        let villa = must_create_listing(
            "Villa",
            dec!(100),
            datetime!(2025-01-01 00:00 UTC),
            connection,
        );
        let loft = must_create_listing("Loft", dec!(80), datetime!(2025-01-01 00:00 UTC), connection);

        [
            must_book(
                &alice,
                &villa,
                (date!(2025 - 02 - 01), date!(2025 - 02 - 03)),
                datetime!(2025-01-10 00:00 UTC),
                RentalStatus::Completed,
                connection,
            ),
            must_book(
                &bob,
                &loft,
                (date!(2025 - 02 - 10), date!(2025 - 02 - 12)),
                datetime!(2025-01-11 00:00 UTC),
                RentalStatus::Pending,
                connection,
            ),
            must_book(
                &alice,
                &loft,
                (date!(2025 - 03 - 01), date!(2025 - 03 - 05)),
                datetime!(2025-01-12 00:00 UTC),
                RentalStatus::Cancelled,
                connection,
            ),
        ]
    }

    fn ids(entries: &[super::LedgerEntry]) -> Vec<i64> {
        entries.iter().map(|entry| entry.transaction.id).collect()
    }

    #[test]
    fn lists_newest_first_with_names() {
        let connection = get_test_connection();
        let [first, second, third] = seed(&connection);

        let entries = get_ledger(&LedgerFilter::default(), &connection).unwrap();

        assert_eq!(ids(&entries), vec![third.id, second.id, first.id]);
        assert_eq!(entries[0].customer_name, "Alice");
        assert_eq!(entries[0].listing_title, "Loft");
        assert_eq!(entries[2].transaction, first);
    }

    #[test]
    fn filters_by_status() {
        let connection = get_test_connection();
        let [_, pending, _] = seed(&connection);

        let entries = get_ledger(
            &LedgerFilter {
                status: Some(RentalStatus::Pending),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(ids(&entries), vec![pending.id]);
    }

    #[test]
    fn filters_by_date_range() {
        let connection = get_test_connection();
        let [_, second, _] = seed(&connection);

        let entries = get_ledger(
            &LedgerFilter {
                status: None,
                from: Some(date!(2025 - 02 - 05)),
                to: Some(date!(2025 - 02 - 28)),
            },
            &connection,
        )
        .unwrap();

        assert_eq!(ids(&entries), vec![second.id]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let connection = get_test_connection();
        let [first, _, _] = seed(&connection);

        let entries = get_ledger(
            &LedgerFilter {
                status: None,
                from: Some(date!(2025 - 02 - 01)),
                to: Some(date!(2025 - 02 - 03)),
            },
            &connection,
        )
        .unwrap();

        assert_eq!(ids(&entries), vec![first.id]);
    }

    #[test]
    fn empty_ledger() {
        let connection = get_test_connection();

        assert_eq!(get_ledger(&LedgerFilter::default(), &connection), Ok(vec![]));
    }
}
