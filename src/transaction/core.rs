//! Defines the rental transaction model and its database queries.

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    database_id::{ListingId, TransactionId, UserId},
    money::decimal_from_row,
    pricing::{RentalRequest, derive_pricing},
    transaction::RentalStatus,
    user::get_user_by_id,
};

// ============================================================================
// MODELS
// ============================================================================

/// A booked rental linking a user and a listing over a date range.
///
/// The price fields are derived once when the rental is booked, see
/// [book_rental]. Only the status changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The customer who booked the rental.
    pub user_id: UserId,
    /// The listing that was rented.
    pub listing_id: ListingId,
    /// The first day of the rental.
    pub start_date: Date,
    /// The last day of the rental.
    pub end_date: Date,
    /// Inclusive day count.
    pub total_days: u32,
    /// The listing's rate when the rental was booked.
    pub price_per_day: Decimal,
    /// The service fee.
    pub fee: Decimal,
    /// What the customer pays, including the fee.
    pub total_price: Decimal,
    /// Where the transaction is in its lifecycle.
    pub status: RentalStatus,
    /// When the rental was booked.
    pub created_at: OffsetDateTime,
}

pub(crate) const TRANSACTION_COLUMNS: &str = "id, user_id, listing_id, start_date, end_date, \
    total_days, price_per_day, fee, total_price, status, created_at";

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                listing_id INTEGER NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                total_days INTEGER NOT NULL CHECK (total_days >= 1),
                price_per_day TEXT NOT NULL,
                fee TEXT NOT NULL,
                total_price TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id),
                FOREIGN KEY(listing_id) REFERENCES listing(id)
                );

        CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at);
        CREATE INDEX IF NOT EXISTS idx_transaction_status ON \"transaction\"(status);",
    )?;

    Ok(())
}

/// Price `request` against the listing's current rate and record it as a
/// pending transaction for `user_id`, booked at `booked_at`.
///
/// The pricing is derived before anything is written, so a failed booking
/// leaves the database untouched.
///
/// # Errors
/// Returns:
/// - [Error::NotFound] if the user or the listing does not exist,
/// - [Error::SqlError] if there is some other SQL error.
pub fn book_rental(
    user_id: UserId,
    request: &RentalRequest,
    booked_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    get_user_by_id(user_id, connection)?;
    let pricing = derive_pricing(connection, request)?;
    let created_at = booked_at.to_offset(UtcOffset::UTC);

    connection.execute(
        "INSERT INTO \"transaction\" (user_id, listing_id, start_date, end_date, total_days, \
            price_per_day, fee, total_price, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            user_id,
            pricing.listing_id,
            pricing.start_date,
            pricing.end_date,
            pricing.total_days,
            pricing.price_per_day.to_string(),
            pricing.fee.to_string(),
            pricing.total_price.to_string(),
            RentalStatus::Pending,
            created_at,
        ],
    )?;

    let id = connection.last_insert_rowid();
    tracing::info!(
        "Booked transaction {id} for listing {} ({} days, total {})",
        pricing.listing_id,
        pricing.total_days,
        pricing.total_price
    );

    Ok(Transaction {
        id,
        user_id,
        listing_id: pricing.listing_id,
        start_date: pricing.start_date,
        end_date: pricing.end_date,
        total_days: pricing.total_days,
        price_per_day: pricing.price_per_day,
        fee: pricing.fee,
        total_price: pricing.total_price,
        status: RentalStatus::Pending,
        created_at,
    })
}

/// Retrieve a transaction in the database by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid transaction.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Move the transaction with `id` to `status`.
///
/// # Errors
/// Returns:
/// - [Error::UpdateMissingTransaction] if the transaction does not exist,
/// - [Error::InvalidStatusTransition] if the transaction has already been
///   completed or cancelled.
pub fn update_status(
    id: TransactionId,
    status: RentalStatus,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut transaction = match get_transaction(id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    let next = transaction.status.transition_to(status)?;

    if next != transaction.status {
        connection.execute(
            "UPDATE \"transaction\" SET status = ?1 WHERE id = ?2",
            params![next, id],
        )?;
        tracing::info!("Transaction {id} moved from {} to {next}", transaction.status);
        transaction.status = next;
    }

    Ok(transaction)
}

/// Map a database row to a [Transaction], starting at column `offset`.
pub(crate) fn map_transaction_row_with_offset(
    row: &Row,
    offset: usize,
) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(offset)?,
        user_id: row.get(offset + 1)?,
        listing_id: row.get(offset + 2)?,
        start_date: row.get(offset + 3)?,
        end_date: row.get(offset + 4)?,
        total_days: row.get(offset + 5)?,
        price_per_day: decimal_from_row(row, offset + 6)?,
        fee: decimal_from_row(row, offset + 7)?,
        total_price: decimal_from_row(row, offset + 8)?,
        status: row.get(offset + 9)?,
        created_at: row.get(offset + 10)?,
    })
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    map_transaction_row_with_offset(row, 0)
}



#[cfg(test)]
mod update_status_tests {
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        transaction::{RentalStatus, get_transaction, update_status},
    };

    use super::test_utils::{
        get_test_connection, must_book, must_create_customer, must_create_listing,
    };

    #[test]
    fn completes_pending_transaction() {
        let connection = get_test_connection();
        let user = must_create_customer("Alice", &connection);
        let listing = must_create_listing(
            "Villa",
            dec!(100),
            datetime!(2025-01-01 00:00 UTC),
            &connection,
        );
        let transaction = must_book(
            &user,
            &listing,
            (date!(2025 - 02 - 01), date!(2025 - 02 - 02)),
            datetime!(2025-01-15 12:00 UTC),
            RentalStatus::Pending,
            &connection,
        );

        let updated = update_status(transaction.id, RentalStatus::Completed, &connection).unwrap();

        assert_eq!(updated.status, RentalStatus::Completed);
        assert_eq!(updated.total_price, transaction.total_price);
        assert_eq!(get_transaction(transaction.id, &connection), Ok(updated));
    }

    #[test]
    fn cancelled_transaction_cannot_complete() {
        let connection = get_test_connection();
        let user = must_create_customer("Alice", &connection);
        let listing = must_create_listing(
            "Villa",
            dec!(100),
            datetime!(2025-01-01 00:00 UTC),
            &connection,
        );
        let transaction = must_book(
            &user,
            &listing,
            (date!(2025 - 02 - 01), date!(2025 - 02 - 02)),
            datetime!(2025-01-15 12:00 UTC),
            RentalStatus::Cancelled,
            &connection,
        );

        let result = update_status(transaction.id, RentalStatus::Completed, &connection);

        assert_eq!(
            result,
            Err(Error::InvalidStatusTransition {
                from: RentalStatus::Cancelled,
                to: RentalStatus::Completed,
            })
        );
        assert_eq!(
            get_transaction(transaction.id, &connection).unwrap().status,
            RentalStatus::Cancelled
        );
    }

    #[test]
    fn missing_transaction_fails() {
        let connection = get_test_connection();

        let result = update_status(1, RentalStatus::Completed, &connection);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }
}
