//! Defines the JSON endpoints for booking rentals and reading the ledger.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    database_id::{ListingId, TransactionId, UserId},
    pricing::RentalRequest,
    transaction::{
        LedgerEntry, LedgerFilter, RentalStatus, Transaction, book_rental, get_ledger,
        get_transaction, update_status,
    },
};

/// The state needed to book and look up transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl TransactionState {
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

/// The request body for booking a rental.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingForm {
    /// The customer making the booking.
    pub user_id: UserId,
    /// The listing to rent.
    pub listing_id: ListingId,
    /// The first day of the rental.
    pub start_date: Date,
    /// The last day of the rental, may equal the first.
    pub end_date: Date,
}

/// The request body for changing a transaction's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusForm {
    /// The status to move to.
    pub status: RentalStatus,
}

/// A route handler for booking a rental, responds with the priced transaction.
///
/// The lock is held across pricing and inserting, so the captured rate is the
/// listing's rate at the moment of booking.
pub async fn book_rental_endpoint(
    State(state): State<TransactionState>,
    Json(form): Json<BookingForm>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let request = RentalRequest::new(form.listing_id, form.start_date, form.end_date)?;
    let connection = state.lock()?;

    let transaction = book_rental(
        form.user_id,
        &request,
        OffsetDateTime::now_utc(),
        &connection,
    )
    .inspect_err(|error| tracing::warn!("Could not book rental with {form:?}: {error}"))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.lock()?;

    get_transaction(transaction_id, &connection).map(Json)
}

/// A route handler for the ledger, filtered by the query string.
pub async fn get_ledger_endpoint(
    State(state): State<TransactionState>,
    Query(filter): Query<LedgerFilter>,
) -> Result<Json<Vec<LedgerEntry>>, Error> {
    let connection = state.lock()?;

    get_ledger(&filter, &connection).map(Json)
}

/// A route handler for moving a pending transaction to completed or cancelled.
pub async fn update_status_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Json(form): Json<StatusForm>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.lock()?;

    update_status(transaction_id, form.status, &connection).map(Json)
}
