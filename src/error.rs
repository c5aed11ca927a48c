//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::Date;

use crate::transaction::RentalStatus;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A rental was requested with an end date that comes before its start date.
    ///
    /// A rental that starts and ends on the same day is valid.
    #[error("the end date {end} is before the start date {start}")]
    InvalidRange {
        /// The first day of the rental.
        start: Date,
        /// The last day of the rental.
        end: Date,
    },

    /// A transaction's status can only move from pending to completed or cancelled.
    #[error("cannot change a transaction from {from} to {to}")]
    InvalidStatusTransition {
        /// The status the transaction currently has.
        from: RentalStatus,
        /// The status that was requested.
        to: RentalStatus,
    },

    /// A price, fee or total was too large to represent.
    #[error("the amount is too large to calculate")]
    AmountOverflow,

    /// The listing form had a missing or out of range field.
    #[error("invalid listing: {0}")]
    InvalidListing(String),

    /// Tried to permanently delete a listing that still has transactions.
    #[error("the listing is referenced by one or more transactions")]
    ListingInUse,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to update a listing that does not exist
    #[error("tried to update a listing that is not in the database")]
    UpdateMissingListing,

    /// Tried to delete or restore a listing that does not exist
    #[error("tried to delete a listing that is not in the database")]
    DeleteMissingListing,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::UpdateMissingListing
            | Error::DeleteMissingListing => StatusCode::NOT_FOUND,
            Error::InvalidRange { .. } | Error::InvalidListing(_) | Error::AmountOverflow => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::InvalidStatusTransition { .. } | Error::ListingInUse => StatusCode::CONFLICT,
            Error::InvalidTimezoneError(_) | Error::DatabaseLockError | Error::SqlError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // The details of internal errors are for the server logs only.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
