//! Rental transactions and the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `RentalStatus` lifecycle
//! - Booking a rental, which prices it and records it as pending
//! - The read-only ledger with its status and date filters
//! - The JSON endpoints for the above

mod core;
mod endpoints;
mod ledger;
mod status;

pub use core::{Transaction, book_rental, create_transaction_table, get_transaction, update_status};
pub use endpoints::{
    BookingForm, StatusForm, book_rental_endpoint, get_ledger_endpoint, get_transaction_endpoint,
    update_status_endpoint,
};
pub use ledger::{LedgerEntry, LedgerFilter, get_ledger};
pub use status::RentalStatus;

#[cfg(test)]
pub(crate) use core::test_utils;
