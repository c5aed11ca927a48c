//! Rental Admin is the back office for a short-stay rental business.
//!
//! This library provides a JSON API for managing listings, booking rentals
//! with a derived price, moving transactions through their lifecycle and
//! reporting month-over-month statistics on the dashboard.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
pub mod database_id;
pub mod endpoints;
mod error;
mod listing;
mod logging;
mod money;
mod pricing;
mod routing;
mod stats;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use listing::{Listing, ListingForm, create_listing};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::{format_rupiah, round_to_cents};
pub use pricing::{ListingRates, RentalPricing, RentalRequest, SERVICE_FEE_RATE, derive_pricing};
pub use routing::build_router;
pub use stats::{
    DashboardStats, MonthWindow, PercentChange, Stat, Trend, get_dashboard_stats, percent_change,
};
pub use timezone::{get_local_offset, is_valid_timezone};
pub use transaction::{RentalStatus, Transaction, book_rental, update_status};
pub use user::{Role, User, create_user, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
