//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use crate::{
    AppState, endpoints,
    listing::{
        create_listing_endpoint, delete_listing_endpoint, force_delete_listing_endpoint,
        get_listing_endpoint, get_listings_endpoint, restore_listing_endpoint,
        update_listing_endpoint,
    },
    logging::logging_middleware,
    stats::get_dashboard_stats_endpoint,
    transaction::{
        book_rental_endpoint, get_ledger_endpoint, get_transaction_endpoint,
        update_status_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(
            endpoints::LISTINGS,
            get(get_listings_endpoint).post(create_listing_endpoint),
        )
        .route(
            endpoints::LISTING,
            get(get_listing_endpoint)
                .put(update_listing_endpoint)
                .delete(delete_listing_endpoint),
        )
        .route(endpoints::RESTORE_LISTING, post(restore_listing_endpoint))
        .route(
            endpoints::FORCE_DELETE_LISTING,
            delete(force_delete_listing_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_ledger_endpoint).post(book_rental_endpoint),
        )
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint))
        .route(endpoints::TRANSACTION_STATUS, put(update_status_endpoint))
        .route(endpoints::DASHBOARD_STATS, get(get_dashboard_stats_endpoint))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}
