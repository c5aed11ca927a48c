//! Defines the JSON endpoints for managing listings.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    database_id::ListingId,
    listing::{
        Listing, ListingForm, create_listing, delete_listing, force_delete_listing, get_listing,
        get_listings, restore_listing, update_listing,
    },
};

/// The state needed to manage listings.
#[derive(Debug, Clone)]
pub struct ListingState {
    /// The database connection for managing listings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl ListingState {
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

/// Query string for the listings index.
#[derive(Debug, Default, Deserialize)]
pub struct ListingsQuery {
    /// Include listings that have been moved to the trash.
    #[serde(default)]
    pub with_trashed: bool,
}

/// A route handler for the listings index, newest first.
pub async fn get_listings_endpoint(
    State(state): State<ListingState>,
    Query(query): Query<ListingsQuery>,
) -> Result<Json<Vec<Listing>>, Error> {
    let connection = state.lock()?;

    get_listings(query.with_trashed, &connection).map(Json)
}

/// A route handler for a single, untrashed listing.
pub async fn get_listing_endpoint(
    State(state): State<ListingState>,
    Path(listing_id): Path<ListingId>,
) -> Result<Json<Listing>, Error> {
    let connection = state.lock()?;

    get_listing(listing_id, &connection).map(Json)
}

/// A route handler for creating a listing.
pub async fn create_listing_endpoint(
    State(state): State<ListingState>,
    Json(form): Json<ListingForm>,
) -> Result<(StatusCode, Json<Listing>), Error> {
    let connection = state.lock()?;

    let listing = create_listing(&form, OffsetDateTime::now_utc(), &connection)?;

    Ok((StatusCode::CREATED, Json(listing)))
}

/// A route handler for editing a listing.
pub async fn update_listing_endpoint(
    State(state): State<ListingState>,
    Path(listing_id): Path<ListingId>,
    Json(form): Json<ListingForm>,
) -> Result<Json<Listing>, Error> {
    let connection = state.lock()?;

    update_listing(listing_id, &form, OffsetDateTime::now_utc(), &connection).map(Json)
}

/// A route handler for moving a listing to the trash.
pub async fn delete_listing_endpoint(
    State(state): State<ListingState>,
    Path(listing_id): Path<ListingId>,
) -> Result<StatusCode, Error> {
    let connection = state.lock()?;

    delete_listing(listing_id, OffsetDateTime::now_utc(), &connection)?;
    tracing::info!("Listing {listing_id} moved to the trash");

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for taking a listing out of the trash.
pub async fn restore_listing_endpoint(
    State(state): State<ListingState>,
    Path(listing_id): Path<ListingId>,
) -> Result<Json<Listing>, Error> {
    let connection = state.lock()?;

    restore_listing(listing_id, &connection).map(Json)
}

/// A route handler for permanently deleting a listing.
pub async fn force_delete_listing_endpoint(
    State(state): State<ListingState>,
    Path(listing_id): Path<ListingId>,
) -> Result<StatusCode, Error> {
    let connection = state.lock()?;

    force_delete_listing(listing_id, &connection)?;
    tracing::info!("Listing {listing_id} permanently deleted");

    Ok(StatusCode::NO_CONTENT)
}
