//! Database operations for listings.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    database_id::ListingId,
    listing::{Listing, ListingForm, slugify},
    money::decimal_from_row,
    pricing::ListingRates,
};

const LISTING_COLUMNS: &str = "id, title, slug, description, address, sqft, max_person, \
    wifi_speed, price_per_day, full_support_available, gym_area_available, \
    mini_cafe_available, cinema_available, created_at, updated_at, deleted_at";

/// Initialize the listing table and indexes.
pub fn create_listing_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS listing (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT NOT NULL,
            address TEXT NOT NULL,
            sqft INTEGER NOT NULL DEFAULT 0,
            max_person INTEGER NOT NULL DEFAULT 0,
            wifi_speed INTEGER NOT NULL DEFAULT 0,
            price_per_day TEXT NOT NULL,
            full_support_available INTEGER NOT NULL DEFAULT 0,
            gym_area_available INTEGER NOT NULL DEFAULT 0,
            mini_cafe_available INTEGER NOT NULL DEFAULT 0,
            cinema_available INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_listing_created_at ON listing(created_at);",
    )?;

    Ok(())
}

/// Validate `form` and insert it as a new listing created at `now`.
///
/// # Errors
///
/// Returns [Error::InvalidListing] if the form is invalid, or
/// [Error::SqlError] if the insert failed.
pub fn create_listing(
    form: &ListingForm,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Listing, Error> {
    let form = form.validate()?;
    let now = now.to_offset(UtcOffset::UTC);
    let slug = slugify(&form.title);

    connection.execute(
        "INSERT INTO listing (title, slug, description, address, sqft, max_person, wifi_speed, \
            price_per_day, full_support_available, gym_area_available, mini_cafe_available, \
            cinema_available, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
        params![
            form.title,
            slug,
            form.description,
            form.address,
            form.sqft,
            form.max_person,
            form.wifi_speed,
            form.price_per_day.to_string(),
            form.full_support_available,
            form.gym_area_available,
            form.mini_cafe_available,
            form.cinema_available,
            now,
        ],
    )?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Created listing {id} \"{}\"", form.title);

    Ok(Listing {
        id,
        title: form.title,
        slug,
        description: form.description,
        address: form.address,
        sqft: form.sqft,
        max_person: form.max_person,
        wifi_speed: form.wifi_speed,
        price_per_day: form.price_per_day,
        full_support_available: form.full_support_available,
        gym_area_available: form.gym_area_available,
        mini_cafe_available: form.mini_cafe_available,
        cinema_available: form.cinema_available,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    })
}

/// Retrieve a listing that has not been moved to the trash.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such listing or it is trashed.
pub fn get_listing(listing_id: ListingId, connection: &Connection) -> Result<Listing, Error> {
    connection
        .prepare(&format!(
            "SELECT {LISTING_COLUMNS} FROM listing WHERE id = :id AND deleted_at IS NULL"
        ))?
        .query_row(&[(":id", &listing_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve listings, newest first.
///
/// Trashed listings are only included when `include_trashed` is set.
pub fn get_listings(include_trashed: bool, connection: &Connection) -> Result<Vec<Listing>, Error> {
    let query = if include_trashed {
        format!("SELECT {LISTING_COLUMNS} FROM listing ORDER BY created_at DESC, id DESC")
    } else {
        format!(
            "SELECT {LISTING_COLUMNS} FROM listing WHERE deleted_at IS NULL \
            ORDER BY created_at DESC, id DESC"
        )
    };

    connection
        .prepare(&query)?
        .query_map([], map_row)?
        .map(|maybe_listing| maybe_listing.map_err(|error| error.into()))
        .collect()
}

/// Replace the editable fields of a listing, trashed or not.
///
/// The slug is derived again from the new title. Transactions that were
/// already priced against this listing keep the rate they captured.
///
/// # Errors
///
/// Returns [Error::InvalidListing] if the form is invalid or
/// [Error::UpdateMissingListing] if the listing does not exist.
pub fn update_listing(
    listing_id: ListingId,
    form: &ListingForm,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Listing, Error> {
    let form = form.validate()?;

    let rows_affected = connection.execute(
        "UPDATE listing SET title = ?1, slug = ?2, description = ?3, address = ?4, sqft = ?5, \
            max_person = ?6, wifi_speed = ?7, price_per_day = ?8, full_support_available = ?9, \
            gym_area_available = ?10, mini_cafe_available = ?11, cinema_available = ?12, \
            updated_at = ?13
        WHERE id = ?14",
        params![
            form.title,
            slugify(&form.title),
            form.description,
            form.address,
            form.sqft,
            form.max_person,
            form.wifi_speed,
            form.price_per_day.to_string(),
            form.full_support_available,
            form.gym_area_available,
            form.mini_cafe_available,
            form.cinema_available,
            now.to_offset(UtcOffset::UTC),
            listing_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingListing);
    }

    get_listing_including_trashed(listing_id, connection)
}

/// Move a listing to the trash.
///
/// Trashed listings can no longer be booked but still count towards the
/// dashboard and can be brought back with [restore_listing].
///
/// # Errors
///
/// Returns [Error::DeleteMissingListing] if the listing does not exist or is
/// already trashed.
pub fn delete_listing(
    listing_id: ListingId,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE listing SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        params![now.to_offset(UtcOffset::UTC), listing_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingListing);
    }

    Ok(())
}

/// Take a listing out of the trash.
///
/// # Errors
///
/// Returns [Error::NotFound] if the listing does not exist.
pub fn restore_listing(listing_id: ListingId, connection: &Connection) -> Result<Listing, Error> {
    let rows_affected = connection.execute(
        "UPDATE listing SET deleted_at = NULL WHERE id = ?1",
        [listing_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_listing(listing_id, connection)
}

/// Permanently delete a listing.
///
/// # Errors
///
/// Returns [Error::ListingInUse] if a transaction refers to the listing, or
/// [Error::DeleteMissingListing] if the listing does not exist.
pub fn force_delete_listing(listing_id: ListingId, connection: &Connection) -> Result<(), Error> {
    let transaction_count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE listing_id = ?1",
        [listing_id],
        |row| row.get(0),
    )?;

    if transaction_count > 0 {
        return Err(Error::ListingInUse);
    }

    let rows_affected = connection.execute("DELETE FROM listing WHERE id = ?1", [listing_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingListing);
    }

    Ok(())
}

fn get_listing_including_trashed(
    listing_id: ListingId,
    connection: &Connection,
) -> Result<Listing, Error> {
    connection
        .prepare(&format!("SELECT {LISTING_COLUMNS} FROM listing WHERE id = :id"))?
        .query_row(&[(":id", &listing_id)], map_row)
        .map_err(|error| error.into())
}

impl ListingRates for Connection {
    fn find_price_per_day(&self, listing_id: ListingId) -> Result<Option<Decimal>, Error> {
        self.query_row(
            "SELECT price_per_day FROM listing WHERE id = ?1 AND deleted_at IS NULL",
            [listing_id],
            |row| decimal_from_row(row, 0),
        )
        .optional()
        .map_err(Error::from)
    }
}

fn map_row(row: &Row) -> Result<Listing, rusqlite::Error> {
    Ok(Listing {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        address: row.get(4)?,
        sqft: row.get(5)?,
        max_person: row.get(6)?,
        wifi_speed: row.get(7)?,
        price_per_day: decimal_from_row(row, 8)?,
        full_support_available: row.get(9)?,
        gym_area_available: row.get(10)?,
        mini_cafe_available: row.get(11)?,
        cinema_available: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
        deleted_at: row.get(15)?,
    })
}
