//! Listing management: the catalog of rentable properties.

mod core;
mod db;
mod endpoints;

pub use core::{Listing, ListingForm, MAX_TEXT_LENGTH, slugify};
pub use db::{
    create_listing, create_listing_table, delete_listing, force_delete_listing, get_listing,
    get_listings, restore_listing, update_listing,
};
pub use endpoints::{
    ListingsQuery, create_listing_endpoint, delete_listing_endpoint,
    force_delete_listing_endpoint, get_listing_endpoint, get_listings_endpoint,
    restore_listing_endpoint, update_listing_endpoint,
};

#[cfg(test)]
pub(crate) use core::test_utils;
