//! Core listing domain types and validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::ListingId};

/// The longest title or address a listing may have, in characters.
pub const MAX_TEXT_LENGTH: usize = 255;

/// A rentable property with a daily price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// The ID of the listing.
    pub id: ListingId,
    /// The name shown to customers.
    pub title: String,
    /// URL friendly version of the title.
    pub slug: String,
    /// A longer description of the property.
    pub description: String,
    /// Where the property is.
    pub address: String,
    /// Floor area in square feet.
    pub sqft: u32,
    /// The most guests the property can hold.
    pub max_person: u32,
    /// Internet speed in Mbps.
    pub wifi_speed: u32,
    /// The rate charged for each day of a rental.
    pub price_per_day: Decimal,
    /// Whether 24/7 support is available.
    pub full_support_available: bool,
    /// Whether there is a gym on site.
    pub gym_area_available: bool,
    /// Whether there is a café on site.
    pub mini_cafe_available: bool,
    /// Whether there is a private cinema room.
    pub cinema_available: bool,
    /// When the listing was created.
    pub created_at: OffsetDateTime,
    /// When the listing was last edited.
    pub updated_at: OffsetDateTime,
    /// When the listing was moved to the trash, if it has been.
    pub deleted_at: Option<OffsetDateTime>,
}

impl Listing {
    /// Whether the listing has been soft deleted.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// The data needed to create or edit a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingForm {
    /// The name shown to customers, the slug is derived from it.
    pub title: String,
    /// A longer description of the property.
    pub description: String,
    /// Where the property is.
    pub address: String,
    /// Floor area in square feet.
    #[serde(default)]
    pub sqft: u32,
    /// The most guests the property can hold.
    #[serde(default)]
    pub max_person: u32,
    /// Internet speed in Mbps.
    #[serde(default)]
    pub wifi_speed: u32,
    /// The daily rate, must not be negative.
    pub price_per_day: Decimal,
    /// Whether 24/7 support is available.
    #[serde(default)]
    pub full_support_available: bool,
    /// Whether there is a gym on site.
    #[serde(default)]
    pub gym_area_available: bool,
    /// Whether there is a café on site.
    #[serde(default)]
    pub mini_cafe_available: bool,
    /// Whether there is a private cinema room.
    #[serde(default)]
    pub cinema_available: bool,
}

impl ListingForm {
    /// Check the form and return a copy with the text fields trimmed.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidListing] if a required text field is empty,
    /// the title or address is longer than [MAX_TEXT_LENGTH] characters or
    /// the price per day is negative.
    pub fn validate(&self) -> Result<ListingForm, Error> {
        let title = required_text("title", &self.title)?;
        let description = required_text("description", &self.description)?;
        let address = required_text("address", &self.address)?;

        for (field, value) in [("title", &title), ("address", &address)] {
            if value.chars().count() > MAX_TEXT_LENGTH {
                return Err(Error::InvalidListing(format!(
                    "{field} must be at most {MAX_TEXT_LENGTH} characters"
                )));
            }
        }

        if self.price_per_day.is_sign_negative() && !self.price_per_day.is_zero() {
            return Err(Error::InvalidListing(
                "price_per_day cannot be negative".to_owned(),
            ));
        }

        Ok(ListingForm {
            title,
            description,
            address,
            ..self.clone()
        })
    }
}

fn required_text(field: &str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::InvalidListing(format!("{field} cannot be empty")))
    } else {
        Ok(value.to_owned())
    }
}

/// Turn `title` into a lowercase, hyphen separated slug.
///
/// Characters that are not ASCII letters or digits act as separators, and
/// runs of separators collapse into a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for character in title.chars() {
        if character.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(character.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
pub(crate) mod test_utils {
    use rust_decimal::Decimal;

    use super::ListingForm;

    /// A valid listing form with the given title and daily rate.
    pub(crate) fn listing_form(title: &str, price_per_day: Decimal) -> ListingForm {
        ListingForm {
            title: title.to_owned(),
            description: "A quiet place to stay".to_owned(),
            address: "1 Beach Road".to_owned(),
            sqft: 900,
            max_person: 4,
            wifi_speed: 100,
            price_per_day,
            full_support_available: true,
            gym_area_available: false,
            mini_cafe_available: true,
            cinema_available: false,
        }
    }
}
