//! Derives the price of a rental from the listing's daily rate.
//!
//! Pricing happens once, when a rental is booked. The daily rate is copied
//! out of the listing so that later edits to the listing never change what
//! an existing transaction cost.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::ListingId, money::round_to_cents};

/// The service fee charged on top of the base rental cost.
pub const SERVICE_FEE_RATE: Decimal = dec!(0.10);

/// Looks up the current daily rate of a listing.
pub trait ListingRates {
    /// Get the price per day of the listing with `listing_id`.
    ///
    /// Returns `Ok(None)` if there is no bookable listing with that ID.
    fn find_price_per_day(&self, listing_id: ListingId) -> Result<Option<Decimal>, Error>;
}

impl ListingRates for HashMap<ListingId, Decimal> {
    fn find_price_per_day(&self, listing_id: ListingId) -> Result<Option<Decimal>, Error> {
        Ok(self.get(&listing_id).copied())
    }
}

/// A request to rent a listing from `start_date` to `end_date`, inclusive.
///
/// To create a new `RentalRequest`, use [RentalRequest::new] which checks
/// that the end date is not before the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalRequest {
    listing_id: ListingId,
    start_date: Date,
    end_date: Date,
}

impl RentalRequest {
    /// Create a rental request.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidRange] if `end_date` is before `start_date`.
    pub fn new(listing_id: ListingId, start_date: Date, end_date: Date) -> Result<Self, Error> {
        if end_date < start_date {
            return Err(Error::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Self {
            listing_id,
            start_date,
            end_date,
        })
    }

    /// The listing being rented.
    pub fn listing_id(&self) -> ListingId {
        self.listing_id
    }

    /// The first day of the rental.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// The last day of the rental.
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// The number of days rented, counting both the first and last day.
    pub fn total_days(&self) -> u32 {
        let whole_days = (self.end_date - self.start_date).whole_days();

        // `new` guarantees the range is not negative.
        whole_days.unsigned_abs() as u32 + 1
    }
}

/// The derived price fields of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPricing {
    /// The listing being rented.
    pub listing_id: ListingId,
    /// The first day of the rental.
    pub start_date: Date,
    /// The last day of the rental.
    pub end_date: Date,
    /// Inclusive day count, at least one.
    pub total_days: u32,
    /// The listing's rate at the time of pricing.
    pub price_per_day: Decimal,
    /// The service fee, rounded to cents.
    pub fee: Decimal,
    /// The base cost plus the fee.
    pub total_price: Decimal,
}

/// Price `request` using the listing's current rate.
///
/// The base cost is `price_per_day * total_days`, the fee is
/// [SERVICE_FEE_RATE] of the base cost rounded to cents, and the total is the
/// base cost plus the fee. Calling this again with the same request and an
/// unchanged rate gives the same result.
///
/// # Errors
///
/// Returns [Error::NotFound] if the listing does not exist,
/// [Error::AmountOverflow] if the rate is too large to price the rental, or
/// any error from the rate lookup. Nothing is derived in these cases.
pub fn derive_pricing(
    rates: &impl ListingRates,
    request: &RentalRequest,
) -> Result<RentalPricing, Error> {
    let price_per_day = rates
        .find_price_per_day(request.listing_id)?
        .ok_or(Error::NotFound)?;

    let total_days = request.total_days();
    let base_cost = price_per_day
        .checked_mul(Decimal::from(total_days))
        .ok_or(Error::AmountOverflow)?;
    let fee = base_cost
        .checked_mul(SERVICE_FEE_RATE)
        .map(round_to_cents)
        .ok_or(Error::AmountOverflow)?;
    let total_price = base_cost.checked_add(fee).ok_or(Error::AmountOverflow)?;

    Ok(RentalPricing {
        listing_id: request.listing_id,
        start_date: request.start_date,
        end_date: request.end_date,
        total_days,
        price_per_day,
        fee,
        total_price,
    })
}

#[cfg(test)]
mod rental_request_tests {
    use time::macros::date;

    use crate::Error;

    use super::RentalRequest;

    #[test]
    fn same_day_rental_is_one_day() {
        let request = RentalRequest::new(1, date!(2025 - 06 - 01), date!(2025 - 06 - 01)).unwrap();

        assert_eq!(request.total_days(), 1);
    }

    #[test]
    fn counts_both_ends_of_range() {
        let request = RentalRequest::new(1, date!(2025 - 06 - 01), date!(2025 - 06 - 03)).unwrap();

        assert_eq!(request.total_days(), 3);
    }

    #[test]
    fn counts_across_month_and_leap_day() {
        let request = RentalRequest::new(1, date!(2024 - 02 - 28), date!(2024 - 03 - 01)).unwrap();

        assert_eq!(request.total_days(), 3);
    }

    #[test]
    fn end_before_start_fails() {
        let result = RentalRequest::new(1, date!(2025 - 06 - 03), date!(2025 - 06 - 02));

        assert_eq!(
            result,
            Err(Error::InvalidRange {
                start: date!(2025 - 06 - 03),
                end: date!(2025 - 06 - 02),
            })
        );
    }
}
