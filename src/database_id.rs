//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Database identifier for a listing.
pub type ListingId = DatabaseId;

/// Database identifier for a rental transaction.
pub type TransactionId = DatabaseId;

/// Database identifier for a user.
pub type UserId = DatabaseId;
