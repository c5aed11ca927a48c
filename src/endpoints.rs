//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/listings/{listing_id}', use [format_endpoint].

/// The route to request a cup of coffee, doubles as a liveness check.
pub const COFFEE: &str = "/api/coffee";
/// The route to list or create listings.
pub const LISTINGS: &str = "/api/listings";
/// The route to get, update or trash a single listing.
pub const LISTING: &str = "/api/listings/{listing_id}";
/// The route to take a listing out of the trash.
pub const RESTORE_LISTING: &str = "/api/listings/{listing_id}/restore";
/// The route to permanently delete a listing.
pub const FORCE_DELETE_LISTING: &str = "/api/listings/{listing_id}/force";
/// The route to book a rental or read the ledger.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to change a transaction's status.
pub const TRANSACTION_STATUS: &str = "/api/transactions/{transaction_id}/status";
/// The route for the month-over-month dashboard stats.
pub const DASHBOARD_STATS: &str = "/api/dashboard/stats";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
