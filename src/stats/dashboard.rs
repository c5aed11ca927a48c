//! The stats overview shown at the top of the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    money::format_rupiah,
    stats::{
        MonthWindow, PercentChange, completed_transaction_totals, count_listings_created,
        percent_change,
    },
    timezone::get_local_offset,
};

/// One headline number with its change since last month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    /// What the number is.
    pub label: &'static str,
    /// The number formatted for display.
    pub value: String,
    /// The change from the previous month.
    pub change: PercentChange,
    /// The change as text, e.g. "Up by 12.5%".
    pub description: String,
}

impl Stat {
    fn new(label: &'static str, value: String, previous: Decimal, current: Decimal) -> Self {
        let change = percent_change(previous, current);

        Self {
            label,
            value,
            change,
            description: change.to_string(),
        }
    }
}

/// The month-over-month overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// The month being reported on.
    pub month: MonthWindow,
    /// Listings created this month.
    pub new_listings: Stat,
    /// Completed transactions booked this month.
    pub transactions: Stat,
    /// What the completed transactions booked this month earned.
    pub revenue: Stat,
}

/// Build the overview for the month containing `today`, compared with the
/// month before.
///
/// Months are calendar months in the timezone `offset` from UTC, the same
/// timezone `today` was taken in.
///
/// # Errors
/// Returns [Error::SqlError] if one of the aggregate queries fails, or
/// [Error::AmountOverflow] if a month's revenue is too large to add up.
pub fn get_dashboard_stats(
    today: Date,
    offset: UtcOffset,
    connection: &Connection,
) -> Result<DashboardStats, Error> {
    let month = MonthWindow::containing(today);
    let previous_month = month.previous();

    let new_listings = count_listings_created(month, offset, connection)?;
    let previous_listings = count_listings_created(previous_month, offset, connection)?;

    let current = completed_transaction_totals(month, offset, connection)?;
    let previous = completed_transaction_totals(previous_month, offset, connection)?;

    Ok(DashboardStats {
        month,
        new_listings: Stat::new(
            "New Listings This Month",
            new_listings.to_string(),
            Decimal::from(previous_listings),
            Decimal::from(new_listings),
        ),
        transactions: Stat::new(
            "Transactions This Month",
            current.count.to_string(),
            Decimal::from(previous.count),
            Decimal::from(current.count),
        ),
        revenue: Stat::new(
            "Revenue This Month",
            format_rupiah(current.revenue),
            previous.revenue,
            current.revenue,
        ),
    })
}

/// The state needed for the dashboard stats.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection to aggregate from.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Query string for the dashboard stats.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// Report on the month containing this date instead of today.
    pub date: Option<Date>,
}

/// A route handler for the dashboard stats.
///
/// "Today" is taken from the server's configured timezone unless the query
/// string names a date. Months are bucketed in the configured timezone either
/// way.
pub async fn get_dashboard_stats_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<DashboardStats>, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let today = query
        .date
        .unwrap_or_else(|| OffsetDateTime::now_utc().to_offset(local_offset).date());

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_dashboard_stats(today, local_offset, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use time::{
        UtcOffset,
        macros::{date, datetime, offset},
    };

    use crate::{
        endpoints,
        stats::Trend,
        transaction::{
            RentalStatus,
            test_utils::{get_test_connection, must_book, must_create_customer, must_create_listing},
        },
    };

    use super::{DashboardState, get_dashboard_stats, get_dashboard_stats_endpoint};

    fn seed_two_months(connection: &rusqlite::Connection) {
        let user = must_create_customer("Alice", connection);
        let villa =
            must_create_listing("Villa", dec!(100), datetime!(2025-01-05 00:00 UTC), connection);
        must_create_listing("Loft", dec!(50), datetime!(2025-01-06 00:00 UTC), connection);
        must_create_listing("Hut", dec!(20), datetime!(2025-02-02 00:00 UTC), connection);
        let three_days = (date!(2025 - 03 - 01), date!(2025 - 03 - 03));

        // January: two completed rentals earning 330 each.
        for _ in 0..2 {
            must_book(
                &user,
                &villa,
                three_days,
                datetime!(2025-01-20 00:00 UTC),
                RentalStatus::Completed,
                connection,
            );
        }
        // February: three completed rentals and one that was cancelled.
        for status in [
            RentalStatus::Completed,
            RentalStatus::Completed,
            RentalStatus::Completed,
            RentalStatus::Cancelled,
        ] {
            must_book(
                &user,
                &villa,
                three_days,
                datetime!(2025-02-20 00:00 UTC),
                status,
                connection,
            );
        }
    }

    #[test]
    fn compares_with_previous_month() {
        let connection = get_test_connection();
        seed_two_months(&connection);

        let stats = get_dashboard_stats(date!(2025 - 02 - 25), UtcOffset::UTC, &connection).unwrap();

        assert_eq!(stats.month.start, date!(2025 - 02 - 01));

        assert_eq!(stats.new_listings.value, "1");
        assert_eq!(stats.new_listings.change.trend, Trend::Down);
        assert_eq!(stats.new_listings.description, "Down by 50%");

        assert_eq!(stats.transactions.value, "3");
        assert_eq!(stats.transactions.change.signed(), 50.0);
        assert_eq!(stats.transactions.description, "Up by 50%");

        assert_eq!(stats.revenue.value, "Rp 990");
        assert_eq!(stats.revenue.change.signed(), 50.0);
    }

    #[test]
    fn first_month_has_no_trend() {
        let connection = get_test_connection();
        seed_two_months(&connection);

        let stats = get_dashboard_stats(date!(2025 - 01 - 31), UtcOffset::UTC, &connection).unwrap();

        assert_eq!(stats.new_listings.value, "2");
        assert_eq!(stats.new_listings.change.trend, Trend::Unchanged);
        assert_eq!(stats.revenue.value, "Rp 660");
        assert_eq!(stats.revenue.description, "No change");
    }

    #[test]
    fn empty_database() {
        let connection = get_test_connection();

        let stats = get_dashboard_stats(date!(2025 - 02 - 25), UtcOffset::UTC, &connection).unwrap();

        assert_eq!(stats.new_listings.value, "0");
        assert_eq!(stats.transactions.value, "0");
        assert_eq!(stats.revenue.value, "Rp 0");
    }

    #[test]
    fn late_night_listing_counts_in_local_month() {
        let connection = get_test_connection();
        must_create_listing("Villa", dec!(100), datetime!(2025-02-01 03:00 +7), &connection);

        let stats = get_dashboard_stats(date!(2025 - 02 - 01), offset!(+7), &connection).unwrap();

        assert_eq!(stats.new_listings.value, "1");
    }

    fn get_test_server(local_timezone: &str) -> TestServer {
        let connection = get_test_connection();
        seed_two_months(&connection);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: local_timezone.to_owned(),
        };

        let app = Router::new()
            .route(endpoints::DASHBOARD_STATS, get(get_dashboard_stats_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn endpoint_uses_date_from_query() {
        let server = get_test_server("Etc/UTC");

        let response = server
            .get(endpoints::DASHBOARD_STATS)
            .add_query_param("date", "2025-02-25")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["transactions"]["value"], json!("3"));
        assert_eq!(body["transactions"]["change"]["trend"], json!("up"));
        assert_eq!(body["transactions"]["change"]["magnitude"], json!(50.0));
    }

    #[tokio::test]
    async fn endpoint_buckets_by_configured_timezone() {
        let server = get_test_server("Asia/Jakarta");

        // The Hut was created at 07:00 on the 2nd of February in Jakarta and
        // the January rentals at 07:00 on the 20th, so nothing moves month.
        let response = server
            .get(endpoints::DASHBOARD_STATS)
            .add_query_param("date", "2025-02-25")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["new_listings"]["value"], json!("1"));
        assert_eq!(body["transactions"]["value"], json!("3"));
    }

    #[tokio::test]
    async fn endpoint_without_date_uses_local_today() {
        let server = get_test_server("Asia/Jakarta");

        server.get(endpoints::DASHBOARD_STATS).await.assert_status_ok();
    }

    #[tokio::test]
    async fn invalid_timezone_is_internal_error() {
        let server = get_test_server("Not/AZone");

        server
            .get(endpoints::DASHBOARD_STATS)
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
