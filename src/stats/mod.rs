//! Month-over-month statistics for the admin dashboard.

mod aggregation;
mod dashboard;
mod period;
mod window;

pub use aggregation::{
    PeriodTotals, REVENUE_STATUS, completed_transaction_totals, count_listings_created,
};
pub use dashboard::{
    DashboardState, DashboardStats, Stat, StatsQuery, get_dashboard_stats,
    get_dashboard_stats_endpoint,
};
pub use period::{PercentChange, Trend, percent_change};
pub use window::MonthWindow;
