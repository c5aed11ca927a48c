//! The lifecycle of a rental transaction.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Where a rental transaction is in its lifecycle.
///
/// Every transaction starts as [RentalStatus::Pending] and may move once to
/// either [RentalStatus::Completed] or [RentalStatus::Cancelled].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    /// Booked, awaiting completion.
    Pending,
    /// The rental went ahead. Only completed transactions count as revenue.
    Completed,
    /// The rental was called off.
    Cancelled,
}

impl RentalStatus {
    /// The name used for the status in the database and in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Check that a transaction may move from `self` to `next`.
    ///
    /// Staying in the same status is always allowed.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidStatusTransition] when leaving a final status
    /// or moving back to pending.
    pub fn transition_to(self, next: RentalStatus) -> Result<RentalStatus, Error> {
        match (self, next) {
            (current, next) if current == next => Ok(next),
            (Self::Pending, Self::Completed | Self::Cancelled) => Ok(next),
            (from, to) => Err(Error::InvalidStatusTransition { from, to }),
        }
    }
}

impl Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown rental status \"{other}\"")),
        }
    }
}

impl ToSql for RentalStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RentalStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::RentalStatus;

    #[test]
    fn pending_can_complete_or_cancel() {
        assert_eq!(
            RentalStatus::Pending.transition_to(RentalStatus::Completed),
            Ok(RentalStatus::Completed)
        );
        assert_eq!(
            RentalStatus::Pending.transition_to(RentalStatus::Cancelled),
            Ok(RentalStatus::Cancelled)
        );
    }

    #[test]
    fn same_status_is_allowed() {
        assert_eq!(
            RentalStatus::Completed.transition_to(RentalStatus::Completed),
            Ok(RentalStatus::Completed)
        );
    }

    #[test]
    fn final_statuses_cannot_change() {
        assert_eq!(
            RentalStatus::Cancelled.transition_to(RentalStatus::Completed),
            Err(Error::InvalidStatusTransition {
                from: RentalStatus::Cancelled,
                to: RentalStatus::Completed,
            })
        );
        assert!(
            RentalStatus::Completed
                .transition_to(RentalStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn parses_database_names() {
        for status in [
            RentalStatus::Pending,
            RentalStatus::Completed,
            RentalStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
    }

    #[test]
    fn approved_is_not_a_status() {
        assert!("approved".parse::<RentalStatus>().is_err());
    }
}
