//! Code for creating the user table and fetching users from the database.
//!
//! Users are only recorded so the ledger can name the customer on each
//! transaction; there are no credentials stored here.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::UserId};

/// What a user is allowed to do in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office staff.
    Admin,
    /// Someone who books rentals.
    Customer,
}

impl Role {
    /// The name used for the role in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            other => Err(FromSqlError::Other(
                format!("unknown role \"{other}\"").into(),
            )),
        }
    }
}

/// A user of the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// What the user is allowed to do.
    pub role: Role,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred, e.g. the
/// email is already taken.
pub fn create_user(
    name: &str,
    email: &str,
    role: Role,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (name, email, role) VALUES (?1, ?2, ?3)",
        (name, email, role),
    )?;

    Ok(User {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
        email: email.to_owned(),
        role,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, role FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id)], map_row)
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{Role, create_user, create_user_table, get_user_by_id};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).expect("Could not create user table");
        connection
    }

    #[test]
    fn create_user_then_get_by_id() {
        let connection = get_test_connection();

        let user = create_user("Superadmin", "admin@example.com", Role::Admin, &connection)
            .expect("Could not create user");

        assert_eq!(get_user_by_id(user.id, &connection), Ok(user));
    }

    #[test]
    fn duplicate_email_fails() {
        let connection = get_test_connection();
        create_user("A", "a@example.com", Role::Customer, &connection).unwrap();

        let result = create_user("B", "a@example.com", Role::Customer, &connection);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn missing_user_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_user_by_id(42, &connection), Err(Error::NotFound));
    }
}
