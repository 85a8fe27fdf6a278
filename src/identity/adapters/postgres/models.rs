//! Diesel row models for user persistence.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique login name.
    pub username: String,
    /// Bcrypt password hash.
    pub password_hash: String,
    /// Account role.
    pub role: String,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique login name.
    pub username: String,
    /// Bcrypt password hash.
    pub password_hash: String,
    /// Account role.
    pub role: String,
}
