//! Diesel schema for user persistence.

diesel::table! {
    /// Seeded user accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 100]
        username -> Varchar,
        /// Bcrypt password hash.
        #[max_length = 255]
        password_hash -> Varchar,
        /// Account role.
        #[max_length = 20]
        role -> Varchar,
    }
}
