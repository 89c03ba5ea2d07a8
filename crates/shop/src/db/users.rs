//! Identity lookups for the access gate.
//!
//! The `shop.user` table is owned by the auth layer; this repository only
//! reads the role column so the gate can decide per-actor instead of
//! comparing against a hardcoded administrator address.

use sqlx::PgPool;

use loomline_core::Email;

use super::RepositoryError;

/// Role assigned to an identity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Customer,
}

impl UserRole {
    /// Parse a role column value. Unknown values are treated as `Customer`;
    /// an unrecognized role must never grant admin capability.
    #[must_use]
    pub fn from_column(value: &str) -> Self {
        if value == "admin" {
            Self::Admin
        } else {
            Self::Customer
        }
    }
}

/// Repository for identity reads.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the role for an actor's email, or `None` if no identity row
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_role(&self, email: &Email) -> Result<Option<UserRole>, RepositoryError> {
        let role: Option<(String,)> =
            sqlx::query_as("SELECT role FROM shop.\"user\" WHERE email = $1")
                .bind(email.as_str())
                .fetch_optional(self.pool)
                .await?;

        Ok(role.map(|(value,)| UserRole::from_column(&value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_column() {
        assert_eq!(UserRole::from_column("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_column("customer"), UserRole::Customer);
        // Unknown roles never escalate
        assert_eq!(UserRole::from_column("superuser"), UserRole::Customer);
        assert_eq!(UserRole::from_column(""), UserRole::Customer);
    }
}
