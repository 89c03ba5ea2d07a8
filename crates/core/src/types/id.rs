//! Newtype IDs for type-safe entity references.
//!
//! Catalog entities are keyed by UUIDs. Wrapping the raw [`uuid::Uuid`] keeps
//! identifier parsing in one place: a malformed textual id is an [`IdError`]
//! (the caller's fault), which callers surface separately from a lookup that
//! finds nothing.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing an ID from text.
#[derive(thiserror::Error, Debug, Clone)]
pub enum IdError {
    /// The input is not a valid UUID.
    #[error("malformed id: {0}")]
    Malformed(String),
}

/// Identifier of a catalog product.
///
/// ```
/// use loomline_core::ProductId;
///
/// assert!(ProductId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_ok());
/// assert!(ProductId::parse("not-a-uuid").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a `ProductId` from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Malformed`] if the input is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdError::Malformed(s.to_owned()))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ProductId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<ProductId> for Uuid {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ProductId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Uuid as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ProductId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <Uuid as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ProductId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Uuid as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = ProductId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            ProductId::parse("not-a-uuid"),
            Err(IdError::Malformed(_))
        ));
        assert!(matches!(ProductId::parse(""), Err(IdError::Malformed(_))));
    }

    #[test]
    fn test_round_trip_through_text() {
        let id = ProductId::new(Uuid::new_v4());
        let parsed = ProductId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");

        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
