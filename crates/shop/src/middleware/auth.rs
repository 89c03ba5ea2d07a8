//! Actor identity and the admin access gate.
//!
//! Authentication itself (credentials, cookies, session issuance) is owned
//! by the session layer that runs upstream of these routes; it establishes
//! the actor's [`Identity`] and stores it in request extensions. This module
//! only answers the capability question: is this actor an admin?
//!
//! Admin capability is a per-actor role resolved from the identity store,
//! not a comparison against a privileged literal.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use sqlx::PgPool;

use loomline_core::Email;

use crate::db::{UserRepository, UserRole};
use crate::error::AppError;

/// The authenticated actor, as established by the upstream session layer.
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: Email,
}

/// Extractor for the current actor.
///
/// Rejects with `Forbidden` when no identity was established; a protected
/// operation never answers an anonymous caller with empty data.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentActor(actor): CurrentActor,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", actor.email)
/// }
/// ```
pub struct CurrentActor(pub Identity);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Self)
            .ok_or(AppError::Forbidden)
    }
}

/// Capability check over the current actor.
pub struct AccessGate<'a> {
    pool: &'a PgPool,
}

impl<'a> AccessGate<'a> {
    /// Create a gate over the identity store.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Require the actor to hold the admin role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` when the actor has no identity row or a
    /// non-admin role; `AppError::Store` if the lookup itself fails.
    pub async fn require_admin(&self, actor: &Identity) -> Result<(), AppError> {
        let role = UserRepository::new(self.pool).get_role(&actor.email).await?;

        match role {
            Some(UserRole::Admin) => Ok(()),
            Some(UserRole::Customer) | None => {
                tracing::warn!(actor = %actor.email, "admin gate rejected actor");
                Err(AppError::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_identity_is_forbidden() {
        let request = axum::http::Request::builder()
            .uri("/api/orders")
            .body(())
            .expect("request");
        let (mut parts, ()) = request.into_parts();

        let result = CurrentActor::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_identity_extension_is_read() {
        let mut builder = axum::http::Request::builder().uri("/api/orders");
        if let Some(extensions) = builder.extensions_mut() {
            extensions.insert(Identity {
                email: Email::parse("admin@example.com").expect("email"),
            });
        }
        let (mut parts, ()) = builder.body(()).expect("request").into_parts();

        let CurrentActor(actor) = CurrentActor::from_request_parts(&mut parts, &())
            .await
            .expect("actor");
        assert_eq!(actor.email.as_str(), "admin@example.com");
    }
}
