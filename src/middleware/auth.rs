//! Authentication extractors
//!
//! The token verifier and the role gate, expressed as axum extractors so any
//! handler argument position turns a route into a protected route.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use crate::auth::token::{subject_id, verify_access_token, TokenError};
use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::{User, UserRole};

/// Identity resolved from a verified bearer token.
///
/// Holds the freshly re-fetched user record, not the token claims: the role
/// and the disabled flag are current as of this request, so a role change or
/// an account disable takes effect on the next request even though issued
/// access tokens stay cryptographically valid.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Role gate: pass only when an identity is present and its role is in the
/// allowed set.
pub fn require_roles(
    user: Option<&AuthenticatedUser>,
    allowed: &[UserRole],
) -> Result<(), ApiError> {
    match user {
        Some(identity) if allowed.contains(&identity.user.role) => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::TokenMissing)?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims =
            verify_access_token(bearer.token(), auth_service.access_secret()).map_err(
                |e| match e {
                    TokenError::Expired => ApiError::TokenExpired,
                    _ => ApiError::TokenInvalid,
                },
            )?;

        let user_id = subject_id(&claims.sub).map_err(|_| ApiError::TokenInvalid)?;

        // Missing account and disabled account produce the same rejection;
        // storage failures surface as 500 instead.
        let user = auth_service
            .find_active_user(user_id)
            .await
            .map_err(ApiError::from)?;

        Ok(AuthenticatedUser { user })
    }
}

/// Non-blocking variant for routes serving both anonymous and authenticated
/// callers: any failure resolves to `None` instead of rejecting.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthenticatedUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(_) => Ok(OptionalUser(None)),
        }
    }
}

/// The admin gate: verify, then require the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        require_roles(Some(&user), &[UserRole::Admin])?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn identity(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user: User {
                id: Uuid::new_v4(),
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                first_name: "A".to_string(),
                last_name: "L".to_string(),
                phone: None,
                country: None,
                role,
                verified: false,
                disabled: false,
                last_active: Utc::now(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_require_roles_accepts_allowed_role() {
        let admin = identity(UserRole::Admin);
        assert!(require_roles(Some(&admin), &[UserRole::Admin]).is_ok());

        let user = identity(UserRole::User);
        assert!(require_roles(Some(&user), &[UserRole::User, UserRole::Admin]).is_ok());
    }

    #[test]
    fn test_require_roles_rejects_wrong_role() {
        let user = identity(UserRole::User);
        let err = require_roles(Some(&user), &[UserRole::Admin]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn test_require_roles_rejects_absent_identity() {
        let err = require_roles(None, &[UserRole::Admin]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
