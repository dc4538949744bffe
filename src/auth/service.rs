//! Session lifecycle controller
//!
//! Orchestrates register, login, token refresh, and logout on top of the
//! credential store and the token issuer, and records login telemetry.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::store::{NewUser, StoreError, UserStore};
use super::token::{
    self, issue_token_pair, verify_refresh_token, TokenConfig, TokenError, TokenPair,
};
use crate::error::ApiError;
use crate::models::{
    first_validation_message, LoginRequest, RegisterRequest, UpdateProfileRequest, User,
};
use crate::services::AnalyticsService;

/// Auth flow errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials. Please check your email and password.")]
    InvalidCredentials,

    #[error("Your account has been disabled.")]
    AccountDisabled,

    #[error("User not found or account disabled")]
    Unauthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(message) => ApiError::Validation(message),
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::AccountDisabled => ApiError::AccountDisabled,
            AuthError::Unauthenticated => ApiError::Unauthenticated,
            AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            AuthError::InvalidRefreshToken => ApiError::TokenInvalid,
            AuthError::Token(TokenError::Expired) => ApiError::TokenExpired,
            AuthError::Token(_) => ApiError::TokenInvalid,
            AuthError::Store(StoreError::Duplicate(message)) => ApiError::Duplicate(message),
            AuthError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

/// A user together with the token pair issued for them
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: UserStore,
    tokens: TokenConfig,
    analytics: AnalyticsService,
}

impl AuthService {
    pub fn new(store: UserStore, tokens: TokenConfig, analytics: AnalyticsService) -> Self {
        Self {
            store,
            tokens,
            analytics,
        }
    }

    /// Register a new account and log it in immediately: the new user gets a
    /// token pair and a persisted refresh token, exactly as if they had
    /// registered and then called login.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, AuthError> {
        let request = request.normalized();
        request
            .validate()
            .map_err(|e| AuthError::Validation(first_validation_message(&e)))?;

        let user = self
            .store
            .create(NewUser {
                username: request.username,
                email: request.email,
                password: request.password,
                first_name: request.first_name,
                last_name: request.last_name,
            })
            .await?;

        let tokens = issue_token_pair(&user, &self.tokens)?;
        self.store
            .set_refresh_token(user.id, Some(&tokens.refresh_token))
            .await?;

        if let Err(e) = self.analytics.record_auth_event(user.id, "register").await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to record registration event");
        }

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthSession { user, tokens })
    }

    /// Log a user in. Unknown email and wrong password produce the same
    /// error; the disabled check runs only after the password matched, so a
    /// disabled response never reveals whether a password was correct for a
    /// nonexistent account.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AuthError> {
        let request = request.normalized();
        request
            .validate()
            .map_err(|e| AuthError::Validation(first_validation_message(&e)))?;

        let record = self
            .store
            .find_by_email_with_secrets(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.store.verify_password(&record, &request.password)? {
            tracing::warn!(email = %request.email, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        if record.disabled {
            return Err(AuthError::AccountDisabled);
        }

        let mut user = record.into_user();
        let tokens = issue_token_pair(&user, &self.tokens)?;

        // New login overwrites the stored refresh token; any previous
        // device's refresh token stops working from here on.
        self.store
            .set_refresh_token(user.id, Some(&tokens.refresh_token))
            .await?;
        self.store.touch_last_active(user.id).await?;
        user.last_active = Utc::now();

        if let Err(e) = self.analytics.record_login(user.id).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to record login");
        }

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            role = %user.role.as_str(),
            "User logged in"
        );

        Ok(AuthSession { user, tokens })
    }

    /// Mint a fresh token pair from a refresh token. The presented token must
    /// verify against the refresh secret and equal the stored one; after a
    /// logout (slot cleared) or a newer login (slot overwritten) it no longer
    /// does.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let claims = verify_refresh_token(refresh_token, &self.tokens.refresh_secret)?;
        let user_id = token::subject_id(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        let record = self
            .store
            .find_secrets_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        match record.refresh_token.as_deref() {
            Some(stored) if stored == refresh_token => {}
            _ => return Err(AuthError::InvalidRefreshToken),
        }

        if record.disabled {
            return Err(AuthError::AccountDisabled);
        }

        let user = record.into_user();
        let tokens = issue_token_pair(&user, &self.tokens)?;
        self.store
            .set_refresh_token(user.id, Some(&tokens.refresh_token))
            .await?;

        Ok(AuthSession { user, tokens })
    }

    /// Clear the stored refresh token. The caller's access token remains
    /// cryptographically valid until its own expiry; only the refresh path is
    /// cut off.
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.store.set_refresh_token(user_id, None).await?;
        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Re-read the current user for /auth/me.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Resolve the subject of a verified access token to a live account.
    /// Missing and disabled accounts are reported identically.
    pub async fn find_active_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        if user.disabled {
            return Err(AuthError::Unauthenticated);
        }

        Ok(user)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<User, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(first_validation_message(&e)))?;

        self.store
            .update_profile(
                user_id,
                request.first_name.as_deref().map(str::trim),
                request.last_name.as_deref().map(str::trim),
                request.phone.as_deref().map(str::trim),
                request.country.as_deref().map(str::trim),
            )
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.store.list().await?)
    }

    pub async fn set_user_disabled(
        &self,
        user_id: Uuid,
        disabled: bool,
    ) -> Result<User, AuthError> {
        self.store
            .set_disabled(user_id, disabled)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Secret the verifier middleware checks access tokens against.
    pub fn access_secret(&self) -> &str {
        &self.tokens.access_secret
    }
}
