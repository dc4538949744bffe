//! Token generation and validation
//!
//! Handles creation and verification of access and refresh tokens. The two
//! token kinds are signed with distinct secrets; an access token can never
//! pass refresh verification or vice versa. Claims stay minimal: the access
//! token carries the subject and role, the refresh token the subject only.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{User, UserRole};

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Signing configuration, built once from [`crate::config::Config`] at startup
/// and passed into the issuer/verifier explicitly.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_days: i64,
}

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Role at issuance time; re-checked against the user record on every request
    pub role: UserRole,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Claims carried by a refresh token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// A freshly issued access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Generate an access token for a user
pub fn generate_access_token(user: &User, config: &TokenConfig) -> Result<String, TokenError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(config.access_ttl_seconds);

    let claims = AccessClaims {
        sub: user.id.to_string(),
        role: user.role,
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.access_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Generate a refresh token for a user
pub fn generate_refresh_token(user_id: Uuid, config: &TokenConfig) -> Result<String, TokenError> {
    let now = Utc::now();
    let exp = now + Duration::days(config.refresh_ttl_days);

    let claims = RefreshClaims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.refresh_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Issue the access/refresh pair for a user
pub fn issue_token_pair(user: &User, config: &TokenConfig) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access_token: generate_access_token(user, config)?,
        refresh_token: generate_refresh_token(user.id, config)?,
    })
}

/// Verify and decode an access token
pub fn verify_access_token(token: &str, secret: &str) -> Result<AccessClaims, TokenError> {
    decode_claims(token, secret)
}

/// Verify and decode a refresh token
pub fn verify_refresh_token(token: &str, secret: &str) -> Result<RefreshClaims, TokenError> {
    decode_claims(token, secret)
}

fn decode_claims<C: serde::de::DeserializeOwned>(
    token: &str,
    secret: &str,
) -> Result<C, TokenError> {
    // Zero leeway: a token is valid up to the last second of its lifetime and
    // rejected from the expiry instant on.
    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })?;

    Ok(data.claims)
}

/// Extract the subject user ID from claims
pub fn subject_id(sub: &str) -> Result<Uuid, TokenError> {
    Uuid::parse_str(sub).map_err(|e| TokenError::Invalid(e.to_string()))
}
