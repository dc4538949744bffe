//! Data models for the Wanderwise backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth;
pub use auth::*;

/// User model as exposed through the API and the default read paths.
///
/// The password hash and the stored refresh token are deliberately not fields
/// of this type; only [`UserWithSecrets`] carries them, and only the login and
/// refresh paths read it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub role: UserRole,
    pub verified: bool,
    pub disabled: bool,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// User row including secret columns.
///
/// Returned only by the credential-store lookups that the login and
/// token-refresh paths use.
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct UserWithSecrets {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub role: UserRole,
    pub verified: bool,
    pub disabled: bool,
    pub refresh_token: Option<String>,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserWithSecrets {
    /// Drop the secret columns.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            country: self.country,
            role: self.role,
            verified: self.verified,
            disabled: self.disabled,
            last_active: self.last_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).unwrap(),
            r#""admin""#
        );

        let role: UserRole = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_user_serialization_has_no_secret_fields() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
            phone: None,
            country: None,
            role: UserRole::User,
            verified: false,
            disabled: false,
            last_active: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("refreshToken").is_none());
        assert_eq!(json["firstName"], "A");
        assert_eq!(json["role"], "user");
    }
}
