//! Credential store
//!
//! Owns the user record. Password hashing happens inside [`UserStore::create`],
//! so every creation path pays the hashing cost; there is no unhashed write
//! path. Reads omit the secret columns except for the two lookups the login
//! and refresh flows use.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use super::password;
use crate::models::{User, UserRole, UserWithSecrets};

/// Columns exposed by the default read paths. `password_hash` and
/// `refresh_token` are never selected here.
const USER_COLUMNS: &str = "id, username, email, first_name, last_name, phone, country, \
     role, verified, disabled, last_active, created_at, updated_at";

const SECRET_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     phone, country, role, verified, disabled, refresh_token, last_active, created_at, updated_at";

/// Credential store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Duplicate(String),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Input for creating a user. Fields are expected normalized (trimmed,
/// username/email lower-cased); the password arrives as plaintext and is
/// hashed here.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// SQLite-backed user store
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
    bcrypt_cost: u32,
}

impl UserStore {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Create a user with the default role. Rejects duplicate email or
    /// username (both checks case-insensitive via the stored lower-cased
    /// values), distinguishing which one collided in the error message.
    pub async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let existing: Option<String> =
            sqlx::query_scalar("SELECT email FROM users WHERE email = $1 OR username = $2")
                .bind(&new_user.email)
                .bind(&new_user.username)
                .fetch_optional(&self.pool)
                .await?;

        if let Some(existing_email) = existing {
            let message = if existing_email == new_user.email {
                "Email is already registered"
            } else {
                "Username is already taken"
            };
            return Err(StoreError::Duplicate(message.to_string()));
        }

        let password_hash = password::hash_password(&new_user.password, self.bcrypt_cost)?;

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            phone: None,
            country: None,
            role: UserRole::User,
            verified: false,
            disabled: false,
            last_active: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users
                (id, username, email, password_hash, first_name, last_name,
                 role, verified, disabled, last_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.verified)
        .bind(user.disabled)
        .bind(user.last_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// The only email lookup that exposes the secret columns; used by the
    /// login path, which needs the stored hash.
    pub async fn find_by_email_with_secrets(
        &self,
        email: &str,
    ) -> Result<Option<UserWithSecrets>, StoreError> {
        let row = sqlx::query_as::<_, UserWithSecrets>(&format!(
            "SELECT {SECRET_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Secret-bearing lookup by id; used by the refresh rotation path to
    /// compare the stored refresh token.
    pub async fn find_secrets_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<UserWithSecrets>, StoreError> {
        let row = sqlx::query_as::<_, UserWithSecrets>(&format!(
            "SELECT {SECRET_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Check a plaintext password against a user's stored hash.
    pub fn verify_password(
        &self,
        user: &UserWithSecrets,
        plain: &str,
    ) -> Result<bool, StoreError> {
        Ok(password::verify_password(plain, &user.password_hash)?)
    }

    /// Overwrite (or clear) the single stored refresh token. Concurrent
    /// writers race last-write-wins; there is deliberately no compare-and-swap.
    pub async fn set_refresh_token(
        &self,
        id: Uuid,
        token: Option<&str>,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET refresh_token = $1, updated_at = $2 WHERE id = $3")
            .bind(token)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn touch_last_active(&self, id: Uuid) -> Result<(), StoreError> {
        let now = Utc::now();
        sqlx::query("UPDATE users SET last_active = $1, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Administrative disabled toggle. Returns the updated record, or `None`
    /// if no such user exists.
    pub async fn set_disabled(&self, id: Uuid, disabled: bool) -> Result<Option<User>, StoreError> {
        let result = sqlx::query("UPDATE users SET disabled = $1, updated_at = $2 WHERE id = $3")
            .bind(disabled)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    /// Partial profile update; absent fields keep their current values.
    pub async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone: Option<&str>,
        country: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        sqlx::query(
            r#"
            UPDATE users SET
                first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                phone = COALESCE($3, phone),
                country = COALESCE($4, country),
                updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(country)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    const TEST_COST: u32 = 4;

    fn alice() -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
        }
    }

    async fn test_store() -> UserStore {
        UserStore::new(memory_pool().await, TEST_COST)
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let store = test_store().await;
        let created = store.create(alice()).await.unwrap();

        assert_eq!(created.role, UserRole::User);
        assert!(!created.disabled);
        assert!(!created.verified);

        let fetched = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.username, "alice");
    }

    #[tokio::test]
    async fn test_stored_secret_is_hashed() {
        let store = test_store().await;
        let created = store.create(alice()).await.unwrap();

        let record = store
            .find_by_email_with_secrets("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.id, created.id);
        assert_ne!(record.password_hash, "secret1");
        assert!(store.verify_password(&record, "secret1").unwrap());
        assert!(!store.verify_password(&record, "wrong").unwrap());
    }

    #[tokio::test]
    async fn test_same_password_stores_different_hashes() {
        let store = test_store().await;
        store.create(alice()).await.unwrap();
        store
            .create(NewUser {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
                ..alice()
            })
            .await
            .unwrap();

        let a = store
            .find_by_email_with_secrets("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        let b = store
            .find_by_email_with_secrets("bob@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(a.password_hash, b.password_hash);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = test_store().await;
        store.create(alice()).await.unwrap();

        let err = store
            .create(NewUser {
                username: "alice2".to_string(),
                ..alice()
            })
            .await
            .unwrap_err();

        match err {
            StoreError::Duplicate(message) => {
                assert_eq!(message, "Email is already registered")
            }
            other => panic!("expected Duplicate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = test_store().await;
        store.create(alice()).await.unwrap();

        let err = store
            .create(NewUser {
                email: "other@example.com".to_string(),
                ..alice()
            })
            .await
            .unwrap_err();

        match err {
            StoreError::Duplicate(message) => assert_eq!(message, "Username is already taken"),
            other => panic!("expected Duplicate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_token_slot_overwrites() {
        let store = test_store().await;
        let user = store.create(alice()).await.unwrap();

        store
            .set_refresh_token(user.id, Some("first-token"))
            .await
            .unwrap();
        store
            .set_refresh_token(user.id, Some("second-token"))
            .await
            .unwrap();

        let record = store.find_secrets_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(record.refresh_token.as_deref(), Some("second-token"));

        store.set_refresh_token(user.id, None).await.unwrap();
        let record = store.find_secrets_by_id(user.id).await.unwrap().unwrap();
        assert!(record.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_set_disabled() {
        let store = test_store().await;
        let user = store.create(alice()).await.unwrap();

        let updated = store.set_disabled(user.id, true).await.unwrap().unwrap();
        assert!(updated.disabled);

        let missing = store.set_disabled(Uuid::new_v4(), true).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_profile_partial() {
        let store = test_store().await;
        let user = store.create(alice()).await.unwrap();

        let updated = store
            .update_profile(user.id, None, None, Some("+49 151 0000"), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.first_name, "A");
        assert_eq!(updated.phone.as_deref(), Some("+49 151 0000"));
        assert!(updated.country.is_none());
    }
}
