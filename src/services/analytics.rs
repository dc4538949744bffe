//! Login telemetry
//!
//! Records one event row per register/login and keeps a per-user login
//! counter with the last login time. Failures here are reported to the
//! caller, which logs and continues; telemetry never blocks an auth flow.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Per-user login counters
#[derive(Debug, sqlx::FromRow)]
pub struct LoginStats {
    pub user_id: Uuid,
    pub login_count: i64,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    pool: SqlitePool,
}

impl AnalyticsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an auth event (e.g. "register", "login").
    pub async fn record_auth_event(&self, user_id: Uuid, action: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO auth_events (id, user_id, action, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(action)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a successful login: bump the counter, stamp the time, and
    /// append the event row.
    pub async fn record_login(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO login_stats (user_id, login_count, last_login)
            VALUES ($1, 1, $2)
            ON CONFLICT(user_id) DO UPDATE SET
                login_count = login_count + 1,
                last_login = excluded.last_login
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.record_auth_event(user_id, "login").await
    }

    pub async fn login_stats(&self, user_id: Uuid) -> Result<Option<LoginStats>, sqlx::Error> {
        sqlx::query_as::<_, LoginStats>(
            "SELECT user_id, login_count, last_login FROM login_stats WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
