use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::time::Duration;
use uuid::Uuid;

use crate::models::{CandidateQuery, PreferenceRecord, StoredRankMap, UserRecord};
use crate::services::store::{ensure_not_self, MatchStore, StoreError};

const USER_COLUMNS: &str = r#"
    u.id, u.gender, u.diet, u.smoking_status, u.relationship_status,
    u.date_of_birth, u.height_cm, u.is_active, u.has_visible_photo, u.last_visit,
    p.gender_to_match, p.min_age_to_match, p.max_age_to_match,
    p.diet_match, p.smoking_status_match, p.relationship_status_match
"#;

/// PostgreSQL store for users, match preferences and blocks
///
/// Rank maps are kept in JSONB columns and decoded as raw JSON; they are
/// validated by the preference store on read.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StoreError> {
    let diet_match: Json<StoredRankMap> = row.try_get("diet_match")?;
    let smoking_status_match: Json<StoredRankMap> = row.try_get("smoking_status_match")?;
    let relationship_status_match: Json<StoredRankMap> = row.try_get("relationship_status_match")?;

    Ok(UserRecord {
        id: row.try_get("id")?,
        gender: row.try_get("gender")?,
        diet: row.try_get("diet")?,
        smoking_status: row.try_get("smoking_status")?,
        relationship_status: row.try_get("relationship_status")?,
        date_of_birth: row.try_get("date_of_birth")?,
        height_cm: row.try_get("height_cm")?,
        is_active: row.try_get("is_active")?,
        has_visible_photo: row.try_get("has_visible_photo")?,
        last_visit: row.try_get("last_visit")?,
        preference: PreferenceRecord {
            gender_to_match: row.try_get("gender_to_match")?,
            min_age_to_match: row.try_get("min_age_to_match")?,
            max_age_to_match: row.try_get("max_age_to_match")?,
            diet_match: diet_match.0,
            smoking_status_match: smoking_status_match.0,
            relationship_status_match: relationship_status_match.0,
        },
    })
}

impl MatchStore for PostgresStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users u
            JOIN match_preferences p ON p.user_id = u.id
            WHERE u.id = $1
            "#
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Uses the (gender, date_of_birth) index; mutual gender and age are
    /// checked against the candidate's preferences as well.
    async fn query_candidates(&self, query: &CandidateQuery) -> Result<Vec<UserRecord>, StoreError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users u
            JOIN match_preferences p ON p.user_id = u.id
            WHERE u.is_active
              AND u.id <> $1
              AND u.gender = ANY($2)
              AND $3 = ANY(p.gender_to_match)
              AND u.date_of_birth BETWEEN $4 AND $5
              AND p.min_age_to_match <= $6
              AND p.max_age_to_match >= $6
              AND u.height_cm BETWEEN $7 AND $8
            ORDER BY u.last_visit DESC, u.id
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(query.viewer_id)
            .bind(&query.genders)
            .bind(query.viewer_gender)
            .bind(query.earliest_birth_date)
            .bind(query.latest_birth_date)
            .bind(query.viewer_age as i16)
            .bind(query.min_height_cm)
            .bind(query.max_height_cm)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Pre-filter returned {} candidates for {}", rows.len(), query.viewer_id);

        rows.iter().map(user_from_row).collect()
    }

    async fn blocked_user_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, StoreError> {
        let query = r#"
            SELECT blocked_id AS other_id FROM blocks WHERE blocker_id = $1
            UNION
            SELECT blocker_id AS other_id FROM blocks WHERE blocked_id = $1
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| row.try_get("other_id").map_err(Into::into))
            .collect()
    }

    async fn there_is_block(&self, user_a: Uuid, user_b: Uuid) -> Result<bool, StoreError> {
        let query = r#"
            SELECT EXISTS (
                SELECT 1 FROM blocks
                WHERE (blocker_id = $1 AND blocked_id = $2)
                   OR (blocker_id = $2 AND blocked_id = $1)
            ) AS there_is_block
        "#;

        let row = sqlx::query(query)
            .bind(user_a)
            .bind(user_b)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("there_is_block")?)
    }

    /// Uses INSERT ... ON CONFLICT so repeated blocks are no-ops
    async fn block(&self, blocker: Uuid, blocked: Uuid) -> Result<bool, StoreError> {
        ensure_not_self(blocker, blocked)?;

        let query = r#"
            INSERT INTO blocks (blocker_id, blocked_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (blocker_id, blocked_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(blocker)
            .bind(blocked)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded block: {} -> {}", blocker, blocked);

        Ok(result.rows_affected() > 0)
    }

    async fn unblock(&self, blocker: Uuid, blocked: Uuid) -> Result<bool, StoreError> {
        let query = r#"
            DELETE FROM blocks
            WHERE blocker_id = $1 AND blocked_id = $2
        "#;

        let result = sqlx::query(query)
            .bind(blocker)
            .bind(blocked)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active_members(
        &self,
        since: DateTime<Utc>,
        min_height_cm: i16,
        max_height_cm: i16,
    ) -> Result<i64, StoreError> {
        let query = r#"
            SELECT COUNT(*) AS total
            FROM users
            WHERE is_active
              AND height_cm BETWEEN $2 AND $3
              AND last_visit >= $1
        "#;

        let row = sqlx::query(query)
            .bind(since)
            .bind(min_height_cm)
            .bind(max_height_cm)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("total")?)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
