use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::future::Future;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CandidateQuery, UserRecord};

/// Errors that can occur when reading or writing match data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Read accessor for users, match preferences and blocks
///
/// The ranking engine never writes through this trait; `block` and
/// `unblock` exist for the request handlers that own those actions.
pub trait MatchStore: Send + Sync {
    /// Fetch a user joined with their match preferences
    fn get_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    /// Active users inside the pre-filter, most recent visit first
    fn query_candidates(
        &self,
        query: &CandidateQuery,
    ) -> impl Future<Output = Result<Vec<UserRecord>, StoreError>> + Send;

    /// Ids of every user with a block edge to or from `user_id`
    fn blocked_user_ids(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<HashSet<Uuid>, StoreError>> + Send;

    /// Whether either user has blocked the other
    fn there_is_block(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Record that `blocker` blocked `blocked`; returns false if it already existed
    fn block(
        &self,
        blocker: Uuid,
        blocked: Uuid,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Remove a block edge; returns false if there was none
    fn unblock(
        &self,
        blocker: Uuid,
        blocked: Uuid,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Active users within the height bounds who visited since `since`
    fn count_active_members(
        &self,
        since: DateTime<Utc>,
        min_height_cm: i16,
        max_height_cm: i16,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Whether the backing storage is reachable
    fn health_check(&self) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Reject a block edge from a user to themselves
pub(crate) fn ensure_not_self(blocker: Uuid, blocked: Uuid) -> Result<(), StoreError> {
    if blocker == blocked {
        return Err(StoreError::InvalidInput(
            "Users cannot block themselves".to_string(),
        ));
    }
    Ok(())
}
