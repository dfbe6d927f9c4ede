use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::visibility::matches_candidate_query;
use crate::models::{Block, CandidateQuery, UserRecord};
use crate::services::store::{ensure_not_self, MatchStore, StoreError};

/// In-memory store
///
/// Holds users and blocks behind async locks. Used by the test suite and
/// for running the service without a database.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    blocks: RwLock<HashSet<Block>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = UserRecord>,
    {
        let store = Self::new();
        for user in users {
            store.save_user(user).await;
        }
        store
    }

    /// Insert or replace a user
    pub async fn save_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl MatchStore for InMemoryStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn query_candidates(&self, query: &CandidateQuery) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().await;
        let mut candidates: Vec<UserRecord> = users
            .values()
            .filter(|record| matches_candidate_query(record, query))
            .cloned()
            .collect();

        candidates.sort_by(|a, b| b.last_visit.cmp(&a.last_visit).then_with(|| a.id.cmp(&b.id)));

        tracing::trace!("In-memory pre-filter kept {} of {} users", candidates.len(), users.len());
        Ok(candidates)
    }

    async fn blocked_user_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, StoreError> {
        let blocks = self.blocks.read().await;
        Ok(blocks
            .iter()
            .filter_map(|block| {
                if block.blocker_id == user_id {
                    Some(block.blocked_id)
                } else if block.blocked_id == user_id {
                    Some(block.blocker_id)
                } else {
                    None
                }
            })
            .collect())
    }

    async fn there_is_block(&self, user_a: Uuid, user_b: Uuid) -> Result<bool, StoreError> {
        let blocks = self.blocks.read().await;
        Ok(blocks.contains(&Block { blocker_id: user_a, blocked_id: user_b })
            || blocks.contains(&Block { blocker_id: user_b, blocked_id: user_a }))
    }

    async fn block(&self, blocker: Uuid, blocked: Uuid) -> Result<bool, StoreError> {
        ensure_not_self(blocker, blocked)?;
        let created = self.blocks.write().await.insert(Block {
            blocker_id: blocker,
            blocked_id: blocked,
        });
        tracing::debug!("Block {} -> {} (created: {})", blocker, blocked, created);
        Ok(created)
    }

    async fn unblock(&self, blocker: Uuid, blocked: Uuid) -> Result<bool, StoreError> {
        Ok(self.blocks.write().await.remove(&Block {
            blocker_id: blocker,
            blocked_id: blocked,
        }))
    }

    async fn count_active_members(
        &self,
        since: DateTime<Utc>,
        min_height_cm: i16,
        max_height_cm: i16,
    ) -> Result<i64, StoreError> {
        let users = self.users.read().await;
        let count = users
            .values()
            .filter(|user| user.is_active && user.last_visit >= since)
            .filter(|user| matches!(user.height_cm, Some(h) if h >= min_height_cm && h <= max_height_cm))
            .count();
        Ok(count as i64)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Gender;
    use chrono::{NaiveDate, TimeZone};

    fn user(gender: Gender) -> UserRecord {
        let mut record = UserRecord::new(
            Uuid::new_v4(),
            gender,
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        );
        record.height_cm = Some(170);
        record
    }

    #[tokio::test]
    async fn test_block_is_directed_but_checked_both_ways() {
        let store = InMemoryStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(store.block(a, b).await.unwrap());
        assert!(!store.block(a, b).await.unwrap());
        assert!(store.there_is_block(a, b).await.unwrap());
        assert!(store.there_is_block(b, a).await.unwrap());
        assert!(store.blocked_user_ids(b).await.unwrap().contains(&a));

        // Only the blocker can lift it
        assert!(!store.unblock(b, a).await.unwrap());
        assert!(store.unblock(a, b).await.unwrap());
        assert!(!store.there_is_block(a, b).await.unwrap());
    }

    #[tokio::test]
    async fn test_cannot_block_self() {
        let store = InMemoryStore::new();
        let a = Uuid::new_v4();

        assert!(matches!(store.block(a, a).await, Err(StoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_count_active_members() {
        let mut inactive = user(Gender::Male);
        inactive.is_active = false;
        let mut stale = user(Gender::Female);
        stale.last_visit = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let store = InMemoryStore::with_users([user(Gender::Female), inactive, stale]).await;

        let since = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        assert_eq!(store.count_active_members(since, 1, 450).await.unwrap(), 1);
        assert_eq!(store.user_count().await, 3);
    }
}
