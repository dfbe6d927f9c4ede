use thiserror::Error;
use uuid::Uuid;

use crate::core::registry::Category;
use crate::services::StoreError;

/// Errors raised by the ranking engine
///
/// Everything except `Store` is fatal for the user it concerns: the
/// computation for that user halts instead of guessing a default.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Configuration error: unknown attribute category '{0}'")]
    Configuration(String),

    #[error("Incomplete rank map: user {user_id} has no {category} rank for value '{missing}'")]
    IncompleteRankMap {
        user_id: Uuid,
        category: Category,
        missing: String,
    },

    #[error("Invalid rank value: user {user_id} has {category} rank {value} for value '{key}'")]
    InvalidRankValue {
        user_id: Uuid,
        category: Category,
        key: String,
        value: String,
    },

    #[error("Unknown rank key: user {user_id} has {category} rank for unregistered value '{key}'")]
    UnknownRankKey {
        user_id: Uuid,
        category: Category,
        key: String,
    },

    #[error("Missing perfect rank: user {user_id} has no {category} value ranked 5")]
    MissingPerfectRank { user_id: Uuid, category: Category },

    #[error("Invalid preferences for user {user_id}: {reason}")]
    InvalidPreferences { user_id: Uuid, reason: String },

    #[error("Invalid attribute for user {user_id}: {reason}")]
    InvalidAttribute { user_id: Uuid, reason: String },

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MatchError {
    /// Whether this error reports corrupt or misconfigured data rather than
    /// a missing record or a storage failure
    pub fn is_data_integrity(&self) -> bool {
        !matches!(self, MatchError::UserNotFound(_) | MatchError::Store(_))
    }
}
