use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Query parameters of the matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GetMatchesRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: Uuid,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: usize,
    #[validate(range(min = 1))]
    #[serde(alias = "page_size", rename = "pageSize")]
    pub page_size: Option<usize>,
}

fn default_page() -> usize {
    1
}

/// Request to create or lift a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRequest {
    #[serde(alias = "blocker_id", rename = "blockerId")]
    pub blocker_id: Uuid,
    #[serde(alias = "blocked_id", rename = "blockedId")]
    pub blocked_id: Uuid,
}
