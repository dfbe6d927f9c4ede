use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::RankedMatch;

/// Response for the matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub matches: Vec<RankedMatch>,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "hasNext")]
    pub has_next: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Block or unblock response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResponse {
    pub success: bool,
    /// False when the request left the block list unchanged
    pub changed: bool,
}

/// Active member counts response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveMembersResponse {
    #[serde(rename = "lastFourMonths")]
    pub last_four_months: i64,
    #[serde(rename = "lastWeek")]
    pub last_week: i64,
    pub displayable: bool,
}
