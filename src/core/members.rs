use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::MatchError;
use crate::models::MatchingRules;
use crate::services::MatchStore;

/// Window for the long activity count, roughly four months
pub const LONG_WINDOW_DAYS: i64 = 120;
pub const SHORT_WINDOW_DAYS: i64 = 7;

/// Counts below these are too small to show to anyone
pub const MIN_DISPLAYABLE_LONG: i64 = 300;
pub const MIN_DISPLAYABLE_SHORT: i64 = 50;

/// Number of recently active, height-eligible members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveMemberCounts {
    #[serde(rename = "lastFourMonths")]
    pub last_four_months: i64,
    #[serde(rename = "lastWeek")]
    pub last_week: i64,
}

impl ActiveMemberCounts {
    pub fn is_displayable(&self) -> bool {
        self.last_four_months >= MIN_DISPLAYABLE_LONG && self.last_week >= MIN_DISPLAYABLE_SHORT
    }
}

/// Count active members over both windows ending at `now`
pub async fn count_active_members<S: MatchStore>(
    store: &S,
    rules: &MatchingRules,
    now: DateTime<Utc>,
) -> Result<ActiveMemberCounts, MatchError> {
    let (min_height, max_height) = (rules.min_height_to_match, rules.max_height_to_match);

    let last_four_months = store
        .count_active_members(now - Duration::days(LONG_WINDOW_DAYS), min_height, max_height)
        .await?;
    let last_week = store
        .count_active_members(now - Duration::days(SHORT_WINDOW_DAYS), min_height, max_height)
        .await?;

    tracing::debug!(
        "Active members: {} in {} days, {} in {} days",
        last_four_months,
        LONG_WINDOW_DAYS,
        last_week,
        SHORT_WINDOW_DAYS
    );

    Ok(ActiveMemberCounts {
        last_four_months,
        last_week,
    })
}
