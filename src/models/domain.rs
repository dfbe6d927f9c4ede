use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::core::preferences::Rank;
use crate::core::registry::{
    Attribute, Category, Diet, Gender, RelationshipStatus, SmokingStatus,
};

/// Persisted rank map: attribute code (as a string) -> rank
///
/// Kept as raw JSON values so that corrupt rows surface as validation
/// errors on read instead of failing deserialization.
pub type StoredRankMap = BTreeMap<String, Value>;

/// A user row joined with its match preferences, as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub gender: i16,
    pub diet: i16,
    #[serde(rename = "smokingStatus")]
    pub smoking_status: i16,
    #[serde(rename = "relationshipStatus")]
    pub relationship_status: i16,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "heightCm", default)]
    pub height_cm: Option<i16>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "hasVisiblePhoto", default)]
    pub has_visible_photo: bool,
    #[serde(rename = "lastVisit")]
    pub last_visit: DateTime<Utc>,
    pub preference: PreferenceRecord,
}

fn default_true() -> bool {
    true
}

impl UserRecord {
    /// A new active profile with default (all-5) preferences
    pub fn new(
        id: Uuid,
        gender: Gender,
        date_of_birth: NaiveDate,
        last_visit: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            gender: gender.code(),
            diet: Diet::Unknown.code(),
            smoking_status: SmokingStatus::Unknown.code(),
            relationship_status: RelationshipStatus::Unknown.code(),
            date_of_birth,
            height_cm: None,
            is_active: true,
            has_visible_photo: false,
            last_visit,
            preference: PreferenceRecord::default(),
        }
    }
}

/// Stored match preferences of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRecord {
    #[serde(rename = "genderToMatch")]
    pub gender_to_match: Vec<i16>,
    #[serde(rename = "minAgeToMatch")]
    pub min_age_to_match: i16,
    #[serde(rename = "maxAgeToMatch")]
    pub max_age_to_match: i16,
    #[serde(rename = "dietMatch")]
    pub diet_match: StoredRankMap,
    #[serde(rename = "smokingStatusMatch")]
    pub smoking_status_match: StoredRankMap,
    #[serde(rename = "relationshipStatusMatch")]
    pub relationship_status_match: StoredRankMap,
}

impl PreferenceRecord {
    pub fn rank_map(&self, category: Category) -> &StoredRankMap {
        match category {
            Category::Diet => &self.diet_match,
            Category::SmokingStatus => &self.smoking_status_match,
            Category::RelationshipStatus => &self.relationship_status_match,
        }
    }
}

impl Default for PreferenceRecord {
    /// Profile-creation defaults: every gender, every age, every value ranked 5
    fn default() -> Self {
        Self {
            gender_to_match: Gender::ALL.iter().map(|g| g.code()).collect(),
            min_age_to_match: 0,
            max_age_to_match: 180,
            diet_match: default_rank_map::<Diet>(),
            smoking_status_match: default_rank_map::<SmokingStatus>(),
            relationship_status_match: default_rank_map::<RelationshipStatus>(),
        }
    }
}

fn default_rank_map<A: Attribute>() -> StoredRankMap {
    A::VALID_VALUES
        .iter()
        .map(|value| (value.key(), Value::from(Rank::FIVE.value())))
        .collect()
}

/// Directed block edge: `blocker_id` blocked `blocked_id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "blockerId")]
    pub blocker_id: Uuid,
    #[serde(rename = "blockedId")]
    pub blocked_id: Uuid,
}

/// Ranked candidate returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedMatch {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub rank: Rank,
    #[serde(rename = "lastVisit")]
    pub last_visit: DateTime<Utc>,
}

/// Indexed prefilter handed to the store
///
/// Only narrows the pool; the visibility filter re-checks every condition.
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub viewer_id: Uuid,
    pub viewer_gender: i16,
    pub viewer_age: u16,
    pub genders: Vec<i16>,
    pub earliest_birth_date: NaiveDate,
    pub latest_birth_date: NaiveDate,
    pub min_height_cm: i16,
    pub max_height_cm: i16,
}

/// Global matching bounds and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingRules {
    pub min_height_to_match: i16,
    pub max_height_to_match: i16,
    pub min_age_to_match_allowed: u16,
    pub max_age_to_match_allowed: u16,
    pub max_ranked_matches: usize,
}

impl Default for MatchingRules {
    fn default() -> Self {
        Self {
            min_height_to_match: 1,
            max_height_to_match: 450,
            min_age_to_match_allowed: 0,
            max_age_to_match_allowed: 180,
            max_ranked_matches: 360,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences_rank_everything_five() {
        let prefs = PreferenceRecord::default();
        assert_eq!(prefs.diet_match.len(), 3);
        assert_eq!(prefs.smoking_status_match.len(), 3);
        assert_eq!(prefs.relationship_status_match.len(), 8);
        assert!(prefs.relationship_status_match.values().all(|v| v == &Value::from(5)));
        assert_eq!(prefs.gender_to_match, vec![1, 2, 3]);
    }

    #[test]
    fn test_user_record_deserializes_camel_case() {
        let json = serde_json::json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "gender": 1,
            "diet": 2,
            "smokingStatus": 1,
            "relationshipStatus": 1,
            "dateOfBirth": "1990-05-01",
            "lastVisit": "2026-01-01T00:00:00Z",
            "preference": {
                "genderToMatch": [2],
                "minAgeToMatch": 25,
                "maxAgeToMatch": 40,
                "dietMatch": {"1": 5, "2": 5, "3": 0},
                "smokingStatusMatch": {"1": 5, "2": 0, "3": 2},
                "relationshipStatusMatch": {"1": 5}
            }
        });

        let record: UserRecord = serde_json::from_value(json).unwrap();
        assert!(record.is_active);
        assert!(!record.has_visible_photo);
        assert_eq!(record.height_cm, None);
        assert_eq!(record.preference.rank_map(Category::Diet)["3"], Value::from(0));
    }
}
