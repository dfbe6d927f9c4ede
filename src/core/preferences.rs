//! Preference store
//!
//! Reads a persisted [`UserRecord`] into a strongly typed [`MatchProfile`].
//! Rank maps are validated here, on read, because the storage layer keeps
//! them as free-form JSON: a map must be total over the category's valid
//! values, hold only integers in 0..=5, and rank at least one value 5.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::core::age::age_on;
use crate::core::error::MatchError;
use crate::core::registry::{
    Attribute, Category, Diet, Gender, RelationshipStatus, SmokingStatus,
};
use crate::models::{MatchingRules, StoredRankMap, UserRecord};

/// Compatibility rank, 0 ("never") to 5 ("perfect")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const ZERO: Rank = Rank(0);
    pub const ONE: Rank = Rank(1);
    pub const TWO: Rank = Rank(2);
    pub const THREE: Rank = Rank(3);
    pub const FOUR: Rank = Rank(4);
    pub const FIVE: Rank = Rank(5);

    pub fn new(value: i64) -> Option<Rank> {
        (0..=5).contains(&value).then(|| Rank(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Rank 0 vetoes a match outright
    pub fn is_veto(self) -> bool {
        self == Rank::ZERO
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::new(value as i64).ok_or_else(|| format!("rank {} is outside 0..=5", value))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.0
    }
}

/// Total mapping from every valid value of `A` to a rank
///
/// Can only be built through validating constructors, so lookups never
/// fall back to a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankMap<A: Attribute> {
    ranks: BTreeMap<A, Rank>,
}

impl<A: Attribute> RankMap<A> {
    /// Every valid value mapped to 5
    pub fn all_perfect() -> Self {
        Self {
            ranks: A::VALID_VALUES.iter().map(|v| (*v, Rank::FIVE)).collect(),
        }
    }

    /// Build from typed pairs, enforcing the same invariants as a stored map
    pub fn from_ranks<I>(user_id: Uuid, ranks: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = (A, Rank)>,
    {
        let mut map = BTreeMap::new();
        for (value, rank) in ranks {
            if value.is_unknown() {
                return Err(MatchError::UnknownRankKey {
                    user_id,
                    category: A::CATEGORY,
                    key: value.key(),
                });
            }
            map.insert(value, rank);
        }
        Self::checked(user_id, map)
    }

    /// Validate and decode a persisted rank map
    pub fn from_stored(user_id: Uuid, stored: &StoredRankMap) -> Result<Self, MatchError> {
        let keys: BTreeMap<String, A> = A::VALID_VALUES.iter().map(|v| (v.key(), *v)).collect();
        let mut map = BTreeMap::new();
        for (key, raw) in stored {
            let value = keys
                .get(key)
                .copied()
                .ok_or_else(|| MatchError::UnknownRankKey {
                    user_id,
                    category: A::CATEGORY,
                    key: key.clone(),
                })?;

            let rank = raw.as_i64().and_then(Rank::new).ok_or_else(|| {
                MatchError::InvalidRankValue {
                    user_id,
                    category: A::CATEGORY,
                    key: key.clone(),
                    value: raw.to_string(),
                }
            })?;

            map.insert(value, rank);
        }
        Self::checked(user_id, map)
    }

    fn checked(user_id: Uuid, ranks: BTreeMap<A, Rank>) -> Result<Self, MatchError> {
        if let Some(missing) = A::VALID_VALUES.iter().find(|v| !ranks.contains_key(*v)) {
            return Err(MatchError::IncompleteRankMap {
                user_id,
                category: A::CATEGORY,
                missing: missing.key(),
            });
        }

        if !ranks.values().any(|rank| *rank == Rank::FIVE) {
            return Err(MatchError::MissingPerfectRank {
                user_id,
                category: A::CATEGORY,
            });
        }

        Ok(Self { ranks })
    }

    /// Rank given to `value`; an undeclared (`unknown`) value ranks 0
    #[inline]
    pub fn rank_of(&self, value: A) -> Rank {
        if value.is_unknown() {
            return Rank::ZERO;
        }
        self.ranks.get(&value).copied().unwrap_or(Rank::ZERO)
    }

    /// Code-keyed view, in code order
    pub fn to_codes(&self) -> BTreeMap<i16, Rank> {
        self.ranks.iter().map(|(v, r)| (v.code(), *r)).collect()
    }
}

impl<A: Attribute> Default for RankMap<A> {
    fn default() -> Self {
        Self::all_perfect()
    }
}

/// Scalar match preferences of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarPreferences {
    pub min_age: u16,
    pub max_age: u16,
    pub min_height_cm: i16,
    pub max_height_cm: i16,
    pub genders: BTreeSet<Gender>,
}

/// Validated match preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPreference {
    pub gender_to_match: BTreeSet<Gender>,
    pub min_age_to_match: u16,
    pub max_age_to_match: u16,
    pub diet_match: RankMap<Diet>,
    pub smoking_status_match: RankMap<SmokingStatus>,
    pub relationship_status_match: RankMap<RelationshipStatus>,
}

impl Default for MatchPreference {
    fn default() -> Self {
        Self {
            gender_to_match: Gender::ALL.into_iter().collect(),
            min_age_to_match: 0,
            max_age_to_match: 180,
            diet_match: RankMap::default(),
            smoking_status_match: RankMap::default(),
            relationship_status_match: RankMap::default(),
        }
    }
}

/// A user as seen by the ranking engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchProfile {
    pub id: Uuid,
    pub gender: Gender,
    pub diet: Diet,
    pub smoking_status: SmokingStatus,
    pub relationship_status: RelationshipStatus,
    pub date_of_birth: NaiveDate,
    pub height_cm: Option<i16>,
    pub is_active: bool,
    pub has_visible_photo: bool,
    pub last_visit: DateTime<Utc>,
    pub preference: MatchPreference,
}

impl MatchProfile {
    pub fn age_on(&self, today: NaiveDate) -> u16 {
        age_on(self.date_of_birth, today)
    }
}

/// Validated rank map of `record` for `category`, keyed by value code
pub fn get_rank_map(
    record: &UserRecord,
    category: Category,
) -> Result<BTreeMap<i16, Rank>, MatchError> {
    let stored = record.preference.rank_map(category);
    Ok(match category {
        Category::Diet => RankMap::<Diet>::from_stored(record.id, stored)?.to_codes(),
        Category::SmokingStatus => {
            RankMap::<SmokingStatus>::from_stored(record.id, stored)?.to_codes()
        }
        Category::RelationshipStatus => {
            RankMap::<RelationshipStatus>::from_stored(record.id, stored)?.to_codes()
        }
    })
}

/// Validated scalar preferences of `record`
///
/// Height bounds are global and come from `rules`.
pub fn get_scalar_preferences(
    record: &UserRecord,
    rules: &MatchingRules,
) -> Result<ScalarPreferences, MatchError> {
    let prefs = &record.preference;
    let invalid = |reason: String| MatchError::InvalidPreferences {
        user_id: record.id,
        reason,
    };

    if prefs.gender_to_match.is_empty() {
        return Err(invalid("gender to match is empty".to_string()));
    }

    let mut genders = BTreeSet::new();
    for code in &prefs.gender_to_match {
        let gender = Gender::from_code(*code)
            .ok_or_else(|| invalid(format!("gender to match has invalid code {}", code)))?;
        if !genders.insert(gender) {
            return Err(invalid(format!("gender to match repeats code {}", code)));
        }
    }

    let allowed = rules.min_age_to_match_allowed as i16..=rules.max_age_to_match_allowed as i16;
    if !allowed.contains(&prefs.min_age_to_match) {
        return Err(invalid(format!(
            "minimal age to match {} is outside {:?}",
            prefs.min_age_to_match, allowed
        )));
    }
    if !allowed.contains(&prefs.max_age_to_match) {
        return Err(invalid(format!(
            "maximal age to match {} is outside {:?}",
            prefs.max_age_to_match, allowed
        )));
    }
    if prefs.min_age_to_match > prefs.max_age_to_match {
        return Err(invalid(format!(
            "maximal age to match {} is less than minimal age to match {}",
            prefs.max_age_to_match, prefs.min_age_to_match
        )));
    }

    Ok(ScalarPreferences {
        min_age: prefs.min_age_to_match as u16,
        max_age: prefs.max_age_to_match as u16,
        min_height_cm: rules.min_height_to_match,
        max_height_cm: rules.max_height_to_match,
        genders,
    })
}

/// Decode and validate a full profile
pub fn load_profile(record: &UserRecord, rules: &MatchingRules) -> Result<MatchProfile, MatchError> {
    let scalar = get_scalar_preferences(record, rules)?;
    let stored = &record.preference;

    Ok(MatchProfile {
        id: record.id,
        gender: Gender::from_code(record.gender)
            .ok_or_else(|| invalid_attribute(record, "gender", record.gender))?,
        diet: decode_attribute(record, record.diet)?,
        smoking_status: decode_attribute(record, record.smoking_status)?,
        relationship_status: decode_attribute(record, record.relationship_status)?,
        date_of_birth: record.date_of_birth,
        height_cm: record.height_cm,
        is_active: record.is_active,
        has_visible_photo: record.has_visible_photo,
        last_visit: record.last_visit,
        preference: MatchPreference {
            gender_to_match: scalar.genders,
            min_age_to_match: scalar.min_age,
            max_age_to_match: scalar.max_age,
            diet_match: RankMap::from_stored(record.id, &stored.diet_match)?,
            smoking_status_match: RankMap::from_stored(record.id, &stored.smoking_status_match)?,
            relationship_status_match: RankMap::from_stored(
                record.id,
                &stored.relationship_status_match,
            )?,
        },
    })
}

fn decode_attribute<A: Attribute>(record: &UserRecord, code: i16) -> Result<A, MatchError> {
    A::from_code(code).ok_or_else(|| invalid_attribute(record, A::CATEGORY.as_str(), code))
}

fn invalid_attribute(record: &UserRecord, name: &str, code: i16) -> MatchError {
    MatchError::InvalidAttribute {
        user_id: record.id,
        reason: format!("{} has invalid code {}", name, code),
    }
}
