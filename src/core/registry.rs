//! Attribute registry
//!
//! Closed enumerations of the attributes a profile can be matched on. The
//! numeric codes are the ones persisted in the `users` table and used as the
//! string keys of the stored rank maps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::MatchError;

/// Matchable attribute categories that carry a rank map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Diet,
    SmokingStatus,
    RelationshipStatus,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Diet,
        Category::SmokingStatus,
        Category::RelationshipStatus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Diet => "diet",
            Category::SmokingStatus => "smoking_status",
            Category::RelationshipStatus => "relationship_status",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diet" => Ok(Category::Diet),
            "smoking_status" => Ok(Category::SmokingStatus),
            "relationship_status" => Ok(Category::RelationshipStatus),
            other => Err(MatchError::Configuration(other.to_string())),
        }
    }
}

/// A closed attribute domain with an explicit `unknown` member
pub trait Attribute: Copy + Eq + Ord + fmt::Debug + Send + Sync + 'static {
    const CATEGORY: Category;

    /// Every value a user may declare, in code order, `unknown` excluded
    const VALID_VALUES: &'static [Self];

    fn code(self) -> i16;

    fn from_code(code: i16) -> Option<Self>;

    fn is_unknown(self) -> bool;

    /// Key used for this value in a persisted rank map
    fn key(self) -> String {
        self.code().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Female, Gender::Male, Gender::Other];

    pub fn code(self) -> i16 {
        match self {
            Gender::Female => 1,
            Gender::Male => 2,
            Gender::Other => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Gender::Female),
            2 => Some(Gender::Male),
            3 => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    Unknown,
    Vegan,
    Vegetarian,
    Carnist,
}

impl Attribute for Diet {
    const CATEGORY: Category = Category::Diet;
    const VALID_VALUES: &'static [Self] = &[Diet::Vegan, Diet::Vegetarian, Diet::Carnist];

    fn code(self) -> i16 {
        match self {
            Diet::Unknown => 0,
            Diet::Vegan => 1,
            Diet::Vegetarian => 2,
            Diet::Carnist => 3,
        }
    }

    fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Diet::Unknown),
            1 => Some(Diet::Vegan),
            2 => Some(Diet::Vegetarian),
            3 => Some(Diet::Carnist),
            _ => None,
        }
    }

    fn is_unknown(self) -> bool {
        self == Diet::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Unknown,
    No,
    Yes,
    Sometimes,
}

impl Attribute for SmokingStatus {
    const CATEGORY: Category = Category::SmokingStatus;
    const VALID_VALUES: &'static [Self] = &[
        SmokingStatus::No,
        SmokingStatus::Yes,
        SmokingStatus::Sometimes,
    ];

    fn code(self) -> i16 {
        match self {
            SmokingStatus::Unknown => 0,
            SmokingStatus::No => 1,
            SmokingStatus::Yes => 2,
            SmokingStatus::Sometimes => 3,
        }
    }

    fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(SmokingStatus::Unknown),
            1 => Some(SmokingStatus::No),
            2 => Some(SmokingStatus::Yes),
            3 => Some(SmokingStatus::Sometimes),
            _ => None,
        }
    }

    fn is_unknown(self) -> bool {
        self == SmokingStatus::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    Unknown,
    Single,
    Divorced,
    Widowed,
    InRelationship,
    InOpenRelationship,
    Complicated,
    Separated,
    Married,
}

impl Attribute for RelationshipStatus {
    const CATEGORY: Category = Category::RelationshipStatus;
    const VALID_VALUES: &'static [Self] = &[
        RelationshipStatus::Single,
        RelationshipStatus::Divorced,
        RelationshipStatus::Widowed,
        RelationshipStatus::InRelationship,
        RelationshipStatus::InOpenRelationship,
        RelationshipStatus::Complicated,
        RelationshipStatus::Separated,
        RelationshipStatus::Married,
    ];

    fn code(self) -> i16 {
        match self {
            RelationshipStatus::Unknown => 0,
            RelationshipStatus::Single => 1,
            RelationshipStatus::Divorced => 2,
            RelationshipStatus::Widowed => 3,
            RelationshipStatus::InRelationship => 4,
            RelationshipStatus::InOpenRelationship => 5,
            RelationshipStatus::Complicated => 6,
            RelationshipStatus::Separated => 7,
            RelationshipStatus::Married => 8,
        }
    }

    fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(RelationshipStatus::Unknown),
            1 => Some(RelationshipStatus::Single),
            2 => Some(RelationshipStatus::Divorced),
            3 => Some(RelationshipStatus::Widowed),
            4 => Some(RelationshipStatus::InRelationship),
            5 => Some(RelationshipStatus::InOpenRelationship),
            6 => Some(RelationshipStatus::Complicated),
            7 => Some(RelationshipStatus::Separated),
            8 => Some(RelationshipStatus::Married),
            _ => None,
        }
    }

    fn is_unknown(self) -> bool {
        self == RelationshipStatus::Unknown
    }
}

/// Valid value codes of a category, in order
pub fn valid_values(category: Category) -> Vec<i16> {
    match category {
        Category::Diet => codes::<Diet>(),
        Category::SmokingStatus => codes::<SmokingStatus>(),
        Category::RelationshipStatus => codes::<RelationshipStatus>(),
    }
}

/// Same as [`valid_values`] for a category given by name
///
/// An unregistered name is a deployment defect and yields
/// [`MatchError::Configuration`].
pub fn valid_values_by_name(name: &str) -> Result<Vec<i16>, MatchError> {
    Ok(valid_values(name.parse()?))
}

fn codes<A: Attribute>() -> Vec<i16> {
    A::VALID_VALUES.iter().map(|value| value.code()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_values_exclude_unknown() {
        assert_eq!(valid_values(Category::Diet), vec![1, 2, 3]);
        assert_eq!(valid_values(Category::SmokingStatus), vec![1, 2, 3]);
        assert_eq!(valid_values(Category::RelationshipStatus), (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_unknown_category_is_configuration_error() {
        let err = valid_values_by_name("hair_color").unwrap_err();
        assert!(matches!(err, MatchError::Configuration(ref name) if name == "hair_color"));
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_codes_are_stable() {
        for value in RelationshipStatus::VALID_VALUES {
            assert_eq!(RelationshipStatus::from_code(value.code()), Some(*value));
        }
        assert_eq!(Diet::from_code(4), None);
        assert_eq!(Gender::from_code(0), None);
        assert!(SmokingStatus::Unknown.is_unknown());
    }
}
