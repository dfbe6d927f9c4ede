// Core algorithm exports
pub mod age;
pub mod error;
pub mod matcher;
pub mod members;
pub mod preferences;
pub mod rank;
pub mod registry;
pub mod visibility;

pub use age::{age_on, birth_date_range, BirthDateRange};
pub use error::MatchError;
pub use matcher::{paginate, MatchPage, Matcher};
pub use members::{count_active_members, ActiveMemberCounts};
pub use preferences::{
    get_rank_map, get_scalar_preferences, load_profile, MatchPreference, MatchProfile, Rank,
    RankMap, ScalarPreferences,
};
pub use rank::{calculate_rank, category_rank};
pub use registry::{
    valid_values, valid_values_by_name, Attribute, Category, Diet, Gender, RelationshipStatus,
    SmokingStatus,
};
pub use visibility::{check_visibility, is_visible, Exclusion};
