use crate::core::preferences::{MatchProfile, Rank};
use crate::core::registry::Category;

/// Mutual rank of two profiles for one category
///
/// The lower of what each side thinks of the other's declared value.
#[inline]
pub fn category_rank(a: &MatchProfile, b: &MatchProfile, category: Category) -> Rank {
    let (a_on_b, b_on_a) = match category {
        Category::Diet => (
            a.preference.diet_match.rank_of(b.diet),
            b.preference.diet_match.rank_of(a.diet),
        ),
        Category::SmokingStatus => (
            a.preference.smoking_status_match.rank_of(b.smoking_status),
            b.preference.smoking_status_match.rank_of(a.smoking_status),
        ),
        Category::RelationshipStatus => (
            a.preference.relationship_status_match.rank_of(b.relationship_status),
            b.preference.relationship_status_match.rank_of(a.relationship_status),
        ),
    };
    a_on_b.min(b_on_a)
}

/// Calculate the compatibility rank of two profiles
///
/// The minimum of the mutual category ranks over every category, so a
/// single 0 from either side vetoes the pair and `calculate_rank(a, b) ==
/// calculate_rank(b, a)` always holds. A side that never declared a value
/// (`unknown`) is ranked 0.
///
/// Visibility is not checked here; callers filter first.
pub fn calculate_rank(viewer: &MatchProfile, candidate: &MatchProfile) -> Rank {
    let mut rank = Rank::FIVE;
    for category in Category::ALL {
        rank = rank.min(category_rank(viewer, candidate, category));
        if rank.is_veto() {
            break;
        }
    }
    rank
}
