use chrono::NaiveDate;
use std::fmt;

use crate::core::preferences::MatchProfile;
use crate::models::{CandidateQuery, MatchingRules, UserRecord};

/// Why a candidate is not visible to a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    SelfMatch,
    Inactive,
    Blocked,
    GenderMismatch,
    AgeMismatch,
    HeightOutOfRange,
    NoVisiblePhoto,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Exclusion::SelfMatch => "self",
            Exclusion::Inactive => "inactive",
            Exclusion::Blocked => "blocked",
            Exclusion::GenderMismatch => "gender mismatch",
            Exclusion::AgeMismatch => "age mismatch",
            Exclusion::HeightOutOfRange => "height out of range",
            Exclusion::NoVisiblePhoto => "no visible photo",
        };
        f.write_str(reason)
    }
}

/// Decide whether `candidate` may appear as a match for `viewer`
///
/// Checks run in a fixed order and stop at the first failure. Gender and
/// age must be acceptable to both sides.
///
/// # Arguments
/// * `viewer` - The user asking for matches
/// * `candidate` - The user being considered
/// * `there_is_block` - Whether either user has blocked the other
/// * `rules` - Global height bounds
/// * `today` - Reference date for ages
pub fn check_visibility(
    viewer: &MatchProfile,
    candidate: &MatchProfile,
    there_is_block: bool,
    rules: &MatchingRules,
    today: NaiveDate,
) -> Result<(), Exclusion> {
    if viewer.id == candidate.id {
        return Err(Exclusion::SelfMatch);
    }

    if !candidate.is_active {
        return Err(Exclusion::Inactive);
    }

    if there_is_block {
        return Err(Exclusion::Blocked);
    }

    if !viewer.preference.gender_to_match.contains(&candidate.gender)
        || !candidate.preference.gender_to_match.contains(&viewer.gender)
    {
        return Err(Exclusion::GenderMismatch);
    }

    let viewer_age = viewer.age_on(today);
    let candidate_age = candidate.age_on(today);
    if !accepts_age(viewer, candidate_age) || !accepts_age(candidate, viewer_age) {
        return Err(Exclusion::AgeMismatch);
    }

    match candidate.height_cm {
        Some(height) if (rules.min_height_to_match..=rules.max_height_to_match).contains(&height) => {}
        _ => return Err(Exclusion::HeightOutOfRange),
    }

    if !candidate.has_visible_photo {
        return Err(Exclusion::NoVisiblePhoto);
    }

    Ok(())
}

/// Boolean form of [`check_visibility`]
#[inline]
pub fn is_visible(
    viewer: &MatchProfile,
    candidate: &MatchProfile,
    there_is_block: bool,
    rules: &MatchingRules,
    today: NaiveDate,
) -> bool {
    check_visibility(viewer, candidate, there_is_block, rules, today).is_ok()
}

#[inline]
fn accepts_age(profile: &MatchProfile, age: u16) -> bool {
    profile.preference.min_age_to_match <= age && age <= profile.preference.max_age_to_match
}

/// Check if a stored user is within the candidate pre-filter
///
/// Mirrors the SQL used by the PostgreSQL store, for stores that filter in
/// memory.
#[inline]
pub fn matches_candidate_query(record: &UserRecord, query: &CandidateQuery) -> bool {
    if !record.is_active || record.id == query.viewer_id {
        return false;
    }

    if !query.genders.contains(&record.gender)
        || !record.preference.gender_to_match.contains(&query.viewer_gender)
    {
        return false;
    }

    if record.date_of_birth < query.earliest_birth_date
        || record.date_of_birth > query.latest_birth_date
    {
        return false;
    }

    let viewer_age = query.viewer_age as i16;
    if viewer_age < record.preference.min_age_to_match
        || viewer_age > record.preference.max_age_to_match
    {
        return false;
    }

    matches!(record.height_cm, Some(h) if h >= query.min_height_cm && h <= query.max_height_cm)
}
