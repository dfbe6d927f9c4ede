use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::core::{
    age::birth_date_range,
    error::MatchError,
    preferences::{load_profile, MatchProfile},
    rank::calculate_rank,
    visibility::check_visibility,
};
use crate::models::{CandidateQuery, MatchingRules, RankedMatch};
use crate::services::MatchStore;

/// One page of ranked matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPage {
    pub matches: Vec<RankedMatch>,
    pub page: usize,
    pub page_size: usize,
    /// Ranked matches across all pages, after the cap
    pub total_results: usize,
    pub has_next: bool,
}

/// Match ranking orchestrator
///
/// # Pipeline Stages
/// 1. Indexed pre-filter in the store (gender, date of birth, height)
/// 2. Visibility filter
/// 3. Rank calculation, rank 0 dropped
/// 4. Sort by rank, last visit and id, then cap
/// 5. Pagination
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: MatchingRules,
}

impl Matcher {
    pub fn new(rules: MatchingRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: MatchingRules::default(),
        }
    }

    pub fn rules(&self) -> &MatchingRules {
        &self.rules
    }

    /// Build the store pre-filter for a viewer
    pub fn candidate_query(&self, viewer: &MatchProfile, today: NaiveDate) -> CandidateQuery {
        let range = birth_date_range(
            viewer.preference.min_age_to_match,
            viewer.preference.max_age_to_match,
            today,
        );

        CandidateQuery {
            viewer_id: viewer.id,
            viewer_gender: viewer.gender.code(),
            viewer_age: viewer.age_on(today),
            genders: viewer.preference.gender_to_match.iter().map(|g| g.code()).collect(),
            earliest_birth_date: range.earliest,
            latest_birth_date: range.latest,
            min_height_cm: self.rules.min_height_to_match,
            max_height_cm: self.rules.max_height_to_match,
        }
    }

    /// Rank an already loaded candidate pool for a viewer
    ///
    /// # Arguments
    /// * `viewer` - The user asking for matches
    /// * `candidates` - Pool to rank, in any order
    /// * `blocked` - Users with a block edge to or from the viewer
    /// * `today` - Reference date for ages
    ///
    /// # Returns
    /// Visible candidates with a rank above 0, best first, at most
    /// `max_ranked_matches` of them
    pub fn rank_candidates(
        &self,
        viewer: &MatchProfile,
        candidates: Vec<MatchProfile>,
        blocked: &HashSet<Uuid>,
        today: NaiveDate,
    ) -> Vec<RankedMatch> {
        let pool_size = candidates.len();

        let mut ranked: Vec<RankedMatch> = candidates
            .into_iter()
            .filter(|candidate| {
                let there_is_block = blocked.contains(&candidate.id);
                match check_visibility(viewer, candidate, there_is_block, &self.rules, today) {
                    Ok(()) => true,
                    Err(reason) => {
                        trace!("Candidate {} hidden from {}: {}", candidate.id, viewer.id, reason);
                        false
                    }
                }
            })
            .filter_map(|candidate| {
                let rank = calculate_rank(viewer, &candidate);
                if rank.is_veto() {
                    trace!("Candidate {} vetoed for {}", candidate.id, viewer.id);
                    return None;
                }
                Some(RankedMatch {
                    user_id: candidate.id,
                    rank,
                    last_visit: candidate.last_visit,
                })
            })
            .collect();

        // Total order: equal rank and visit fall back to id
        ranked.sort_by(|a, b| {
            b.rank
                .cmp(&a.rank)
                .then_with(|| b.last_visit.cmp(&a.last_visit))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        ranked.truncate(self.rules.max_ranked_matches);

        debug!(
            "Ranked {} of {} candidates for {}",
            ranked.len(),
            pool_size,
            viewer.id
        );

        ranked
    }

    /// Find one page of matches for a user
    ///
    /// Everything is recomputed per call. An invalid record for the viewer
    /// halts the computation; an invalid candidate record is skipped.
    ///
    /// # Arguments
    /// * `store` - Source of users, preferences and blocks
    /// * `viewer_id` - The user asking for matches
    /// * `page_size` - Matches per page; 0 yields an empty page
    /// * `page_number` - 1-based page; 0 is read as 1
    /// * `today` - Reference date for ages
    pub async fn get_matches<S: MatchStore>(
        &self,
        store: &S,
        viewer_id: Uuid,
        page_size: usize,
        page_number: usize,
        today: NaiveDate,
    ) -> Result<MatchPage, MatchError> {
        let record = store
            .get_user(viewer_id)
            .await?
            .ok_or(MatchError::UserNotFound(viewer_id))?;
        let viewer = load_profile(&record, &self.rules)?;

        let query = self.candidate_query(&viewer, today);
        let records = store.query_candidates(&query).await?;
        let blocked = store.blocked_user_ids(viewer_id).await?;

        let candidates: Vec<MatchProfile> = records
            .iter()
            .filter_map(|record| match load_profile(record, &self.rules) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!("Skipping candidate {} for {}: {}", record.id, viewer_id, e);
                    None
                }
            })
            .collect();

        let ranked = self.rank_candidates(&viewer, candidates, &blocked, today);

        Ok(paginate(ranked, page_size, page_number))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Slice a ranked list into a 1-based page
pub fn paginate(ranked: Vec<RankedMatch>, page_size: usize, page_number: usize) -> MatchPage {
    let page = page_number.max(1);
    let total_results = ranked.len();
    let start = (page - 1).saturating_mul(page_size).min(total_results);
    let end = start.saturating_add(page_size).min(total_results);

    let matches = ranked.into_iter().skip(start).take(end - start).collect();

    MatchPage {
        matches,
        page,
        page_size,
        total_results,
        has_next: page_size > 0 && end < total_results,
    }
}
