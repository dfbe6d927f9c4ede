//! Speedy Match - match ranking and mutual visibility engine
//!
//! Decides which users may see each other as potential matches and ranks
//! the visible candidates by mutual compatibility. The ranking core is pure
//! and synchronous; data access goes through the [`services::MatchStore`]
//! trait.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_rank, check_visibility, MatchError, MatchPage, Matcher, Rank};
pub use crate::models::{MatchingRules, RankedMatch, UserRecord};
pub use crate::services::{InMemoryStore, MatchStore, PostgresStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(matcher.rules(), &MatchingRules::default());
        assert!(Rank::ZERO.is_veto());
    }
}
