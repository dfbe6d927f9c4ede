// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Block, CandidateQuery, MatchingRules, PreferenceRecord, RankedMatch, StoredRankMap, UserRecord,
};
pub use requests::{BlockRequest, GetMatchesRequest};
pub use responses::{
    ActiveMembersResponse, BlockResponse, ErrorResponse, HealthResponse, MatchesResponse,
};
