/// Replaceable scoring policies.
pub mod ranking;

pub use ranking::{CandidateRanking, MatchClass};
