//! Pure matchmaking core: tag sets, historical affinity and candidate ranking.
//!
//! Nothing in this crate performs I/O. Callers fetch embeddings, artists and collaboration history
//! and hand them in as plain values.

pub mod affinity;
pub mod artist;
pub mod ranking;
pub mod similarity;
pub mod tags;

pub use affinity::{HistoricalEvidence, NEUTRAL_PRIOR, Tally, historical_score};
pub use artist::{Artist, HistoryRecord, Outcome};
pub use ranking::{
	DEFAULT_TOP_N, MatchResult, RankError, RankPolicy, Ranker, Ranking, Recommendation, rank,
};
pub use similarity::cosine_similarity;
pub use tags::TagSet;
