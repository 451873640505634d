//! Blends semantic similarity with historical affinity and orders candidates for one request.

use std::{cmp::Ordering, fmt};

use serde::{Serialize, Serializer};

use crate::{
	Artist, HistoricalEvidence, HistoryRecord, TagSet, affinity::NEUTRAL_PRIOR, similarity,
};

pub const DEFAULT_TOP_N: usize = 10;

const SCORE_DECIMALS: f64 = 1_000.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
	#[error("No artists with embeddings are available for matching.")]
	NoEligibleCandidates,
	#[error("top_n must be greater than zero.")]
	InvalidTopN,
	#[error("Query embedding must be non-empty.")]
	EmptyQueryEmbedding,
	#[error("Query embedding contains a non-finite value.")]
	NonFiniteQueryEmbedding,
	#[error("Query embedding has zero magnitude.")]
	ZeroQueryEmbedding,
	#[error("Embedding for artist {artist:?} has {actual} dimensions; expected {expected}.")]
	DimensionMismatch { artist: String, expected: usize, actual: usize },
	#[error("Embedding for artist {artist:?} contains a non-finite value.")]
	NonFiniteEmbedding { artist: String },
	#[error("Embedding for artist {artist:?} has zero magnitude.")]
	ZeroEmbedding { artist: String },
}
impl RankError {
	/// `true` for malformed inputs, `false` for the empty candidate pool.
	pub fn is_validation(&self) -> bool {
		!matches!(self, Self::NoEligibleCandidates)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
	HighlyRecommended,
	GoodMatch,
	Risky,
}
impl Recommendation {
	pub fn label(self) -> &'static str {
		match self {
			Self::HighlyRecommended => "HIGHLY RECOMMENDED — strong compatibility",
			Self::GoodMatch => "GOOD MATCH — moderate compatibility",
			Self::Risky => "RISKY — lower compatibility, but could be innovative",
		}
	}
}
impl fmt::Display for Recommendation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}
impl Serialize for Recommendation {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.label())
	}
}

/// Weights, prior and label thresholds. Defaults reproduce the 60/40 blend, the 0.5 prior and the
/// 0.7 / 0.5 label cut-offs.
#[derive(Debug, Clone, PartialEq)]
pub struct RankPolicy {
	pub semantic_weight: f64,
	pub historical_weight: f64,
	pub neutral_prior: f64,
	pub highly_recommended_threshold: f64,
	pub good_match_threshold: f64,
}
impl RankPolicy {
	pub fn blend(&self, semantic: f64, historical: f64) -> f64 {
		self.semantic_weight * semantic + self.historical_weight * historical
	}

	pub fn recommend(&self, combined: f64) -> Recommendation {
		if combined >= self.highly_recommended_threshold {
			Recommendation::HighlyRecommended
		} else if combined >= self.good_match_threshold {
			Recommendation::GoodMatch
		} else {
			Recommendation::Risky
		}
	}
}
impl Default for RankPolicy {
	fn default() -> Self {
		Self {
			semantic_weight: 0.6,
			historical_weight: 0.4,
			neutral_prior: NEUTRAL_PRIOR,
			highly_recommended_threshold: 0.7,
			good_match_threshold: 0.5,
		}
	}
}
impl From<&matchcolab_config::Ranking> for RankPolicy {
	fn from(cfg: &matchcolab_config::Ranking) -> Self {
		Self {
			semantic_weight: cfg.semantic_weight,
			historical_weight: cfg.historical_weight,
			neutral_prior: cfg.neutral_prior,
			highly_recommended_threshold: cfg.highly_recommended_threshold,
			good_match_threshold: cfg.good_match_threshold,
		}
	}
}

/// One ranked candidate. Scores are rounded to three decimals; the label is derived from the
/// unrounded combined score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
	pub artist_name: String,
	pub artist_tags: String,
	pub semantic_similarity: f64,
	pub historical_success_rate: f64,
	pub combined_score: f64,
	pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
	pub results: Vec<MatchResult>,
	/// Candidates that carried an embedding, whether or not they made the top N.
	pub total_considered: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
	policy: RankPolicy,
}
impl Ranker {
	pub fn new(policy: RankPolicy) -> Self {
		Self { policy }
	}

	pub fn policy(&self) -> &RankPolicy {
		&self.policy
	}

	/// Scores every embedded candidate against the query and returns the best `top_n`.
	///
	/// Candidates without an embedding are skipped. Ties on the combined score keep the order in
	/// which candidates were supplied.
	pub fn rank(
		&self,
		query_tags: &str,
		query_embedding: &[f32],
		candidates: &[Artist],
		history: &[HistoryRecord],
		top_n: usize,
	) -> Result<Ranking, RankError> {
		if top_n == 0 {
			return Err(RankError::InvalidTopN);
		}

		validate_query_embedding(query_embedding)?;

		let eligible: Vec<(&Artist, &[f32])> = candidates
			.iter()
			.filter_map(|artist| artist.indexed_embedding().map(|embedding| (artist, embedding)))
			.collect();

		if eligible.is_empty() {
			return Err(RankError::NoEligibleCandidates);
		}

		let evidence = HistoricalEvidence::new(history);
		let query_tags = TagSet::parse(query_tags);
		let mut scored = Vec::with_capacity(eligible.len());

		for (artist, embedding) in eligible {
			validate_candidate_embedding(&artist.name, embedding, query_embedding.len())?;

			let semantic = similarity::cosine_similarity(query_embedding, embedding)
				.ok_or_else(|| RankError::ZeroEmbedding { artist: artist.name.clone() })?
				.clamp(0.0, 1.0);
			let historical = evidence.score(
				&query_tags,
				&TagSet::parse(&artist.tags),
				self.policy.neutral_prior,
			);
			let combined = self.policy.blend(semantic, historical);

			scored.push(ScoredCandidate { artist, semantic, historical, combined });
		}

		// `sort_by` is stable, which is what keeps fetch order on ties.
		scored.sort_by(|a, b| cmp_score_desc(a.combined, b.combined));

		let total_considered = scored.len();
		let results = scored
			.into_iter()
			.take(top_n)
			.map(|candidate| candidate.into_result(&self.policy))
			.collect();

		Ok(Ranking { results, total_considered })
	}
}

struct ScoredCandidate<'a> {
	artist: &'a Artist,
	semantic: f64,
	historical: f64,
	combined: f64,
}
impl ScoredCandidate<'_> {
	fn into_result(self, policy: &RankPolicy) -> MatchResult {
		MatchResult {
			artist_name: self.artist.name.clone(),
			artist_tags: self.artist.tags.clone(),
			semantic_similarity: round_score(self.semantic),
			historical_success_rate: round_score(self.historical),
			combined_score: round_score(self.combined),
			recommendation: policy.recommend(self.combined),
		}
	}
}

/// Ranks with the default policy.
pub fn rank(
	query_tags: &str,
	query_embedding: &[f32],
	candidates: &[Artist],
	history: &[HistoryRecord],
	top_n: usize,
) -> Result<Ranking, RankError> {
	Ranker::default().rank(query_tags, query_embedding, candidates, history, top_n)
}

pub fn round_score(value: f64) -> f64 {
	(value * SCORE_DECIMALS).round() / SCORE_DECIMALS
}

fn cmp_score_desc(a: f64, b: f64) -> Ordering {
	b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn validate_query_embedding(embedding: &[f32]) -> Result<(), RankError> {
	if embedding.is_empty() {
		return Err(RankError::EmptyQueryEmbedding);
	}
	if !similarity::all_finite(embedding) {
		return Err(RankError::NonFiniteQueryEmbedding);
	}
	if !similarity::has_magnitude(embedding) {
		return Err(RankError::ZeroQueryEmbedding);
	}

	Ok(())
}

fn validate_candidate_embedding(
	artist: &str,
	embedding: &[f32],
	expected: usize,
) -> Result<(), RankError> {
	if embedding.len() != expected {
		return Err(RankError::DimensionMismatch {
			artist: artist.to_string(),
			expected,
			actual: embedding.len(),
		});
	}
	if !similarity::all_finite(embedding) {
		return Err(RankError::NonFiniteEmbedding { artist: artist.to_string() });
	}
	if !similarity::has_magnitude(embedding) {
		return Err(RankError::ZeroEmbedding { artist: artist.to_string() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rounds_to_three_decimals() {
		assert_eq!(round_score(0.68049), 0.68);
		assert_eq!(round_score(0.2596), 0.26);
		assert_eq!(round_score(1.0), 1.0);
	}

	#[test]
	fn labels_follow_thresholds() {
		let policy = RankPolicy::default();

		assert_eq!(policy.recommend(0.7), Recommendation::HighlyRecommended);
		assert_eq!(policy.recommend(0.6999), Recommendation::GoodMatch);
		assert_eq!(policy.recommend(0.5), Recommendation::GoodMatch);
		assert_eq!(policy.recommend(0.4999), Recommendation::Risky);
	}

	#[test]
	fn recommendation_serializes_as_label() {
		let json = serde_json::to_string(&Recommendation::Risky).expect("serialize");

		assert_eq!(json, "\"RISKY — lower compatibility, but could be innovative\"");
	}

	#[test]
	fn nan_scores_compare_equal() {
		assert_eq!(cmp_score_desc(f64::NAN, 0.5), Ordering::Equal);
		assert_eq!(cmp_score_desc(0.2, 0.5), Ordering::Greater);
	}
}
