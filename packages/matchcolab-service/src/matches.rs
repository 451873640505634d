use serde::{Deserialize, Serialize};

use matchcolab_domain::{MatchResult, Outcome, cosine_similarity, ranking::round_score};

use crate::{Error, MatchService, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
	pub tags: String,
	/// Signed so that negative values reach validation instead of failing deserialization.
	#[serde(default)]
	pub top_n: Option<i64>,
	#[serde(default)]
	pub artist_name: Option<String>,
	#[serde(default)]
	pub persist_artist: bool,
	/// Score against successful collaborations only.
	#[serde(default)]
	pub only_successful: bool,
	#[serde(default)]
	pub min_semantic_similarity: Option<f64>,
	#[serde(default)]
	pub min_combined_score: Option<f64>,
}
impl MatchRequest {
	pub fn new(tags: impl Into<String>) -> Self {
		Self {
			tags: tags.into(),
			top_n: None,
			artist_name: None,
			persist_artist: false,
			only_successful: false,
			min_semantic_similarity: None,
			min_combined_score: None,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
	pub user_tags: String,
	pub matches: Vec<MatchResult>,
	pub total_artists_analyzed: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairRequest {
	pub artist1_tags: String,
	pub artist2_tags: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairResponse {
	pub artist_1_tags: String,
	pub artist_2_tags: String,
	pub compatibility_score: f64,
}

impl MatchService {
	pub async fn find_matches(&self, req: MatchRequest) -> Result<MatchResponse> {
		let tags = req.tags.trim();

		if tags.is_empty() {
			return Err(Error::invalid_request("tags must be non-empty."));
		}

		let top_n = self.resolve_top_n(req.top_n)?;

		validate_cutoff("min_semantic_similarity", req.min_semantic_similarity)?;
		validate_cutoff("min_combined_score", req.min_combined_score)?;

		let mut vectors = self.embed_checked(&[tags.to_string()]).await?;
		let query_embedding = vectors.pop().unwrap_or_default();
		let candidates = self.collaborators.artists.list_artists().await?;
		let mut history = self.collaborators.history.list_history().await?;

		if req.only_successful {
			history.retain(|record| record.outcome == Outcome::Success);
		}

		// Candidates are already loaded, so the querying artist cannot match itself here.
		if req.persist_artist
			&& let Some(name) = req.artist_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
			&& let Err(err) =
				self.collaborators.artists.upsert_artist(name, tags, Some(&query_embedding)).await
		{
			tracing::warn!(error = %err, artist_name = name, "Failed to persist querying artist.");
		}

		// Rank the whole pool so cut-offs apply before truncation.
		let ranking = self.ranker.rank(
			tags,
			&query_embedding,
			&candidates,
			&history,
			candidates.len().max(1),
		)?;
		let total_considered = ranking.total_considered;
		let min_semantic = req.min_semantic_similarity.unwrap_or(0.0);
		let min_combined = req.min_combined_score.unwrap_or(0.0);
		let matches: Vec<MatchResult> = ranking
			.results
			.into_iter()
			.filter(|result| {
				result.semantic_similarity >= min_semantic && result.combined_score >= min_combined
			})
			.take(top_n)
			.collect();

		tracing::info!(
			total_considered,
			returned = matches.len(),
			history_records = history.len(),
			"Ranked collaboration candidates."
		);

		Ok(MatchResponse {
			user_tags: tags.to_string(),
			matches,
			total_artists_analyzed: total_considered,
		})
	}

	/// Cosine similarity between the embeddings of two tag strings.
	pub async fn compare_pair(&self, req: PairRequest) -> Result<PairResponse> {
		let lhs = req.artist1_tags.trim();
		let rhs = req.artist2_tags.trim();

		if lhs.is_empty() || rhs.is_empty() {
			return Err(Error::invalid_request("artist1_tags and artist2_tags must be non-empty."));
		}

		let vectors = self.embed_checked(&[lhs.to_string(), rhs.to_string()]).await?;
		let [first, second] = vectors.as_slice() else {
			return Err(Error::provider("Embedding provider returned an unexpected vector count."));
		};
		let similarity = cosine_similarity(first, second)
			.ok_or_else(|| Error::provider("Embedding provider returned a zero-magnitude vector."))?;

		Ok(PairResponse {
			artist_1_tags: lhs.to_string(),
			artist_2_tags: rhs.to_string(),
			compatibility_score: round_score(similarity),
		})
	}

	fn resolve_top_n(&self, requested: Option<i64>) -> Result<usize> {
		let max = self.cfg.ranking.max_top_n;
		let top_n = match requested {
			Some(value) => value,
			None => i64::from(self.cfg.ranking.default_top_n),
		};

		if !(1..=i64::from(max)).contains(&top_n) {
			return Err(Error::invalid_request(format!("top_n must be between 1 and {max}.")));
		}

		usize::try_from(top_n).map_err(|_| Error::invalid_request("top_n is out of range."))
	}

	/// Embeds `texts` and rejects any vector whose length differs from the configured dimension.
	async fn embed_checked(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let cfg = &self.cfg.providers.embedding;
		let vectors = self.collaborators.embedding.embed(cfg, texts).await?;

		if vectors.len() != texts.len() {
			return Err(Error::provider(format!(
				"Embedding provider returned {} vectors for {} inputs.",
				vectors.len(),
				texts.len()
			)));
		}

		let expected = cfg.dimensions as usize;

		if let Some(bad) = vectors.iter().find(|vec| vec.len() != expected) {
			return Err(Error::provider(format!(
				"Embedding dimension mismatch: expected {expected}, got {}.",
				bad.len()
			)));
		}

		Ok(vectors)
	}
}

fn validate_cutoff(label: &str, value: Option<f64>) -> Result<()> {
	match value {
		Some(min) if !min.is_finite() || !(0.0..=1.0).contains(&min) =>
			Err(Error::invalid_request(format!("{label} must be in the range 0.0-1.0."))),
		_ => Ok(()),
	}
}
