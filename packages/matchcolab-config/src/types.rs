use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub worker: Worker,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	/// Dimension of the `artists.embedding` pgvector column.
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Blend weights, neutral prior and label thresholds used by the match ranker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub semantic_weight: f64,
	pub historical_weight: f64,
	/// Historical score reported when no history record shares a tag with the query.
	pub neutral_prior: f64,
	pub default_top_n: u32,
	pub max_top_n: u32,
	pub highly_recommended_threshold: f64,
	pub good_match_threshold: f64,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			semantic_weight: 0.6,
			historical_weight: 0.4,
			neutral_prior: 0.5,
			default_top_n: 10,
			max_top_n: 100,
			highly_recommended_threshold: 0.7,
			good_match_threshold: 0.5,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Worker {
	pub poll_interval_ms: u64,
	pub batch_size: u32,
	pub max_attempts: u32,
	pub retry_backoff_ms: u64,
	/// Pause between two embedding requests, keeps the provider under its rate limit.
	pub request_delay_ms: u64,
	pub seed_artists_from_history: bool,
}
impl Default for Worker {
	fn default() -> Self {
		Self {
			poll_interval_ms: 60_000,
			batch_size: 32,
			max_attempts: 3,
			retry_backoff_ms: 2_000,
			request_delay_ms: 500,
			seed_artists_from_history: true,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}
