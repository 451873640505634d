//! Request-level matchmaking: embeds the query, loads candidates and history, and hands both to
//! the ranker.

pub mod matches;
pub mod pg;

mod error;

pub use error::{Error, Result};
pub use matches::{MatchRequest, MatchResponse, PairRequest, PairResponse};
pub use pg::PgStore;

use std::{future::Future, pin::Pin, sync::Arc};

use reqwest::Client;

use matchcolab_config::{Config, EmbeddingProviderConfig};
use matchcolab_domain::{Artist, HistoryRecord, RankPolicy, Ranker};
use matchcolab_providers::embedding;
use matchcolab_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait ArtistStore
where
	Self: Send + Sync,
{
	/// All known artists in fetch order, indexed or not.
	fn list_artists(&self) -> BoxFuture<'_, Result<Vec<Artist>>>;

	fn upsert_artist<'a>(
		&'a self,
		name: &'a str,
		tags: &'a str,
		embedding: Option<&'a [f32]>,
	) -> BoxFuture<'a, Result<()>>;
}

pub trait HistoryStore
where
	Self: Send + Sync,
{
	fn list_history(&self) -> BoxFuture<'_, Result<Vec<HistoryRecord>>>;
}

#[derive(Clone)]
pub struct Collaborators {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub artists: Arc<dyn ArtistStore>,
	pub history: Arc<dyn HistoryStore>,
}

/// Calls the configured OpenAI-compatible endpoint.
pub struct HttpEmbeddingProvider {
	client: Client,
}
impl HttpEmbeddingProvider {
	pub fn new() -> Result<Self> {
		let client = Client::builder()
			.build()
			.map_err(|err| Error::provider(format!("Failed to build HTTP client: {err}.")))?;

		Ok(Self { client })
	}
}

impl EmbeddingProvider for HttpEmbeddingProvider {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { embedding::embed(&self.client, cfg, texts).await.map_err(Error::from) })
	}
}

pub struct MatchService {
	pub cfg: Config,
	ranker: Ranker,
	collaborators: Collaborators,
}
impl MatchService {
	/// Wires the HTTP embedding provider and a Postgres store over `db`.
	pub fn new(cfg: Config, db: Db) -> Result<Self> {
		let store = Arc::new(PgStore::new(db, cfg.providers.embedding.model.clone()));
		let collaborators = Collaborators {
			embedding: Arc::new(HttpEmbeddingProvider::new()?),
			artists: store.clone(),
			history: store,
		};

		Ok(Self::with_collaborators(cfg, collaborators))
	}

	pub fn with_collaborators(cfg: Config, collaborators: Collaborators) -> Self {
		let ranker = Ranker::new(RankPolicy::from(&cfg.ranking));

		Self { cfg, ranker, collaborators }
	}

	pub fn ranker(&self) -> &Ranker {
		&self.ranker
	}
}
