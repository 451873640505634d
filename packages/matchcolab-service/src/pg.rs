use matchcolab_domain::{Artist, HistoryRecord, Outcome};
use matchcolab_storage::{
	db::Db,
	models::{ArtistRow, CollaborationRow, NewArtist},
	queries,
};

use crate::{ArtistStore, BoxFuture, HistoryStore, Result};

/// Postgres-backed artist and history store.
pub struct PgStore {
	db: Db,
	embedding_model: String,
}
impl PgStore {
	pub fn new(db: Db, embedding_model: impl Into<String>) -> Self {
		Self { db, embedding_model: embedding_model.into() }
	}

	pub fn db(&self) -> &Db {
		&self.db
	}

	async fn fetch_artists(&self) -> Result<Vec<Artist>> {
		let rows = queries::list_artists(&self.db).await?;
		let mut artists = Vec::with_capacity(rows.len());

		for row in rows {
			artists.push(artist_from_row(row)?);
		}

		Ok(artists)
	}

	async fn store_artist(&self, name: &str, tags: &str, embedding: Option<&[f32]>) -> Result<()> {
		let artist_id = queries::upsert_artist(
			&self.db,
			NewArtist {
				name,
				tags,
				embedding,
				embedding_model: embedding.map(|_| self.embedding_model.as_str()),
			},
		)
		.await?;

		tracing::debug!(artist_id, "Stored querying artist.");

		Ok(())
	}

	async fn fetch_history(&self) -> Result<Vec<HistoryRecord>> {
		let rows = queries::list_collaborations(&self.db).await?;

		Ok(rows.into_iter().map(history_from_row).collect())
	}
}

impl ArtistStore for PgStore {
	fn list_artists(&self) -> BoxFuture<'_, Result<Vec<Artist>>> {
		Box::pin(self.fetch_artists())
	}

	fn upsert_artist<'a>(
		&'a self,
		name: &'a str,
		tags: &'a str,
		embedding: Option<&'a [f32]>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.store_artist(name, tags, embedding))
	}
}

impl HistoryStore for PgStore {
	fn list_history(&self) -> BoxFuture<'_, Result<Vec<HistoryRecord>>> {
		Box::pin(self.fetch_history())
	}
}

fn artist_from_row(row: ArtistRow) -> Result<Artist> {
	let embedding = row.embedding_vec()?;

	Ok(Artist { name: row.artist_name, tags: row.artist_tags, embedding })
}

fn history_from_row(row: CollaborationRow) -> HistoryRecord {
	HistoryRecord {
		artist1_tags: row.artist_01_tags,
		artist2_tags: row.artist_02_tags,
		outcome: Outcome::from_label(row.collaboration_status.as_deref().unwrap_or_default()),
	}
}
