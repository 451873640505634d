use time::OffsetDateTime;

use crate::{Result, vector};

#[derive(Debug, sqlx::FromRow)]
pub struct ArtistRow {
	pub artist_id: i64,
	pub artist_name: String,
	pub artist_tags: String,
	/// pgvector text form, selected as `embedding::text`.
	pub embedding: Option<String>,
	pub embedding_model: Option<String>,
	pub embedded_at: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
}
impl ArtistRow {
	pub fn embedding_vec(&self) -> Result<Option<Vec<f32>>> {
		self.embedding.as_deref().map(vector::parse_pg_vector).transpose()
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct PendingArtist {
	pub artist_id: i64,
	pub artist_name: String,
	pub artist_tags: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CollaborationRow {
	pub collaboration_id: i64,
	pub artist_01: Option<String>,
	pub artist_01_tags: Option<String>,
	pub artist_02: Option<String>,
	pub artist_02_tags: Option<String>,
	pub collaboration_status: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewArtist<'a> {
	pub name: &'a str,
	pub tags: &'a str,
	pub embedding: Option<&'a [f32]>,
	pub embedding_model: Option<&'a str>,
}
