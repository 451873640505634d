use crate::{
	Error, Result,
	db::Db,
	models::{ArtistRow, CollaborationRow, NewArtist, PendingArtist},
	vector,
};

pub async fn list_artists(db: &Db) -> Result<Vec<ArtistRow>> {
	let rows = sqlx::query_as::<_, ArtistRow>(
		"\
SELECT
	artist_id,
	artist_name,
	artist_tags,
	embedding::text AS embedding,
	embedding_model,
	embedded_at,
	created_at
FROM artists
ORDER BY artist_id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn list_collaborations(db: &Db) -> Result<Vec<CollaborationRow>> {
	let rows = sqlx::query_as::<_, CollaborationRow>(
		"\
SELECT
	collaboration_id,
	artist_01,
	artist_01_tags,
	artist_02,
	artist_02_tags,
	collaboration_status
FROM collaborations
ORDER BY collaboration_id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Inserts the artist or refreshes its tags. A stored embedding survives only while the tags
/// are unchanged or a fresh embedding is supplied.
pub async fn upsert_artist(db: &Db, artist: NewArtist<'_>) -> Result<i64> {
	let name = artist.name.trim();

	if name.is_empty() {
		return Err(Error::InvalidArgument("Artist name must be non-empty.".to_string()));
	}

	let embedding = artist.embedding.map(vector::vector_to_pg);
	let artist_id: i64 = sqlx::query_scalar(
		"\
INSERT INTO artists (artist_name, artist_tags, embedding, embedding_model, embedded_at)
VALUES (
	$1,
	$2,
	$3::text::vector,
	$4,
	CASE WHEN $3::text IS NULL THEN NULL ELSE now() END
)
ON CONFLICT (artist_name) DO UPDATE
SET
	artist_tags = EXCLUDED.artist_tags,
	embedding = CASE
		WHEN EXCLUDED.embedding IS NOT NULL THEN EXCLUDED.embedding
		WHEN EXCLUDED.artist_tags = artists.artist_tags THEN artists.embedding
		ELSE NULL
	END,
	embedding_model = CASE
		WHEN EXCLUDED.embedding IS NOT NULL THEN EXCLUDED.embedding_model
		WHEN EXCLUDED.artist_tags = artists.artist_tags THEN artists.embedding_model
		ELSE NULL
	END,
	embedded_at = CASE
		WHEN EXCLUDED.embedding IS NOT NULL THEN EXCLUDED.embedded_at
		WHEN EXCLUDED.artist_tags = artists.artist_tags THEN artists.embedded_at
		ELSE NULL
	END,
	updated_at = now()
RETURNING artist_id",
	)
	.bind(name)
	.bind(artist.tags)
	.bind(embedding)
	.bind(artist.embedding_model)
	.fetch_one(&db.pool)
	.await?;

	Ok(artist_id)
}

/// Artists still waiting for an embedding, oldest first. Artists without tags are never
/// returned since there is nothing to embed.
pub async fn artists_missing_embedding(db: &Db, limit: u32) -> Result<Vec<PendingArtist>> {
	let rows = sqlx::query_as::<_, PendingArtist>(
		"\
SELECT artist_id, artist_name, artist_tags
FROM artists
WHERE embedding IS NULL AND btrim(artist_tags) <> ''
ORDER BY artist_id ASC
LIMIT $1",
	)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Returns `false` when the artist no longer exists.
pub async fn set_artist_embedding(
	db: &Db,
	artist_id: i64,
	embedding: &[f32],
	model: &str,
) -> Result<bool> {
	if embedding.is_empty() {
		return Err(Error::InvalidArgument("Embedding must be non-empty.".to_string()));
	}

	let result = sqlx::query(
		"\
UPDATE artists
SET
	embedding = $2::text::vector,
	embedding_model = $3,
	embedded_at = now(),
	updated_at = now()
WHERE artist_id = $1",
	)
	.bind(artist_id)
	.bind(vector::vector_to_pg(embedding))
	.bind(model)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

/// Registers every artist named in the collaboration history that is not yet known. The tags
/// recorded at the artist's first appearance win: all `artist_01` entries are scanned before
/// any `artist_02` entry.
pub async fn seed_artists_from_collaborations(db: &Db) -> Result<u64> {
	let result = sqlx::query(
		"\
INSERT INTO artists (artist_name, artist_tags)
SELECT DISTINCT ON (seen.name) seen.name, seen.tags
FROM (
	SELECT btrim(artist_01) AS name, COALESCE(artist_01_tags, '') AS tags, 0 AS side,
		collaboration_id AS seq
	FROM collaborations
	UNION ALL
	SELECT btrim(artist_02) AS name, COALESCE(artist_02_tags, '') AS tags, 1 AS side,
		collaboration_id AS seq
	FROM collaborations
) AS seen
WHERE seen.name IS NOT NULL AND seen.name <> ''
ORDER BY seen.name, seen.side, seen.seq
ON CONFLICT (artist_name) DO NOTHING",
	)
	.execute(&db.pool)
	.await?;

	tracing::info!(inserted = result.rows_affected(), "Seeded artists from collaboration history.");

	Ok(result.rows_affected())
}
