//! Embedding backfill: registers artists named in the collaboration history and embeds the tag
//! strings of artists that have no vector yet.

use std::{fmt::Display, future::Future, time::Duration};

use reqwest::Client;
use tokio::time;

use crate::{Error, Result};
use matchcolab_config::{EmbeddingProviderConfig, Worker};
use matchcolab_providers::embedding;
use matchcolab_storage::{db::Db, models::PendingArtist, queries};

pub struct WorkerState {
	pub db: Db,
	pub client: Client,
	pub embedding: EmbeddingProviderConfig,
	pub settings: Worker,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
	pub seeded: u64,
	pub processed: usize,
	pub updated: usize,
	pub failed: usize,
}

pub async fn run_worker(state: WorkerState, once: bool) {
	let poll_interval = Duration::from_millis(state.settings.poll_interval_ms);

	loop {
		match run_pass(&state).await {
			Ok(summary) => tracing::info!(
				seeded = summary.seeded,
				processed = summary.processed,
				updated = summary.updated,
				failed = summary.failed,
				"Embedding backfill pass finished."
			),
			Err(err) => tracing::error!(error = %err, "Embedding backfill pass failed."),
		}

		if once {
			return;
		}

		time::sleep(poll_interval).await;
	}
}

pub async fn run_pass(state: &WorkerState) -> Result<PassSummary> {
	let settings = &state.settings;
	let mut summary = PassSummary::default();

	if settings.seed_artists_from_history {
		summary.seeded = queries::seed_artists_from_collaborations(&state.db).await?;
	}

	let pending = queries::artists_missing_embedding(&state.db, settings.batch_size).await?;
	let request_delay = Duration::from_millis(settings.request_delay_ms);

	for (idx, artist) in pending.iter().enumerate() {
		if idx > 0 {
			time::sleep(request_delay).await;
		}

		summary.processed += 1;

		match backfill_artist(state, artist).await {
			Ok(true) => summary.updated += 1,
			Ok(false) => {
				tracing::info!(artist_id = artist.artist_id, "Artist vanished before update.");
			},
			Err(err) => {
				summary.failed += 1;

				tracing::error!(
					error = %err,
					artist_id = artist.artist_id,
					artist_name = %artist.artist_name,
					"Failed to embed artist. It will be retried on the next pass."
				);
			},
		}
	}

	Ok(summary)
}

async fn backfill_artist(state: &WorkerState, artist: &PendingArtist) -> Result<bool> {
	let texts = [artist.artist_tags.trim().to_string()];
	let settings = &state.settings;
	let backoff = Duration::from_millis(settings.retry_backoff_ms);
	let mut vectors = with_retry(settings.max_attempts, backoff, |_| {
		embedding::embed(&state.client, &state.embedding, &texts)
	})
	.await?;
	let vector = vectors.pop().unwrap_or_default();

	validate_vector_dim(&vector, state.embedding.dimensions)?;

	let updated =
		queries::set_artist_embedding(&state.db, artist.artist_id, &vector, &state.embedding.model)
			.await?;

	tracing::debug!(artist_id = artist.artist_id, "Stored artist embedding.");

	Ok(updated)
}

/// Runs `op` up to `max_attempts` times, sleeping `backoff` between attempts. The last error is
/// returned when every attempt fails.
pub async fn with_retry<T, E, F, Fut>(
	max_attempts: u32,
	backoff: Duration,
	mut op: F,
) -> Result<T, E>
where
	F: FnMut(u32) -> Fut,
	Fut: Future<Output = Result<T, E>>,
	E: Display,
{
	let max_attempts = max_attempts.max(1);
	let mut attempt = 1;

	loop {
		match op(attempt).await {
			Ok(value) => return Ok(value),
			Err(err) if attempt < max_attempts => {
				tracing::warn!(error = %err, attempt, max_attempts, "Attempt failed. Retrying.");
				time::sleep(backoff).await;

				attempt += 1;
			},
			Err(err) => return Err(err),
		}
	}
}

fn validate_vector_dim(vec: &[f32], expected_dim: u32) -> Result<()> {
	if vec.len() != expected_dim as usize {
		return Err(Error::Validation(format!(
			"Embedding dimension {} does not match configured dimensions {expected_dim}.",
			vec.len()
		)));
	}

	Ok(())
}
