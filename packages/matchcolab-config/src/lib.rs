mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Postgres, Providers, Ranking, Security, Service, Storage,
	Worker,
};

use std::{fs, path::Path};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	finish(cfg)
}

/// Parses a config from an in-memory TOML document, applying the same normalization and
/// validation as [`load`].
pub fn parse(raw: &str) -> Result<Config> {
	let cfg: Config = toml::from_str(raw).map_err(|err| Error::ParseInline { source: err })?;

	finish(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::validation("service.http_bind must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::validation("storage.postgres.dsn must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation("storage.postgres.pool_max_conns must be greater than zero."));
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::validation(
			"providers.embedding.dimensions must be greater than zero.",
		));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.vector_dim {
		return Err(Error::validation(
			"providers.embedding.dimensions must match storage.vector_dim.",
		));
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::validation("Provider embedding api_key must be non-empty."));
	}

	validate_ranking(&cfg.ranking)?;
	validate_worker(&cfg.worker)?;

	Ok(())
}

fn validate_ranking(ranking: &Ranking) -> Result<()> {
	for (label, value) in [
		("ranking.semantic_weight", ranking.semantic_weight),
		("ranking.historical_weight", ranking.historical_weight),
		("ranking.neutral_prior", ranking.neutral_prior),
		("ranking.highly_recommended_threshold", ranking.highly_recommended_threshold),
		("ranking.good_match_threshold", ranking.good_match_threshold),
	] {
		if !value.is_finite() {
			return Err(Error::validation(format!("{label} must be a finite number.")));
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::validation(format!("{label} must be in the range 0.0-1.0.")));
		}
	}

	if (ranking.semantic_weight + ranking.historical_weight - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
		return Err(Error::validation(
			"ranking.semantic_weight and ranking.historical_weight must sum to 1.0.",
		));
	}
	if ranking.good_match_threshold > ranking.highly_recommended_threshold {
		return Err(Error::validation(
			"ranking.good_match_threshold must not exceed ranking.highly_recommended_threshold.",
		));
	}
	if ranking.default_top_n == 0 {
		return Err(Error::validation("ranking.default_top_n must be greater than zero."));
	}
	if ranking.default_top_n > ranking.max_top_n {
		return Err(Error::validation("ranking.default_top_n must not exceed ranking.max_top_n."));
	}

	Ok(())
}

fn validate_worker(worker: &Worker) -> Result<()> {
	if worker.batch_size == 0 {
		return Err(Error::validation("worker.batch_size must be greater than zero."));
	}
	if worker.max_attempts == 0 {
		return Err(Error::validation("worker.max_attempts must be greater than zero."));
	}

	Ok(())
}

fn finish(mut cfg: Config) -> Result<Config> {
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	let api_base = cfg.providers.embedding.api_base.trim().trim_end_matches('/').to_string();

	cfg.providers.embedding.api_base = api_base;

	if !cfg.providers.embedding.path.is_empty() && !cfg.providers.embedding.path.starts_with('/') {
		cfg.providers.embedding.path = format!("/{}", cfg.providers.embedding.path);
	}
}
