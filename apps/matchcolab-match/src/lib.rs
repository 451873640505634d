//! One-shot matching against the configured stores.

use std::{fmt, path::PathBuf};

use clap::Parser;

use matchcolab_service::{MatchRequest, MatchResponse, MatchService};
use matchcolab_storage::db::Db;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Parser)]
#[command(
	version = matchcolab_cli::VERSION,
	rename_all = "kebab",
	styles = matchcolab_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Comma-separated style tags, e.g. "pop, dance-pop, r&b".
	#[arg(long, short = 't', value_name = "TAGS")]
	pub tags: String,
	#[arg(long, short = 'n', value_name = "N", allow_negative_numbers = true)]
	pub top_n: Option<i64>,
	#[arg(long, value_name = "SCORE")]
	pub min_score: Option<f64>,
	#[arg(long, value_name = "SCORE")]
	pub min_similarity: Option<f64>,
	/// Only learn from collaborations that succeeded.
	#[arg(long)]
	pub only_successful: bool,
	/// Print the response as JSON instead of a numbered list.
	#[arg(long)]
	pub json: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = matchcolab_config::load(&args.config)?;

	matchcolab_cli::init_tracing(&config.service.log_level);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema(config.storage.vector_dim).await?;

	let service = MatchService::new(config, db)?;
	let mut request = MatchRequest::new(args.tags);

	request.top_n = args.top_n;
	request.min_combined_score = args.min_score;
	request.min_semantic_similarity = args.min_similarity;
	request.only_successful = args.only_successful;

	let response = service.find_matches(request).await?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&response)?);
	} else {
		print!("{}", TextReport(&response));
	}

	Ok(())
}

/// Numbered, human-readable rendering of a match response.
pub struct TextReport<'a>(pub &'a MatchResponse);
impl fmt::Display for TextReport<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let response = self.0;
		let rule = "=".repeat(RULE_WIDTH);

		writeln!(f, "{rule}")?;
		writeln!(f, "Best artist matches for tags: {}", response.user_tags)?;
		writeln!(f, "Artists analyzed: {}", response.total_artists_analyzed)?;
		writeln!(f, "{rule}")?;

		if response.matches.is_empty() {
			return writeln!(f, "No matches found.");
		}

		for (idx, result) in response.matches.iter().enumerate() {
			writeln!(f)?;
			writeln!(f, "{}. {}", idx + 1, result.artist_name)?;
			writeln!(f, "   Tags: {}", result.artist_tags)?;
			writeln!(f, "   Combined score: {:.3}", result.combined_score)?;
			writeln!(f, "   Semantic similarity: {:.3}", result.semantic_similarity)?;
			writeln!(f, "   Historical success rate: {:.3}", result.historical_success_rate)?;
			writeln!(f, "   {}", result.recommendation)?;
		}

		Ok(())
	}
}
