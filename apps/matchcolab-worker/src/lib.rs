pub mod worker;

mod error;

pub use error::{Error, Result};

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre;
use reqwest::Client;

use matchcolab_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = matchcolab_cli::VERSION,
	rename_all = "kebab",
	styles = matchcolab_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Run a single backfill pass and exit.
	#[arg(long)]
	pub once: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = matchcolab_config::load(&args.config)?;

	matchcolab_cli::init_tracing(&config.service.log_level);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema(config.storage.vector_dim).await?;

	let client = Client::builder()
		.build()
		.map_err(|err| eyre::eyre!("Failed to build HTTP client: {err}."))?;
	let state = worker::WorkerState {
		db,
		client,
		embedding: config.providers.embedding,
		settings: config.worker,
	};

	worker::run_worker(state, args.once).await;

	Ok(())
}
