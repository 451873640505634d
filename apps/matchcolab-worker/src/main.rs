use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = matchcolab_worker::Args::parse();

	matchcolab_worker::run(args).await
}
