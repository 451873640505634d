use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = matchcolab_api::Args::parse();

	matchcolab_api::run(args).await
}
