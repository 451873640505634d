use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = matchcolab_match::Args::parse();

	matchcolab_match::run(args).await
}
