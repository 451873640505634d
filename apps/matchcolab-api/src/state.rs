use std::sync::Arc;

use matchcolab_service::MatchService;
use matchcolab_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MatchService>,
}
impl AppState {
	pub async fn new(config: matchcolab_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.storage.vector_dim).await?;

		let service = MatchService::new(config, db)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: MatchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
