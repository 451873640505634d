pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid Postgres DSN: {0}.")]
	InvalidDsn(sqlx::Error),

	#[error("No admin database reachable (tried {tried}): {source}.")]
	AdminUnreachable { tried: String, source: sqlx::Error },

	#[error("Failed to {action} scratch database {name}: {source}.")]
	Lifecycle { action: &'static str, name: String, source: sqlx::Error },

	#[error("Failed to start a cleanup runtime: {0}.")]
	Runtime(#[from] std::io::Error),
}
