//! Scratch Postgres databases for the storage integration tests.
//!
//! Each [`ScratchDatabase`] owns a freshly created database with a random name. Call
//! [`ScratchDatabase::dispose`] at the end of a test; a database that is dropped without it is
//! removed from a helper thread.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

/// Environment variable naming the server the storage tests run against.
pub const DSN_VAR: &str = "MATCHCOLAB_PG_DSN";

const MAINTENANCE_DATABASES: &[&str] = &["postgres", "template1"];
const NAME_PREFIX: &str = "matchcolab_scratch_";

/// Reads [`DSN_VAR`]. Tests skip themselves when it is unset.
pub fn dsn_from_env() -> Option<String> {
	env::var(DSN_VAR).ok().filter(|dsn| !dsn.trim().is_empty())
}

pub struct ScratchDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	disposed: bool,
}
impl ScratchDatabase {
	pub async fn create(server_dsn: &str) -> Result<Self> {
		let server = PgConnectOptions::from_str(server_dsn).map_err(Error::InvalidDsn)?;
		let (maintenance, mut conn) = open_maintenance(&server).await?;
		let name = scratch_name();

		conn.execute(format!("CREATE DATABASE {}", quoted(&name)).as_str()).await.map_err(
			|source| Error::Lifecycle { action: "create", name: name.clone(), source },
		)?;

		let dsn = server.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, disposed: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn dispose(mut self) -> Result<()> {
		self.disposed = true;

		remove(&self.name, &self.maintenance).await
	}
}
impl Drop for ScratchDatabase {
	fn drop(&mut self) {
		if self.disposed {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();
		// The owning test may still be inside a runtime, so block_on needs its own thread.
		let outcome = thread::spawn(move || -> Result<()> {
			let runtime = Builder::new_current_thread().enable_all().build()?;

			runtime.block_on(remove(&name, &maintenance))
		})
		.join();

		match outcome {
			Ok(Ok(())) => {},
			Ok(Err(err)) => eprintln!("{err}"),
			Err(_) => eprintln!("Scratch database {} was not removed.", self.name),
		}
	}
}

fn scratch_name() -> String {
	format!("{NAME_PREFIX}{}", Uuid::new_v4().simple())
}

fn quoted(identifier: &str) -> String {
	format!("\"{}\"", identifier.replace('"', "\"\""))
}

async fn open_maintenance(server: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut failure = None;

	for database in MAINTENANCE_DATABASES {
		let options = server.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => failure = Some(err),
		}
	}

	Err(Error::AdminUnreachable {
		tried: MAINTENANCE_DATABASES.join(", "),
		source: failure.unwrap_or(sqlx::Error::PoolClosed),
	})
}

async fn remove(name: &str, maintenance: &PgConnectOptions) -> Result<()> {
	let lifecycle = |action: &'static str, source: sqlx::Error| Error::Lifecycle {
		action,
		name: name.to_string(),
		source,
	};
	let mut conn =
		PgConnection::connect_with(maintenance).await.map_err(|err| lifecycle("reach", err))?;

	// Sessions left open by a pool would block the drop.
	sqlx::query(
		"SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
		 WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.execute(&mut conn)
	.await
	.map_err(|err| lifecycle("disconnect", err))?;

	conn.execute(format!("DROP DATABASE IF EXISTS {}", quoted(name)).as_str())
		.await
		.map_err(|err| lifecycle("drop", err))?;

	Ok(())
}
