use matchcolab_domain::RankError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}

	pub(crate) fn provider(message: impl Into<String>) -> Self {
		Self::Provider { message: message.into() }
	}
}

impl From<matchcolab_storage::Error> for Error {
	fn from(err: matchcolab_storage::Error) -> Self {
		match err {
			matchcolab_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<matchcolab_providers::Error> for Error {
	fn from(err: matchcolab_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<RankError> for Error {
	fn from(err: RankError) -> Self {
		match err {
			RankError::NoEligibleCandidates => Self::NotFound { message: err.to_string() },
			other => Self::InvalidRequest { message: other.to_string() },
		}
	}
}
