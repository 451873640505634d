use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::state::AppState;
use matchcolab_service::{
	Error as ServiceError, MatchRequest, MatchResponse, PairRequest, PairResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(home))
		.route("/health", get(health))
		.route("/v1/matches", post(find_matches))
		.route("/v1/predict", post(predict))
		.with_state(state)
}

async fn home() -> Json<Value> {
	Json(json!({
		"message": "Artist Collaboration Matchmaker API is running.",
		"version": matchcolab_cli::VERSION,
		"endpoints": {
			"/v1/matches": "POST - Find the best artist matches for the given tags.",
			"/v1/predict": "POST - Score the compatibility of two tag strings.",
			"/health": "GET - Check API health.",
		},
	}))
}

async fn health() -> Json<Value> {
	Json(json!({ "status": "healthy", "service": "artist-matchmaker" }))
}

async fn find_matches(
	State(state): State<AppState>,
	payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.find_matches(payload).await?;

	Ok(Json(response))
}

async fn predict(
	State(state): State<AppState>,
	payload: Result<Json<PairRequest>, JsonRejection>,
) -> Result<Json<PairResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.compare_pair(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: &'static str,
	message: String,
	retryable: bool,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
	retryable: bool,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: &'static str,
		message: impl Into<String>,
		retryable: bool,
	) -> Self {
		Self { status, error_code, message: message.into(), retryable }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, false),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "no_eligible_candidates", message, false),
			ServiceError::Provider { message } => {
				tracing::error!(%message, "Embedding provider failed.");

				Self::new(StatusCode::BAD_GATEWAY, "upstream_unavailable", message, true)
			},
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message, true)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text(), false)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			retryable: self.retryable,
		};

		(self.status, Json(body)).into_response()
	}
}
