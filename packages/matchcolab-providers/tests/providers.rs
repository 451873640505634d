use axum::{Json, Router, routing::post};
use reqwest::{Client, header::AUTHORIZATION};
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use matchcolab_config::EmbeddingProviderConfig;
use matchcolab_providers::{Error, embedding};

fn provider_config(api_base: String) -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "stub".to_string(),
		api_base,
		api_key: "secret".to_string(),
		path: "/embeddings".to_string(),
		model: "stub-embed".to_string(),
		dimensions: 2,
		timeout_ms: 5_000,
		default_headers: Map::new(),
	}
}

async fn serve(router: Router) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stub server.");
	let addr = listener.local_addr().expect("Failed to read stub address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, router).await;
	});

	format!("http://{addr}")
}

#[test]
fn builds_bearer_auth_header() {
	let headers = matchcolab_providers::auth_headers("secret", &Map::new())
		.expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	let err = matchcolab_providers::auth_headers("secret", &defaults)
		.expect_err("Expected invalid header config.");

	assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn embeds_against_openai_compatible_endpoint() {
	let router = Router::new().route(
		"/embeddings",
		post(|Json(body): Json<Value>| async move {
			let inputs = body["input"].as_array().map(Vec::len).unwrap_or(0);
			let data = (0..inputs)
				.rev()
				.map(|idx| serde_json::json!({ "index": idx, "embedding": [idx as f64, 1.0] }))
				.collect::<Vec<_>>();

			Json(serde_json::json!({ "data": data }))
		}),
	);
	let base = serve(router).await;
	let cfg = provider_config(base);
	let texts = vec!["pop, dance-pop".to_string(), "death metal".to_string()];
	let vectors =
		embedding::embed(&Client::new(), &cfg, &texts).await.expect("Embedding request failed.");

	assert_eq!(vectors, vec![vec![0.0, 1.0], vec![1.0, 1.0]]);
}

#[tokio::test]
async fn short_responses_are_rejected() {
	let router = Router::new().route(
		"/embeddings",
		post(|| async { Json(serde_json::json!({ "data": [{ "index": 0, "embedding": [1.0] }] })) }),
	);
	let base = serve(router).await;
	let cfg = provider_config(base);
	let texts = vec!["a".to_string(), "b".to_string()];
	let err = embedding::embed(&Client::new(), &cfg, &texts)
		.await
		.expect_err("Expected a count mismatch.");

	assert!(matches!(err, Error::InvalidResponse { .. }));
}

#[tokio::test]
async fn http_errors_surface_as_reqwest_errors() {
	let router = Router::new().route(
		"/embeddings",
		post(|| async { (axum::http::StatusCode::TOO_MANY_REQUESTS, "slow down") }),
	);
	let base = serve(router).await;
	let cfg = provider_config(base);
	let err = embedding::embed(&Client::new(), &cfg, &["a".to_string()])
		.await
		.expect_err("Expected an HTTP error.");

	assert!(matches!(err, Error::Reqwest(_)));
}
