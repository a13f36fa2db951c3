//! Pokemon API integration tests.
//!
//! Serves the real router over the in-memory store and exercises the
//! CRUD endpoints end to end.

use std::sync::Arc;

use pokedex_api::{
    api,
    http::ReqwestAdapter,
    pokemon::{MemoryPokemonStore, Pokemon, PokemonPage, PokemonService},
    seed::SeedService,
    state::AppState,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Test harness for Pokemon API tests.
struct PokemonApiTestHarness {
    base_url: String,
    client: reqwest::Client,
}

impl PokemonApiTestHarness {
    async fn new() -> Self {
        Self::with_default_limit(10).await
    }

    async fn with_default_limit(default_limit: u32) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info,pokedex_api=debug".into()),
            )
            .with_test_writer()
            .try_init();

        let pokemon = PokemonService::new(Arc::new(MemoryPokemonStore::new()), default_limit);
        // The catalog is never contacted by these tests.
        let seed = SeedService::new(
            Arc::new(ReqwestAdapter::new()),
            pokemon.clone(),
            "http://127.0.0.1:9",
        );
        let app = api::create_router(AppState::new(pokemon, seed));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, name: &str, no: i32) -> reqwest::Response {
        self.client
            .post(self.url("/pokemon"))
            .json(&json!({"name": name, "no": no}))
            .send()
            .await
            .unwrap()
    }

    async fn create_ok(&self, name: &str, no: i32) -> Pokemon {
        let response = self.create(name, no).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}

async fn problem(response: reqwest::Response) -> Value {
    assert_eq!(
        response.headers()["content-type"],
        "application/problem+json"
    );
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_create_then_get() {
    let harness = PokemonApiTestHarness::new().await;

    let created = harness.create_ok("bulbasaur", 1).await;
    assert_eq!(created.name, "bulbasaur");
    assert_eq!(created.no, 1);

    let response = harness.get(&format!("/pokemon/{}", created.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"id": created.id.to_string(), "name": "bulbasaur", "no": 1})
    );
}

#[tokio::test]
async fn test_create_duplicate_is_bad_request() {
    let harness = PokemonApiTestHarness::new().await;
    harness.create_ok("bulbasaur", 1).await;

    let response = harness.create("ivysaur", 1).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = problem(response).await;
    assert_eq!(body["code"], "duplicate_key");
    assert_eq!(body["detail"], "Pokemon with no 1 already exists");

    let response = harness.create("bulbasaur", 2).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = problem(response).await;
    assert_eq!(body["detail"], "Pokemon with name bulbasaur already exists");
}

#[tokio::test]
async fn test_create_invalid_body() {
    let harness = PokemonApiTestHarness::new().await;

    let response = harness.create("", 0).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = problem(response).await;
    assert_eq!(body["code"], "invalid_argument");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "no"]);

    let response = harness
        .client
        .post(harness.url("/pokemon"))
        .json(&json!({"name": "mew"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(problem(response).await["code"], "invalid_body");
}

#[tokio::test]
async fn test_get_invalid_id() {
    let harness = PokemonApiTestHarness::new().await;

    let response = harness.get("/pokemon/not-an-id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = problem(response).await;
    assert_eq!(body["code"], "invalid_id");
    assert_eq!(body["detail"], "not-an-id is not a valid id");
}

#[tokio::test]
async fn test_get_missing_id() {
    let harness = PokemonApiTestHarness::new().await;

    let response = harness.get("/pokemon/65a1f0c2e4b0a1b2c3d4e5f6").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = problem(response).await;
    assert_eq!(
        body["detail"],
        "Pokemon with id 65a1f0c2e4b0a1b2c3d4e5f6 not found"
    );
}

#[tokio::test]
async fn test_list_pagination() {
    let harness = PokemonApiTestHarness::new().await;
    for no in (1..=12).rev() {
        harness.create_ok(&format!("pokemon-{no}"), no).await;
    }

    let response = harness.get("/pokemon?limit=5&offset=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: PokemonPage = response.json().await.unwrap();

    let numbers: Vec<i32> = page.data.iter().map(|p| p.no).collect();
    assert_eq!(numbers, vec![6, 7, 8, 9, 10]);
    assert_eq!(page.pages, 3);
    assert_eq!(page.total_count, 12);
}

#[tokio::test]
async fn test_list_uses_default_limit() {
    let harness = PokemonApiTestHarness::with_default_limit(3).await;
    for no in 1..=7 {
        harness.create_ok(&format!("pokemon-{no}"), no).await;
    }

    let body: Value = harness.get("/pokemon").await.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["totalCount"], 7);
}

#[tokio::test]
async fn test_list_invalid_query() {
    let harness = PokemonApiTestHarness::new().await;

    let response = harness.get("/pokemon?limit=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(problem(response).await["code"], "invalid_query");

    let response = harness.get("/pokemon?limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(problem(response).await["code"], "invalid_argument");
}

#[tokio::test]
async fn test_update() {
    let harness = PokemonApiTestHarness::new().await;
    let pikachu = harness.create_ok("pikachu", 25).await;
    harness.create_ok("raichu", 26).await;

    let response = harness
        .client
        .put(harness.url(&format!("/pokemon/{}", pikachu.id)))
        .json(&json!({"name": "pika"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Pokemon = response.json().await.unwrap();
    assert_eq!(updated.id, pikachu.id);
    assert_eq!(updated.name, "pika");
    assert_eq!(updated.no, 25);

    let response = harness
        .client
        .put(harness.url(&format!("/pokemon/{}", pikachu.id)))
        .json(&json!({"no": 26}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        problem(response).await["detail"],
        "Pokemon with no 26 already exists"
    );
}

#[tokio::test]
async fn test_update_missing_and_invalid() {
    let harness = PokemonApiTestHarness::new().await;

    let response = harness
        .client
        .put(harness.url("/pokemon/65a1f0c2e4b0a1b2c3d4e5f6"))
        .json(&json!({"name": "ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = harness
        .client
        .put(harness.url("/pokemon/123"))
        .json(&json!({"name": "ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(problem(response).await["code"], "invalid_id");
}

#[tokio::test]
async fn test_delete_twice() {
    let harness = PokemonApiTestHarness::new().await;
    let mew = harness.create_ok("mew", 151).await;
    let url = harness.url(&format!("/pokemon/{}", mew.id));

    let response = harness.client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = harness.client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = harness.get(&format!("/pokemon/{}", mew.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let harness = PokemonApiTestHarness::new().await;

    assert_eq!(harness.get("/healthz").await.status(), StatusCode::OK);
    assert_eq!(harness.get("/livez").await.status(), StatusCode::OK);

    let body: Value = harness.get("/readyz").await.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"]["status"], "ok");
}
