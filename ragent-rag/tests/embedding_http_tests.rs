use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use ragent_core::{EmbeddingBackend, LlmBackend, Settings};
use ragent_rag::{EmbeddingProvider, OllamaEmbeddingProvider, RagError, resolve_embedding_provider};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Seen {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

impl Seen {
    fn record(&self, headers: &HeaderMap, body: Value) {
        let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
        self.auth.lock().unwrap().push(auth);
        self.bodies.lock().unwrap().push(body);
    }
}

fn fake_vector(text: &str) -> Vec<f32> {
    vec![text.len() as f32, 1.0]
}

async fn ollama_embed(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let inputs: Vec<String> = serde_json::from_value(body["input"].clone()).unwrap();
    seen.record(&headers, body);
    let embeddings: Vec<_> = inputs.iter().map(|t| fake_vector(t)).collect();
    Json(json!({"model": "nomic-embed-text", "embeddings": embeddings}))
}

async fn openai_embed(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let inputs: Vec<String> = serde_json::from_value(body["input"].clone()).unwrap();
    seen.record(&headers, body);
    let data: Vec<_> = inputs
        .iter()
        .enumerate()
        .map(|(index, t)| {
            json!({"object": "embedding", "index": index, "embedding": fake_vector(t)})
        })
        .collect();
    Json(json!({"object": "list", "data": data}))
}

async fn short_embed(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    seen.record(&headers, body);
    Json(json!({"embeddings": [[1.0]]}))
}

async fn missing_model(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    seen.record(&headers, body);
    let error = json!({"error": "model \"nope\" not found, try pulling it first"});
    (StatusCode::NOT_FOUND, Json(error))
}

async fn spawn_server() -> (String, Seen, tokio::task::JoinHandle<()>) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/embed", post(ollama_embed))
        .route("/v1/embeddings", post(openai_embed))
        .route("/short/api/embed", post(short_embed))
        .route("/missing/api/embed", post(missing_model))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });
    (format!("http://{addr}"), seen, handle)
}

#[tokio::test]
async fn ollama_embeds_a_batch_in_one_request() {
    let (base, seen, handle) = spawn_server().await;
    let settings = Settings::builder()
        .ollama_base_url(&base)
        .ollama_model("llama2")
        .ollama_embedding_model("nomic-embed-text")
        .build()
        .unwrap();
    let provider = resolve_embedding_provider(&settings).unwrap();

    let vectors = provider.embed_documents(&["a", "bbb"]).await.unwrap();
    assert_eq!(vectors, vec![vec![1.0, 1.0], vec![3.0, 1.0]]);
    assert_eq!(provider.embed_query("cc").await.unwrap(), vec![2.0, 1.0]);

    let bodies = seen.bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], json!({"model": "nomic-embed-text", "input": ["a", "bbb"]}));
    assert_eq!(seen.auth.lock().unwrap()[0], None);

    handle.abort();
}

#[tokio::test]
async fn openai_embeddings_send_the_bearer_key() {
    let (base, seen, handle) = spawn_server().await;
    let settings = Settings::builder()
        .llm_backend(LlmBackend::OpenAi)
        .openai_api_key("sk-test")
        .openai_base_url(format!("{base}/v1"))
        .build()
        .unwrap();
    let provider = resolve_embedding_provider(&settings).unwrap();

    let vectors = provider.embed_documents(&["four", "sixsix"]).await.unwrap();
    assert_eq!(vectors, vec![vec![4.0, 1.0], vec![6.0, 1.0]]);

    let body = seen.bodies.lock().unwrap()[0].clone();
    assert_eq!(body["model"], "text-embedding-3-small");
    assert_eq!(seen.auth.lock().unwrap()[0].as_deref(), Some("Bearer sk-test"));

    handle.abort();
}

#[tokio::test]
async fn missing_key_never_reaches_the_server() {
    let (base, seen, handle) = spawn_server().await;
    let settings = Settings::builder()
        .embedding_backend(EmbeddingBackend::OpenAi)
        .openai_base_url(format!("{base}/v1"))
        .build()
        .unwrap();

    assert!(resolve_embedding_provider(&settings).err().unwrap().is_config());
    assert!(seen.bodies.lock().unwrap().is_empty());

    handle.abort();
}

#[tokio::test]
async fn wrong_vector_count_is_an_embedding_error() {
    let (base, _seen, handle) = spawn_server().await;
    let provider = OllamaEmbeddingProvider::new(format!("{base}/short"), "llama2");

    let err = provider.embed_documents(&["a", "b"]).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingError { .. }));

    handle.abort();
}

#[tokio::test]
async fn server_errors_carry_the_message() {
    let (base, _seen, handle) = spawn_server().await;
    let provider = OllamaEmbeddingProvider::new(format!("{base}/missing"), "nope");

    let err = provider.embed_query("a").await.unwrap_err();
    match err {
        RagError::EmbeddingError { provider, message } => {
            assert_eq!(provider, "Ollama");
            assert!(message.contains("404"));
            assert!(message.contains("try pulling it first"));
        }
        other => panic!("unexpected error: {other}"),
    }

    handle.abort();
}
