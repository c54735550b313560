use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use ragent_core::{LlmBackend, Message, RagentError, Settings};
use ragent_model::resolve_llm;
use serde_json::{Value, json};

type Hits = Arc<Mutex<Vec<(&'static str, Value)>>>;

async fn chat(State(hits): State<Hits>, Json(body): Json<Value>) -> Json<Value> {
    hits.lock().unwrap().push(("chat", body));
    Json(json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "Paris"}}]
    }))
}

async fn completion(State(hits): State<Hits>, Json(body): Json<Value>) -> Json<Value> {
    hits.lock().unwrap().push(("completion", body));
    Json(json!({"choices": [{"index": 0, "text": " Paris"}]}))
}

async fn generate(State(hits): State<Hits>, Json(body): Json<Value>) -> Json<Value> {
    hits.lock().unwrap().push(("generate", body));
    Json(json!({"model": "llama2", "response": "Paris", "done": true}))
}

async fn rejected(State(hits): State<Hits>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push(("rejected", body));
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })),
    )
}

async fn spawn_server() -> (String, Hits, tokio::task::JoinHandle<()>) {
    let hits: Hits = Arc::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(chat))
        .route("/v1/completions", post(completion))
        .route("/api/generate", post(generate))
        .route("/bad/chat/completions", post(rejected))
        .with_state(hits.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });
    (format!("http://{addr}"), hits, handle)
}

fn hosted(base: &str, model: &str) -> Settings {
    Settings::builder()
        .llm_backend(LlmBackend::OpenAi)
        .openai_api_key("sk-test")
        .openai_base_url(format!("{base}/v1"))
        .openai_model(model)
        .build()
        .unwrap()
}

fn prompt() -> Vec<Message> {
    vec![
        Message::system("Answer only from the context."),
        Message::user(
            "Context:\nParis is the capital of France.\n\n\
             Question: What is the capital of France?\nAnswer:",
        ),
    ]
}

#[tokio::test]
async fn gpt_models_use_the_chat_endpoint() {
    let (base, hits, handle) = spawn_server().await;

    let llm = resolve_llm(&hosted(&base, "gpt-4o")).unwrap();
    let reply = llm.invoke(&prompt()).await.unwrap();
    assert_eq!(reply.text(), "Paris");

    let hits = hits.lock().unwrap().clone();
    assert_eq!(hits.len(), 1);
    let (route, body) = &hits[0];
    assert_eq!(*route, "chat");
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");

    handle.abort();
}

#[tokio::test]
async fn other_hosted_models_use_the_completion_endpoint() {
    let (base, hits, handle) = spawn_server().await;

    let llm = resolve_llm(&hosted(&base, "davinci-002")).unwrap();
    let reply = llm.invoke(&prompt()).await.unwrap();
    assert_eq!(reply.text(), " Paris");

    let hits = hits.lock().unwrap().clone();
    assert_eq!(hits.len(), 1);
    let (route, body) = &hits[0];
    assert_eq!(*route, "completion");
    assert_eq!(body["max_tokens"], 256);
    let flattened = body["prompt"].as_str().unwrap();
    assert!(flattened.starts_with("System: Answer only from the context.\nUser: Context:"));

    handle.abort();
}

#[tokio::test]
async fn ollama_flattens_the_prompt_without_streaming() {
    let (base, hits, handle) = spawn_server().await;

    let settings =
        Settings::builder().ollama_base_url(&base).ollama_model("llama2").build().unwrap();
    let llm = resolve_llm(&settings).unwrap();
    assert_eq!(llm.invoke(&prompt()).await.unwrap().text(), "Paris");

    let hits = hits.lock().unwrap().clone();
    let (route, body) = &hits[0];
    assert_eq!(*route, "generate");
    assert_eq!(body["stream"], false);
    assert!(body["prompt"].as_str().unwrap().contains("Question: What is the capital of France?"));

    handle.abort();
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let (base, hits, handle) = spawn_server().await;

    let settings = Settings::builder()
        .llm_backend(LlmBackend::OpenAi)
        .openai_base_url(format!("{base}/v1"))
        .build()
        .unwrap();
    assert!(matches!(resolve_llm(&settings), Err(RagentError::Config(_))));
    assert!(hits.lock().unwrap().is_empty());

    handle.abort();
}

#[tokio::test]
async fn api_errors_carry_the_provider_message() {
    let (base, _hits, handle) = spawn_server().await;

    let settings = Settings::builder()
        .llm_backend(LlmBackend::OpenAi)
        .openai_api_key("sk-wrong")
        .openai_base_url(format!("{base}/bad"))
        .build()
        .unwrap();
    let err = resolve_llm(&settings).unwrap().invoke(&prompt()).await.unwrap_err();
    match err {
        RagentError::Model { provider, message } => {
            assert_eq!(provider, "OpenAI");
            assert!(message.contains("401"));
            assert!(message.contains("Incorrect API key provided"));
        }
        other => panic!("unexpected error: {other}"),
    }

    handle.abort();
}
