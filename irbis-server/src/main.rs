// irbis-server/src/main.rs

//! HTTP chat front end: one conversation turn per `POST /chat`, with
//! transcripts held in a thread-keyed in-process store. `POST /chat/init`
//! mints a thread so clients can bootstrap before the first real turn.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use irbis_core::{
    config::{ResponderConfig, RetrievalConfig},
    responder::{Responder, ToolCallRecord},
    retrieval::RetrievalClient,
    store::{ConversationStore, MemoryThreadStore, ThreadId},
    tools::get_data::GetDataTool,
    Transcript,
};

struct AppState {
    responder: Responder,
    store: MemoryThreadStore,
    /// Thread used when a request names none, so the plain `{message}`
    /// contract keeps working for single-conversation clients.
    default_thread: ThreadId,
    system_prompt: String,
    model_name: String,
    /// One turn at a time: no two in-flight turns may mutate a transcript.
    turn_lock: Mutex<()>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    thread_id: Option<ThreadId>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    tools: Vec<ToolCallRecord>,
    response: String,
    thread_id: ThreadId,
}

#[derive(Debug, Serialize)]
struct InitResponse {
    status: String,
    thread_id: ThreadId,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let responder_config =
        ResponderConfig::from_env(None).context("Failed to load responder configuration")?;
    let retrieval_config =
        RetrievalConfig::from_env().context("Failed to load retrieval configuration")?;

    let system_prompt = responder_config.system_prompt.clone();
    let model_name = responder_config.model.model_name.clone();

    let retrieval_client = RetrievalClient::new(retrieval_config)?;
    let responder = Responder::new(responder_config, Arc::new(GetDataTool::new(retrieval_client)))?;

    let state = Arc::new(AppState {
        responder,
        store: MemoryThreadStore::new(),
        default_thread: ThreadId::new(),
        system_prompt,
        model_name,
        turn_lock: Mutex::new(()),
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/chat", post(handle_chat))
        .route("/chat/init", post(handle_chat_init))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid HOST/PORT")?;
    info!("irbis server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.model_name.clone(),
    })
}

async fn handle_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let thread_id = request.thread_id.unwrap_or(state.default_thread);

    let _turn = state.turn_lock.lock().await;

    let mut transcript = match state.store.load(&thread_id) {
        Ok(Some(transcript)) => transcript,
        Ok(None) => Transcript::new(&state.system_prompt),
        Err(e) => return internal_error(format!("Failed to load thread: {}", e)),
    };

    match state.responder.respond(&mut transcript, &request.message).await {
        Ok(output) => {
            if let Err(e) = state.store.save(&thread_id, &transcript) {
                return internal_error(format!("Failed to save thread: {}", e));
            }
            (
                StatusCode::OK,
                Json(ChatResponse {
                    tools: output.tool_calls,
                    response: output.final_text,
                    thread_id,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(thread_id = %thread_id, error = %e, "Chat turn failed.");
            // Keep whatever the turn appended; the user can issue a new turn.
            if let Err(save_err) = state.store.save(&thread_id, &transcript) {
                error!(thread_id = %thread_id, error = %save_err, "Failed to save thread after a failed turn.");
            }
            internal_error(e.to_string())
        }
    }
}

async fn handle_chat_init(State(state): State<Arc<AppState>>) -> Response {
    let thread_id = ThreadId::new();
    let transcript = Transcript::new(&state.system_prompt);
    if let Err(e) = state.store.save(&thread_id, &transcript) {
        return internal_error(format!("Failed to initialize thread: {}", e));
    }
    info!(thread_id = %thread_id, "Initialized conversation thread.");
    (
        StatusCode::OK,
        Json(InitResponse {
            status: "done".to_string(),
            thread_id,
        }),
    )
        .into_response()
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}
