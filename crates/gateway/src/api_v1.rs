//! HTTP API v1 — bots, knowledge and chat.
//!
//! Endpoints:
//!
//! - `POST   /v1/chat`                          — Stateless reply from inline snippets
//! - `GET    /v1/status`                        — Runtime status
//! - `GET    /v1/bots`                          — List bots
//! - `POST   /v1/bots`                          — Create a bot
//! - `GET    /v1/bots/{id}`                     — Get a bot
//! - `DELETE /v1/bots/{id}`                     — Delete a bot and its conversations
//! - `GET    /v1/bots/{id}/knowledge`           — Raw snippets
//! - `PUT    /v1/bots/{id}/knowledge`           — Replace snippets
//! - `GET    /v1/bots/{id}/pages`               — Structured view
//! - `POST   /v1/bots/{id}/chat`                — Chat with a bot
//! - `GET    /v1/bots/{id}/conversations/{cid}` — Conversation transcript
//!
//! Every failure, including a malformed JSON body, is answered with the
//! `{error, details?}` envelope.

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use sitechat_core::{Conversation, KnowledgeError};
use sitechat_knowledge::{Section, respond};

use crate::GatewayState;
use crate::registry::Bot;

pub type SharedApiState = Arc<GatewayState>;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/status", get(status_handler))
        .route("/bots", get(list_bots_handler).post(create_bot_handler))
        .route("/bots/{id}", get(get_bot_handler).delete(delete_bot_handler))
        .route(
            "/bots/{id}/knowledge",
            get(get_knowledge_handler).put(replace_knowledge_handler),
        )
        .route("/bots/{id}/pages", get(pages_handler))
        .route("/bots/{id}/chat", post(bot_chat_handler))
        .route(
            "/bots/{id}/conversations/{cid}",
            get(get_conversation_handler),
        )
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct StatelessChatRequest {
    message: String,
    #[serde(default)]
    snippets: Vec<String>,
    #[serde(default)]
    source_label: Option<String>,
}

#[derive(Deserialize)]
struct BotChatRequest {
    message: String,
    #[serde(default)]
    conversation_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ChatResponse {
    response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conversation_id: Option<String>,
}

#[derive(Deserialize)]
struct CreateBotRequest {
    name: String,
    #[serde(default)]
    source_label: Option<String>,
    #[serde(default)]
    snippets: Vec<String>,
}

#[derive(Deserialize)]
struct ReplaceKnowledgeRequest {
    snippets: Vec<String>,
    #[serde(default)]
    source_label: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct BotDto {
    id: String,
    name: String,
    source_label: Option<String>,
    snippet_count: usize,
    created_at: String,
}

impl From<&Bot> for BotDto {
    fn from(bot: &Bot) -> Self {
        let snapshot = bot.knowledge().snapshot();
        Self {
            id: bot.id.0.clone(),
            name: bot.name.clone(),
            source_label: snapshot.source_label.clone(),
            snippet_count: snapshot.snippets.len(),
            created_at: bot.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct BotListResponse {
    bots: Vec<BotDto>,
    count: usize,
}

#[derive(Serialize, Deserialize)]
struct KnowledgeDto {
    source_label: Option<String>,
    snippets: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct StatusResponse {
    version: String,
    uptime_secs: i64,
    bots: usize,
    conversations: usize,
}

/// Error envelope returned with every non-2xx response.
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_body(
    status: StatusCode,
    error: &str,
    details: Option<String>,
) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            details,
        }),
    )
}

/// Bodies that fail to parse keep axum's status (400, 415 or 422) but are
/// reported in the envelope.
fn json_rejection(rejection: JsonRejection) -> ApiError {
    error_body(
        rejection.status(),
        "Invalid request body",
        Some(rejection.body_text()),
    )
}

fn api_error(err: KnowledgeError) -> ApiError {
    let (status, error) = match &err {
        KnowledgeError::BotNotFound(_) => (StatusCode::NOT_FOUND, "Bot not found"),
        KnowledgeError::ConversationNotFound(_) => {
            (StatusCode::NOT_FOUND, "Conversation not found")
        }
        KnowledgeError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
        KnowledgeError::Read { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load knowledge")
        }
    };

    if status.is_server_error() {
        warn!(error = %err, "Request failed");
    }

    error_body(status, error, Some(err.to_string()))
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn chat_handler(
    payload: Result<Json<StatelessChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    info!(
        message_len = payload.message.len(),
        snippets = payload.snippets.len(),
        "v1/chat request"
    );

    let response = respond(
        &payload.message,
        &payload.snippets,
        payload.source_label.as_deref(),
    );

    Ok(Json(ChatResponse {
        response,
        conversation_id: None,
    }))
}

async fn status_handler(State(state): State<SharedApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_secs: (chrono::Utc::now() - state.start_time).num_seconds(),
        bots: state.registry.len().await,
        conversations: state.registry.conversation_count().await,
    })
}

async fn list_bots_handler(State(state): State<SharedApiState>) -> Json<BotListResponse> {
    let bots: Vec<BotDto> = state
        .registry
        .list()
        .await
        .iter()
        .map(|b| BotDto::from(b.as_ref()))
        .collect();
    let count = bots.len();
    Json(BotListResponse { bots, count })
}

async fn create_bot_handler(
    State(state): State<SharedApiState>,
    payload: Result<Json<CreateBotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BotDto>), ApiError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    let bot = state
        .registry
        .create(&payload.name, payload.source_label, payload.snippets)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(BotDto::from(bot.as_ref()))))
}

async fn get_bot_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<BotDto>, ApiError> {
    let bot = state.registry.get(&id).await.map_err(api_error)?;
    Ok(Json(BotDto::from(bot.as_ref())))
}

async fn delete_bot_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete(&id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_knowledge_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<KnowledgeDto>, ApiError> {
    let bot = state.registry.get(&id).await.map_err(api_error)?;
    let snapshot = bot.knowledge().snapshot();
    Ok(Json(KnowledgeDto {
        source_label: snapshot.source_label.clone(),
        snippets: snapshot.snippets.to_vec(),
    }))
}

async fn replace_knowledge_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    payload: Result<Json<ReplaceKnowledgeRequest>, JsonRejection>,
) -> Result<Json<BotDto>, ApiError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    let bot = state
        .registry
        .replace_knowledge(&id, payload.snippets, payload.source_label)
        .await
        .map_err(api_error)?;
    Ok(Json(BotDto::from(bot.as_ref())))
}

async fn pages_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Section>>, ApiError> {
    let bot = state.registry.get(&id).await.map_err(api_error)?;
    Ok(Json(bot.knowledge().structured_view()))
}

async fn bot_chat_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    payload: Result<Json<BotChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    info!(bot_id = %id, message_len = payload.message.len(), "v1/bots/chat request");

    let turn = state
        .registry
        .chat(&id, &payload.message, payload.conversation_id)
        .await
        .map_err(api_error)?;

    Ok(Json(ChatResponse {
        response: turn.reply,
        conversation_id: Some(turn.conversation_id.0),
    }))
}

async fn get_conversation_handler(
    State(state): State<SharedApiState>,
    Path((id, cid)): Path<(String, String)>,
) -> Result<Json<Conversation>, ApiError> {
    let conv = state
        .registry
        .conversation(&id, &cid)
        .await
        .map_err(api_error)?;
    Ok(Json(conv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use sitechat_core::Role;

    fn test_state() -> SharedApiState {
        Arc::new(GatewayState::new(sitechat_config::AppConfig::default()))
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> axum::response::Response {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.oneshot(req).await.unwrap()
    }

    async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn create_bot(state: &SharedApiState, body: serde_json::Value) -> BotDto {
        let response = send(v1_router(state.clone()), "POST", "/bots", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        read_json(response).await
    }

    #[tokio::test]
    async fn stateless_chat_answers_from_inline_snippets() {
        let response = send(
            v1_router(test_state()),
            "POST",
            "/chat",
            Some(serde_json::json!({
                "message": "what is your pricing",
                "snippets": ["Our pricing is $29/month", "We offer 24/7 support"]
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = read_json(response).await;
        assert_eq!(
            json["response"],
            "Based on the website content: Our pricing is $29/month"
        );
        assert!(json.get("conversation_id").is_none());
    }

    #[tokio::test]
    async fn stateless_chat_without_snippets() {
        let response = send(
            v1_router(test_state()),
            "POST",
            "/chat",
            Some(serde_json::json!({"message": "asdf"})),
        )
        .await;
        let json: ChatResponse = read_json(response).await;
        assert_eq!(
            json.response,
            "I don't have any information to work with yet. Please try scraping the website again."
        );
    }

    #[tokio::test]
    async fn create_list_and_get_bot() {
        let state = test_state();
        let created = create_bot(
            &state,
            serde_json::json!({
                "name": "Acme",
                "source_label": "acme.com",
                "snippets": ["Our pricing is $29/month"]
            }),
        )
        .await;
        assert_eq!(created.name, "Acme");
        assert_eq!(created.snippet_count, 1);
        assert_eq!(created.source_label.as_deref(), Some("acme.com"));

        let response = send(v1_router(state.clone()), "GET", "/bots", None).await;
        let list: BotListResponse = read_json(response).await;
        assert_eq!(list.count, 1);
        assert_eq!(list.bots[0].id, created.id);

        let response = send(
            v1_router(state),
            "GET",
            &format!("/bots/{}", created.id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn blank_bot_name_is_bad_request() {
        let response = send(
            v1_router(test_state()),
            "POST",
            "/bots",
            Some(serde_json::json!({"name": ""})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let err: ErrorResponse = read_json(response).await;
        assert_eq!(err.error, "Invalid request");
        assert!(err.details.unwrap().contains("name"));
    }

    #[tokio::test]
    async fn unknown_bot_returns_error_envelope() {
        let response = send(v1_router(test_state()), "GET", "/bots/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let err: ErrorResponse = read_json(response).await;
        assert_eq!(err.error, "Bot not found");
        assert!(err.details.unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn replace_knowledge_and_read_pages() {
        let state = test_state();
        let bot = create_bot(&state, serde_json::json!({"name": "Docs"})).await;

        let response = send(
            v1_router(state.clone()),
            "PUT",
            &format!("/bots/{}/knowledge", bot.id),
            Some(serde_json::json!({
                "snippets": [
                    "Install - https://docs.example.com/install",
                    "Run cargo install",
                    "FAQ - https://docs.example.com/faq",
                    "Ask on the forum"
                ],
                "source_label": "docs.example.com"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: BotDto = read_json(response).await;
        assert_eq!(updated.snippet_count, 4);

        let response = send(
            v1_router(state.clone()),
            "GET",
            &format!("/bots/{}/pages", bot.id),
            None,
        )
        .await;
        let pages: Vec<Section> = read_json(response).await;
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].title, "Install");
        assert_eq!(pages[1].url, "https://docs.example.com/faq");

        let response = send(
            v1_router(state),
            "GET",
            &format!("/bots/{}/knowledge", bot.id),
            None,
        )
        .await;
        let knowledge: KnowledgeDto = read_json(response).await;
        assert_eq!(knowledge.snippets.len(), 4);
        assert_eq!(knowledge.source_label.as_deref(), Some("docs.example.com"));
    }

    #[tokio::test]
    async fn bot_chat_records_transcript() {
        let state = test_state();
        let bot = create_bot(
            &state,
            serde_json::json!({
                "name": "Acme",
                "snippets": ["We offer 24/7 support"]
            }),
        )
        .await;

        let response = send(
            v1_router(state.clone()),
            "POST",
            &format!("/bots/{}/chat", bot.id),
            Some(serde_json::json!({"message": "support hours"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let chat: ChatResponse = read_json(response).await;
        assert_eq!(chat.response, "Based on the website content: We offer 24/7 support");
        let cid = chat.conversation_id.unwrap();

        let response = send(
            v1_router(state),
            "GET",
            &format!("/bots/{}/conversations/{}", bot.id, cid),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let conv: Conversation = read_json(response).await;
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].role, Role::User);
        assert_eq!(conv.messages[1].role, Role::Bot);
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let state = test_state();
        let bot = create_bot(&state, serde_json::json!({"name": "Acme"})).await;

        let response = send(
            v1_router(state),
            "GET",
            &format!("/bots/{}/conversations/missing", bot.id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_bot() {
        let state = test_state();
        let bot = create_bot(&state, serde_json::json!({"name": "Temp"})).await;

        let uri = format!("/bots/{}", bot.id);
        let response = send(v1_router(state.clone()), "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(v1_router(state), "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_message_field_uses_error_envelope() {
        let state = test_state();
        let bot = create_bot(&state, serde_json::json!({"name": "Acme"})).await;

        for uri in ["/chat".to_string(), format!("/bots/{}/chat", bot.id)] {
            let response = send(
                v1_router(state.clone()),
                "POST",
                &uri,
                Some(serde_json::json!({"conversation_id": "c1"})),
            )
            .await;
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

            let err: ErrorResponse = read_json(response).await;
            assert_eq!(err.error, "Invalid request body");
            assert!(err.details.unwrap().contains("message"));
        }
    }

    #[tokio::test]
    async fn unparseable_body_uses_error_envelope() {
        let req = Request::builder()
            .method("POST")
            .uri("/bots")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = v1_router(test_state()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let err: ErrorResponse = read_json(response).await;
        assert_eq!(err.error, "Invalid request body");
    }

    #[tokio::test]
    async fn status_counts_bots() {
        let state = test_state();
        create_bot(&state, serde_json::json!({"name": "One"})).await;

        let response = send(v1_router(state), "GET", "/status", None).await;
        let status: StatusResponse = read_json(response).await;
        assert_eq!(status.bots, 1);
        assert_eq!(status.conversations, 0);
    }
}
