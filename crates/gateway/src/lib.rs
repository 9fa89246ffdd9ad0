//! HTTP API gateway for SiteChat.
//!
//! Exposes a health check and the v1 API for bots, knowledge and chat.
//! Every reply comes from the keyword responder; the gateway only owns
//! state (bots, conversations) and transport concerns.
//!
//! Built on Axum.

pub mod api_v1;
mod rate_limit;
pub mod registry;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Json,
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use sitechat_config::AppConfig;
use sitechat_knowledge::load_snippets;

use crate::api_v1::{ApiError, error_body};
use crate::rate_limit::{RateLimiter, rate_limit_middleware};
use crate::registry::{Bot, BotRegistry};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub registry: BotRegistry,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

impl GatewayState {
    pub fn new(config: AppConfig) -> Self {
        let delay = Duration::from_millis(config.bot.response_delay_ms);
        Self {
            config,
            registry: BotRegistry::new(delay),
            start_time: chrono::Utc::now(),
        }
    }
}

type SharedState = Arc<GatewayState>;

/// Build the full router.
///
/// Layers applied:
/// - Bearer token authentication on /v1 routes (when an API key is set)
/// - CORS restricted to the configured origins
/// - Request body size limit (1 MB)
/// - In-memory rate limiting (per peer address, per minute)
/// - HTTP trace logging
///
/// Unknown paths get a 404 in the usual error envelope.
pub fn build_router(state: SharedState) -> Router {
    let v1 = api_v1::v1_router(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let origins: Vec<HeaderValue> = state
        .config
        .gateway
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .max_age(Duration::from_secs(3600));

    let rate_limiter = Arc::new(RateLimiter::per_minute(
        state.config.gateway.rate_limit_per_minute,
    ));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", v1)
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            rate_limit_middleware(limiter, req, next)
        }))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Create the bot described by the `[bot]` config section.
///
/// Loads the knowledge file when one is configured; a missing or unreadable
/// file is an error rather than an empty bot.
pub async fn seed_default_bot(state: &GatewayState) -> Result<Arc<Bot>, sitechat_core::Error> {
    let bot_config = &state.config.bot;
    let snippets = match &bot_config.knowledge_file {
        Some(path) => load_snippets(path)?,
        None => Vec::new(),
    };

    let bot = state
        .registry
        .create(&bot_config.name, bot_config.source_label.clone(), snippets)
        .await?;
    Ok(bot)
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let auth = config.gateway.api_key.is_some();

    let state = Arc::new(GatewayState::new(config));
    let bot = seed_default_bot(&state).await?;
    info!(
        bot_id = %bot.id,
        name = %bot.name,
        snippets = bot.knowledge().len(),
        "Default bot ready"
    );

    let app = build_router(state);

    info!(addr = %addr, auth, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found_handler(uri: axum::http::Uri) -> ApiError {
    error_body(StatusCode::NOT_FOUND, "Not found", Some(uri.path().to_string()))
}

/// Authentication middleware for the /v1 API.
///
/// With no `gateway.api_key` configured every request passes; otherwise a
/// matching `Authorization: Bearer <key>` header is required.
async fn auth_middleware(
    State(state): State<SharedState>,
    req: axum::extract::Request,
    next: Next,
) -> Result<axum::response::Response, ApiError> {
    let Some(expected) = state.config.gateway.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if provided == Some(expected) {
        Ok(next.run(req).await)
    } else {
        warn!("Unauthorized request to /v1 API: missing or invalid bearer token");
        Err(error_body(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            Some("missing or invalid bearer token".into()),
        ))
    }
}
