use std::sync::Arc;

use axum::{
    http::{request::Parts, HeaderValue},
    routing::{get, post},
    Json, Router,
};
use chatbot_shared::{GenerateRequest, GenerateResponse, PingResponse};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::ALLOWED_ORIGIN;
use crate::error::ServiceError;
use crate::orchestrator::Orchestrator;

/// Builds the application router. CORS admits only the front-end origin, with credentials.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    // Wildcards are not allowed alongside credentials, so methods and headers are mirrored.
    // Other origins get no allow-origin header at all.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _parts: &Parts| origin.as_bytes() == ALLOWED_ORIGIN.as_bytes(),
        ))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    Router::new()
        .route("/ping", get(ping))
        .route(
            "/generate",
            post(move |req| generate(req, orchestrator)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse::alive())
}

async fn generate(
    Json(request): Json<GenerateRequest>,
    orchestrator: Arc<Orchestrator>,
) -> Result<Json<GenerateResponse>, ServiceError> {
    info!("Generate request: {} chars", request.prompt.chars().count());
    let conversation = orchestrator.run(&request.prompt).await?;

    let messages = orchestrator
        .tools_enabled()
        .then_some(conversation.transcript);
    Ok(Json(GenerateResponse {
        prompt: request.prompt,
        output: conversation.output,
        messages,
    }))
}
