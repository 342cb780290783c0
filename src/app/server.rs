use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{Method, header};
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app::error::{ApiError, BROADCAST_FAILED, GENERATE_FAILED, MALFORMED_REQUEST};
use crate::app::lesson_store::LessonStore;
use crate::gemini::TextGenerator;
use crate::lesson::{
    BroadcastRequest, GenerationRequest, GenerationResult, PublishRequest, PublishedArtifact,
};
use crate::line::Broadcaster;
use crate::{generate, publish};

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub lesson_store: Arc<dyn LessonStore>,
    pub broadcaster: Arc<dyn Broadcaster>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> SuccessResponse<T> {
    fn new(payload: T) -> Json<Self> {
        Json(Self {
            success: true,
            payload,
        })
    }
}

/// Builds the HTTP surface. `lessons_dir`, when set, is served at `/lessons`
/// so locally published pages are reachable at their public URL.
pub fn router(state: AppState, lessons_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/generate", post(generate_handler))
        .route("/publish", post(publish_handler))
        .route("/broadcast", post(broadcast_handler))
        .route("/line-send", post(broadcast_handler));

    if let Some(dir) = lessons_dir {
        app = app.nest_service("/lessons", ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected request body");
            Err(ApiError::Validation(MALFORMED_REQUEST.to_owned()))
        }
    }
}

async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    let request = parse_body(payload)?;
    match generate::generate(state.generator.as_ref(), &request).await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "generation failed");
            Err(ApiError::upstream(GENERATE_FAILED))
        }
    }
}

async fn publish_handler(
    State(state): State<AppState>,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<PublishedArtifact>>, ApiError> {
    let request = parse_body(payload)?;
    match publish::publish(state.lesson_store.as_ref(), &request).await {
        Ok(published) => Ok(SuccessResponse::new(published)),
        Err(err) if err.is_validation() => {
            tracing::warn!(date = %request.date, error = %err, "publish request rejected");
            Err(ApiError::Validation(err.to_string()))
        }
        Err(err) => {
            let details = err.details();
            tracing::error!(details = ?details, "publish failed");
            Err(ApiError::Upstream {
                message: err.to_string(),
                details,
            })
        }
    }
}

#[derive(Debug, Serialize)]
struct Empty {}

async fn broadcast_handler(
    State(state): State<AppState>,
    payload: Result<Json<BroadcastRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<Empty>>, ApiError> {
    let request = parse_body(payload)?;
    match state.broadcaster.broadcast(&request.message).await {
        Ok(()) => Ok(SuccessResponse::new(Empty {})),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "broadcast failed");
            Err(ApiError::upstream(BROADCAST_FAILED))
        }
    }
}
