use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pronto_core::catalog::{render_full_menu, MenuCatalog, StaticMenu};
use pronto_db::DbPool;

use crate::bootstrap::{Application, Engine};

/// Literal requests for the whole menu, matched as substrings of the
/// lowercased message before the dialogue engine sees it.
const MENU_COMMANDS: &[&str] = &[
    "mostra menu",
    "vedi menu",
    "menu",
    "il menu",
    "lista delle pizze",
    "lista pizza",
    "lista pizze",
    "mostrami il menu",
];

/// Menu questions answered directly from the catalog instead of being fed
/// through the order dialogue.
const MENU_QUERY_KEYWORDS: &[&str] = &["quanto costa", "prezzo", "ingredienti"];

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub catalog: Arc<StaticMenu>,
    pub db_pool: DbPool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "default_user".to_owned()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub checked_at: String,
}

pub fn router(app: &Application) -> Router {
    let state = AppState {
        engine: Arc::clone(&app.engine),
        catalog: Arc::clone(&app.catalog),
        db_pool: app.db_pool.clone(),
    };
    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let message = request.message.trim();
    let normalized = message.to_lowercase();
    info!(user_id = %request.user_id, "chat message received");

    if MENU_COMMANDS.iter().any(|command| normalized.contains(command)) {
        return Json(ChatResponse { response: full_menu_reply(&state).await });
    }

    if MENU_QUERY_KEYWORDS.iter().any(|keyword| normalized.contains(keyword)) {
        match state.catalog.search(message).await {
            Ok(answer) => return Json(ChatResponse { response: answer }),
            Err(err) => {
                warn!(error = %err, "menu query failed, handing message to the dialogue");
            }
        }
    }

    let response = state.engine.handle_message(&request.user_id, message).await;
    Json(ChatResponse { response })
}

async fn full_menu_reply(state: &AppState) -> String {
    match state.catalog.sections().await {
        Ok(sections) => format!(
            "Ecco il nostro menu:\n\n{}\n\nChe pizza desidera ordinare?",
            render_full_menu(&sections)
        ),
        Err(err) => {
            warn!(error = %err, "full menu unavailable");
            "Mi scusi, al momento non riesco a mostrare il menu. Può riprovare tra poco?"
                .to_owned()
        }
    }
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ready =
        sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&state.db_pool).await.is_ok();

    let payload = HealthResponse {
        status: if database_ready { "ready" } else { "degraded" },
        database: if database_ready { "ready" } else { "degraded" },
        checked_at: Utc::now().to_rfc3339(),
    };
    let status_code =
        if database_ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
