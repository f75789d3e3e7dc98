use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use registration::{StaticCatalog, WizardState};
use shared::{
    domain::CatalogEntry,
    error::{ApiError, ErrorCode},
    protocol::{RegistrationSelection, TournamentCountsSnapshot},
};
use tournament_counts::{CountBoard, DocumentStoreSource, GameRuleTable, TournamentSource};
use tracing::{info, warn};

mod api;
mod app_state;
mod config;

use api::{ApiContext, SubmitRequest, TransitionRequest};
use app_state::AppState;
use config::load_settings;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings()?;
    let source: Option<Arc<dyn TournamentSource>> = match settings.document_store() {
        Some(config) => {
            info!(
                store_url = %config.base_url,
                project = %config.project,
                collection = %config.collection,
                "tournament counts enabled"
            );
            let source = DocumentStoreSource::new(config)
                .context("failed to build document store client")?;
            Some(Arc::new(source))
        }
        None => {
            warn!("no document store project configured; tournament counts stay at zero");
            None
        }
    };

    let board = Arc::new(CountBoard::new(GameRuleTable::standard()));
    if let Some(source) = &source {
        board.spawn_refresh(Arc::clone(source));
    }

    let api = ApiContext {
        catalog: Arc::new(StaticCatalog),
        board,
        source,
        handoff_route: settings.handoff_route,
    };
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/catalog/colleges", get(http_list_colleges))
        .route("/catalog/games", get(http_list_games))
        .route("/wizard/start", post(http_start_wizard))
        .route("/wizard/transition", post(http_transition_wizard))
        .route("/wizard/submit", post(http_submit_wizard))
        .route("/tournaments/counts", get(http_tournament_counts))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_colleges(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogEntry>> {
    Json(api::list_colleges(&state.api))
}

async fn http_list_games(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogEntry>> {
    Json(api::list_games(&state.api))
}

async fn http_start_wizard() -> Json<WizardState> {
    Json(api::start_wizard())
}

async fn http_transition_wizard(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> ApiResult<WizardState> {
    let Json(request) = payload.map_err(rejected_body)?;
    api::transition_wizard(&state.api, &request)
        .map(Json)
        .map_err(error_response)
}

async fn http_submit_wizard(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<RegistrationSelection> {
    let Json(request) = payload.map_err(rejected_body)?;
    let selection = api::submit_wizard(&state.api, &request).map_err(error_response)?;
    info!(
        college = %selection.college,
        game = %selection.game,
        route = %selection.handoff_route,
        "registration selection handed off"
    );
    Ok(Json(selection))
}

async fn http_tournament_counts(
    State(state): State<Arc<AppState>>,
) -> Json<TournamentCountsSnapshot> {
    Json(api::tournament_counts(&state.api).await)
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidTransition => StatusCode::CONFLICT,
    }
}

fn error_response(error: ApiError) -> (StatusCode, Json<ApiError>) {
    (status_for(error.code), Json(error))
}

fn rejected_body(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    error_response(ApiError::new(ErrorCode::Validation, rejection.body_text()))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
