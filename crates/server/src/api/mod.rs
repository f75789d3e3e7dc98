use std::sync::Arc;

use registration::{Catalog, WizardAction, WizardState};
use serde::{Deserialize, Serialize};
use shared::{
    domain::CatalogEntry,
    error::{ApiError, ErrorCode},
    protocol::{RegistrationSelection, TournamentCountsSnapshot},
};
use tournament_counts::{CountBoard, TournamentSource};

#[derive(Clone)]
pub struct ApiContext {
    pub catalog: Arc<dyn Catalog>,
    pub board: Arc<CountBoard>,
    pub source: Option<Arc<dyn TournamentSource>>,
    pub handoff_route: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TransitionRequest {
    pub state: WizardState,
    pub action: WizardAction,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmitRequest {
    pub state: WizardState,
}

pub fn list_colleges(ctx: &ApiContext) -> Vec<CatalogEntry> {
    ctx.catalog.colleges().to_vec()
}

pub fn list_games(ctx: &ApiContext) -> Vec<CatalogEntry> {
    ctx.catalog.games().to_vec()
}

pub fn start_wizard() -> WizardState {
    WizardState::new()
}

pub fn transition_wizard(
    ctx: &ApiContext,
    request: &TransitionRequest,
) -> Result<WizardState, ApiError> {
    request.state.check_catalog(ctx.catalog.as_ref())?;
    Ok(request.state.apply(ctx.catalog.as_ref(), &request.action)?)
}

pub fn submit_wizard(
    ctx: &ApiContext,
    request: &SubmitRequest,
) -> Result<RegistrationSelection, ApiError> {
    request.state.check_catalog(ctx.catalog.as_ref())?;
    request.state.submission(&ctx.handoff_route).ok_or_else(|| {
        ApiError::new(
            ErrorCode::InvalidTransition,
            format!(
                "registration can only be submitted from confirmation, not {:?}",
                request.state.step()
            ),
        )
    })
}

/// Refreshes the board from the configured source, then returns whatever
/// it displays. Never fails: a broken source just means stale or zero
/// counts.
pub async fn tournament_counts(ctx: &ApiContext) -> TournamentCountsSnapshot {
    if let Some(source) = &ctx.source {
        ctx.board.refresh(source.as_ref()).await;
    }
    ctx.board.snapshot().await
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
