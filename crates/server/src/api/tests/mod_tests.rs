use super::*;
use registration::{StaticCatalog, WizardStep};
use shared::domain::GameId;
use tournament_counts::{FetchError, RecordListSource, TournamentRecord};

struct OfflineSource;

#[async_trait::async_trait]
impl TournamentSource for OfflineSource {
    async fn fetch_all(&self) -> Result<Vec<TournamentRecord>, FetchError> {
        Err(FetchError::Unavailable("offline".into()))
    }
}

fn context(source: Option<Arc<dyn TournamentSource>>) -> ApiContext {
    ApiContext {
        catalog: Arc::new(StaticCatalog),
        board: Arc::new(CountBoard::default()),
        source,
        handoff_route: "/register".into(),
    }
}

fn state_at_confirmation(ctx: &ApiContext) -> WizardState {
    [
        WizardAction::ContinueFromLanding,
        WizardAction::SelectCollege { id: "vit".into() },
        WizardAction::SelectGame { id: "cod".into() },
    ]
    .into_iter()
    .try_fold(start_wizard(), |state, action| {
        transition_wizard(ctx, &TransitionRequest { state, action })
    })
    .expect("flow")
}

#[test]
fn catalog_lists_follow_display_order() {
    let ctx = context(None);
    let colleges = list_colleges(&ctx);
    assert_eq!(colleges.first().map(|entry| entry.id), Some("iitb"));
    let games: Vec<_> = list_games(&ctx).iter().map(|entry| entry.id).collect();
    assert_eq!(games, vec!["bgmi", "cod", "valorant", "freefire"]);
}

#[test]
fn unknown_college_maps_to_validation_error() {
    let ctx = context(None);
    let err = transition_wizard(
        &ctx,
        &TransitionRequest {
            state: start_wizard().continue_from_landing(),
            action: WizardAction::SelectCollege { id: "nope".into() },
        },
    )
    .expect_err("must reject");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[test]
fn selection_on_wrong_step_maps_to_invalid_transition() {
    let ctx = context(None);
    let err = transition_wizard(
        &ctx,
        &TransitionRequest {
            state: start_wizard(),
            action: WizardAction::SelectGame { id: "cod".into() },
        },
    )
    .expect_err("must reject");
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[test]
fn submit_requires_confirmation_step() {
    let ctx = context(None);
    let err = submit_wizard(
        &ctx,
        &SubmitRequest {
            state: start_wizard(),
        },
    )
    .expect_err("landing cannot submit");
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    let state = state_at_confirmation(&ctx);
    assert_eq!(state.step(), WizardStep::Confirmation);
    let selection = submit_wizard(&ctx, &SubmitRequest { state }).expect("submit");
    assert_eq!(selection.college.as_str(), "vit");
    assert_eq!(selection.game.as_str(), "cod");
    assert_eq!(selection.handoff_route, "/register");
}

#[tokio::test]
async fn counts_without_source_stay_zero() {
    let ctx = context(None);
    let snapshot = tournament_counts(&ctx).await;
    assert_eq!(snapshot.counts.total(), 0);
    assert!(snapshot.refreshed_at.is_none());
}

#[tokio::test]
async fn counts_refresh_from_source_and_survive_outage() {
    let ctx = context(Some(Arc::new(RecordListSource::new(vec![
        TournamentRecord::with_game("Valorant Campus Cup"),
        TournamentRecord::with_game("Free Fire Showdown"),
    ]))));
    let snapshot = tournament_counts(&ctx).await;
    assert_eq!(snapshot.counts.get(&GameId::new("valorant")), 1);
    assert_eq!(snapshot.counts.get(&GameId::new("freefire")), 1);

    let offline = ApiContext {
        source: Some(Arc::new(OfflineSource)),
        ..ctx.clone()
    };
    assert_eq!(tournament_counts(&offline).await, snapshot);
}
