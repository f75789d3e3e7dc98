//! Registration wizard for the tournament onboarding flow: the static
//! college/game catalog and the step-sequencing state machine that
//! accumulates a user's selections.

pub mod catalog;
pub mod wizard;

pub use catalog::{list_colleges, list_games, Catalog, StaticCatalog};
pub use wizard::{
    Selections, WizardAction, WizardError, WizardState, WizardStep, DEFAULT_HANDOFF_ROUTE,
    GAME_ADVANCE_DELAY,
};
