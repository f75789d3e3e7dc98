use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::{
    domain::{CollegeId, GameId, SelectionCategory},
    error::{ApiError, ErrorCode},
    protocol::RegistrationSelection,
};
use thiserror::Error;
use tracing::debug;

use crate::catalog::Catalog;

/// Pause the presentation layer shows between picking a game and the
/// confirmation screen. Transitions themselves never wait.
pub const GAME_ADVANCE_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_HANDOFF_ROUTE: &str = "/register";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Landing,
    CollegeSelection,
    GameSelection,
    Confirmation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Landing,
        WizardStep::CollegeSelection,
        WizardStep::GameSelection,
        WizardStep::Confirmation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn first() -> Self {
        Self::ALL[0]
    }

    pub fn last() -> Self {
        Self::ALL[Self::ALL.len() - 1]
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|index| Self::ALL[index])
    }

    /// The selection a user confirms on this step, if any.
    pub fn selection_category(self) -> Option<SelectionCategory> {
        match self {
            Self::CollegeSelection => Some(SelectionCategory::College),
            Self::GameSelection => Some(SelectionCategory::Game),
            Self::Landing | Self::Confirmation => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("unknown college id '{0}'")]
    UnknownCollege(String),
    #[error("unknown game id '{0}'")]
    UnknownGame(String),
    #[error("cannot {action} while on step {step:?}")]
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },
    #[error("step {step:?} requires a recorded {missing} selection")]
    InconsistentState {
        step: WizardStep,
        missing: SelectionCategory,
    },
}

impl WizardError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::WrongStep { .. })
    }
}

impl From<WizardError> for ApiError {
    fn from(value: WizardError) -> Self {
        let code = if value.is_validation() {
            ErrorCode::Validation
        } else {
            ErrorCode::InvalidTransition
        };
        ApiError::new(code, value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<CollegeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<GameId>,
}

impl Selections {
    fn has(&self, category: SelectionCategory) -> bool {
        match category {
            SelectionCategory::College => self.college.is_some(),
            SelectionCategory::Game => self.game.is_some(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WizardSnapshot {
    step: WizardStep,
    #[serde(default)]
    selections: Selections,
}

impl TryFrom<WizardSnapshot> for WizardState {
    type Error = WizardError;

    fn try_from(value: WizardSnapshot) -> Result<Self, Self::Error> {
        WizardState::restore(value.step, value.selections)
    }
}

/// A user intent, as sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WizardAction {
    ContinueFromLanding,
    SelectCollege { id: String },
    SelectGame { id: String },
    GoBack,
}

/// Immutable wizard state. Every transition returns a new value; a
/// rejected transition leaves the caller holding the previous one.
///
/// Invariant: every selection-bearing step before `step` has a recorded
/// selection. Going back never clears selections, so the current step may
/// already carry the user's earlier choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WizardSnapshot")]
pub struct WizardState {
    step: WizardStep,
    selections: Selections,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: WizardStep::first(),
            selections: Selections::default(),
        }
    }

    /// Rebuilds a state from its parts, rejecting combinations no sequence
    /// of transitions can produce.
    pub fn restore(step: WizardStep, selections: Selections) -> Result<Self, WizardError> {
        if let Some(missing) = WizardStep::ALL[..step.index()]
            .iter()
            .filter_map(|passed| passed.selection_category())
            .find(|category| !selections.has(*category))
        {
            return Err(WizardError::InconsistentState { step, missing });
        }
        Ok(Self { step, selections })
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn selected_college(&self) -> Option<&CollegeId> {
        self.selections.college.as_ref()
    }

    pub fn selected_game(&self) -> Option<&GameId> {
        self.selections.game.as_ref()
    }

    /// The recorded id for `category`, rendered as the highlighted card.
    pub fn selection(&self, category: SelectionCategory) -> Option<&str> {
        match category {
            SelectionCategory::College => self.selected_college().map(CollegeId::as_str),
            SelectionCategory::Game => self.selected_game().map(GameId::as_str),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.step == WizardStep::last()
    }

    pub fn continue_from_landing(&self) -> Self {
        if self.step != WizardStep::Landing {
            return self.clone();
        }
        self.advanced(self.selections.clone())
    }

    pub fn select_college(&self, catalog: &dyn Catalog, id: &str) -> Result<Self, WizardError> {
        self.expect_step(WizardStep::CollegeSelection, "select a college")?;
        if catalog.college(id).is_none() {
            return Err(WizardError::UnknownCollege(id.to_string()));
        }
        let mut selections = self.selections.clone();
        selections.college = Some(CollegeId::new(id));
        Ok(self.advanced(selections))
    }

    pub fn select_game(&self, catalog: &dyn Catalog, id: &str) -> Result<Self, WizardError> {
        self.expect_step(WizardStep::GameSelection, "select a game")?;
        if catalog.game(id).is_none() {
            return Err(WizardError::UnknownGame(id.to_string()));
        }
        let mut selections = self.selections.clone();
        selections.game = Some(GameId::new(id));
        Ok(self.advanced(selections))
    }

    pub fn go_back(&self) -> Self {
        match self.step.previous() {
            Some(step) => Self {
                step,
                selections: self.selections.clone(),
            },
            None => self.clone(),
        }
    }

    pub fn apply(&self, catalog: &dyn Catalog, action: &WizardAction) -> Result<Self, WizardError> {
        let next = match action {
            WizardAction::ContinueFromLanding => self.continue_from_landing(),
            WizardAction::SelectCollege { id } => self.select_college(catalog, id)?,
            WizardAction::SelectGame { id } => self.select_game(catalog, id)?,
            WizardAction::GoBack => self.go_back(),
        };
        debug!(from = ?self.step, to = ?next.step, ?action, "wizard transition");
        Ok(next)
    }

    /// Checks recorded ids against `catalog`. Used for states that arrive
    /// from outside the process.
    pub fn check_catalog(&self, catalog: &dyn Catalog) -> Result<(), WizardError> {
        if let Some(college) = &self.selections.college {
            if catalog.college(college.as_str()).is_none() {
                return Err(WizardError::UnknownCollege(college.0.clone()));
            }
        }
        if let Some(game) = &self.selections.game {
            if catalog.game(game.as_str()).is_none() {
                return Err(WizardError::UnknownGame(game.0.clone()));
            }
        }
        Ok(())
    }

    /// Selections to hand to the registration screen once the user has
    /// reached confirmation.
    pub fn submission(&self, handoff_route: &str) -> Option<RegistrationSelection> {
        if !self.is_terminal() {
            return None;
        }
        Some(RegistrationSelection {
            college: self.selections.college.clone()?,
            game: self.selections.game.clone()?,
            handoff_route: handoff_route.to_string(),
        })
    }

    fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                action,
                step: self.step,
            })
        }
    }

    fn advanced(&self, selections: Selections) -> Self {
        Self {
            step: self.step.next().unwrap_or(self.step),
            selections,
        }
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
