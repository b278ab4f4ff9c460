//! Progression states, completion signals and player inputs

use crate::questions::Tier;

/// Where the player is in the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressionState {
    #[default]
    MainMenu,
    /// Answering questions of a tier
    Stage(Tier),
    /// Interlude after finishing the given tier (never VeryHard)
    Minigame(Tier),
    /// Run complete, final score shown
    Finished,
}

impl ProgressionState {
    pub fn tier(&self) -> Option<Tier> {
        match self {
            ProgressionState::Stage(t) | ProgressionState::Minigame(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_stage(&self) -> bool {
        matches!(self, ProgressionState::Stage(_))
    }

    pub fn is_minigame(&self) -> bool {
        matches!(self, ProgressionState::Minigame(_))
    }
}

/// Signals that move the progression forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    StartQuiz,
    /// Every question of the tier has been answered
    DifficultyComplete(Tier),
    /// The minigame following the tier has ended
    MinigameComplete(Tier),
}

/// Sub-phase of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    /// No question on screen (menu, minigame, finished)
    #[default]
    Idle,
    /// Question shown, picks accepted
    Answering,
    /// Answer judged, waiting for the next question
    Resolved,
}

/// Player actions forwarded by the presenter (and minigame scenes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInput {
    StartQuiz,
    PickAnswer(usize),
    SubmitAnswer,
    RequestNextQuestion,
    /// The minigame scene reports it is done before its timer ran out
    MinigameFinished(Tier),
    RestartQuiz,
    Quit,
}
