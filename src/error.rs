//! Error taxonomy for pool building, sessions and progression
//!
//! Validation errors are recoverable (the record is dropped). Everything
//! else is structural and ends with a return to the main menu.

use thiserror::Error;

use crate::flow::{ProgressionState, Signal};
use crate::questions::Tier;

#[derive(Debug, Error)]
pub enum QuizError {
    /// A raw question record could not be turned into a `QuestionRecord`
    #[error("invalid question record #{index}: {reason}")]
    Validation { index: usize, reason: String },

    /// The question source yielded nothing usable
    #[error("question source is empty or not a collection")]
    EmptySource,

    /// The pool has no questions for the requested tier
    #[error("no questions available for tier {0}")]
    TierUnavailable(Tier),

    /// Session cursor used outside of its range
    #[error("question cursor {cursor} out of range (len {len})")]
    Index { cursor: usize, len: usize },

    /// A signal arrived that the current state cannot handle
    #[error("signal {signal:?} is not valid in state {state:?}")]
    InvalidTransition {
        state: ProgressionState,
        signal: Signal,
    },

    /// The scene host does not know the requested scene
    #[error("scene '{0}' could not be loaded")]
    SceneUnavailable(String),

    /// Remote question generation failed (timeout, bad payload, short quota)
    #[error("remote question source failed: {0}")]
    RemoteSource(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
