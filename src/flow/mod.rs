//! Quiz progression core
//!
//! Deterministic and clock-free:
//! - Time only advances through `tick(dt)`
//! - Shuffling uses a seeded RNG
//! - Host collaborators are passed in, never global

pub mod machine;
pub mod selection;
pub mod session;
pub mod state;
pub mod timer;

#[cfg(test)]
mod testing;

pub use machine::{ProgressionMachine, Services};
pub use selection::AnswerSelection;
pub use session::QuestionSetSession;
pub use state::{ProgressionState, QuizInput, RoundPhase, Signal};
pub use timer::{RoundTimer, TimerBand};
