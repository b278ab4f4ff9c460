//! Quiz Flow - tiered quiz progression with minigame interludes
//!
//! Core modules:
//! - `flow`: Progression state machine, round timer, sessions, answer picks
//! - `questions`: Question records, pool assembly, question sources
//! - `scoring`: Score ledger with persisted high score
//! - `persistence`: Integer record stores (memory, JSON file, LocalStorage)
//! - `platform`: Presenter/scene host contracts and headless implementations
//! - `settings`: Data-driven quotas, tier metadata and scene names

pub mod audio;
pub mod error;
pub mod flow;
pub mod persistence;
pub mod platform;
pub mod questions;
pub mod scoring;
pub mod settings;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::QuizError;
pub use flow::{ProgressionMachine, ProgressionState, QuizInput};
pub use questions::{QuestionPool, QuestionRecord, Tier};
pub use scoring::ScoreLedger;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Questions per tier per run
    pub const DEFAULT_QUOTA: usize = 25;
    /// Minigame countdown (seconds)
    pub const DEFAULT_MINIGAME_SECONDS: f32 = 30.0;
    /// Fewest answer options a question may have
    pub const MIN_OPTIONS: usize = 4;

    /// Persistent store key for the best score
    pub const HIGH_SCORE_KEY: &str = "highscore";

    /// Headless frame delta (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Frame cap for headless runs
    pub const MAX_FRAMES: u32 = 60 * 60 * 60;
}
