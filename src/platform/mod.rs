//! Platform abstraction layer
//!
//! Host-side collaborators the flow drives:
//! - `Presenter`: question/score/timer display
//! - `SceneHost`: loads named scenes
//! - logger setup per target
//!
//! The headless implementations log every call and are what the native
//! binary runs with.

use std::collections::BTreeSet;

use crate::flow::TimerBand;
use crate::questions::{QuestionRecord, Tier};
use crate::settings::SceneTable;

/// Outcome shown to the player between questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Correct { delta: i64 },
    Incorrect { delta: i64 },
    DifficultyIntro(Tier),
    Finished { final_score: u64, new_high_score: bool },
}

/// UI side of the game. Forwards user actions back as `QuizInput`s.
pub trait Presenter {
    fn show_question(&mut self, question: &QuestionRecord);
    fn show_resolution(&mut self, resolution: Resolution);
    fn update_score(&mut self, current: u64);
    fn update_timer(&mut self, remaining: f32, band: TimerBand);
}

/// Loads scenes by name
pub trait SceneHost {
    /// Returns false if the scene does not exist
    fn request_scene(&mut self, name: &str) -> bool;
}

/// Presenter that writes to the log
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn show_question(&mut self, question: &QuestionRecord) {
        log::info!("[{}] {}", question.tier, question.text);
        for (i, option) in question.options.iter().enumerate() {
            log::info!("  {}) {}", i, option);
        }
    }

    fn show_resolution(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Correct { delta } => log::info!("Correct! +{}", delta),
            Resolution::Incorrect { delta } => log::info!("Wrong! {}", delta),
            Resolution::DifficultyIntro(tier) => log::info!("=== {} ===", tier),
            Resolution::Finished {
                final_score,
                new_high_score,
            } => {
                log::info!("Final score: {}", final_score);
                if new_high_score {
                    log::info!("NEW HIGHSCORE");
                }
            }
        }
    }

    fn update_score(&mut self, current: u64) {
        log::debug!("score {}", current);
    }

    fn update_timer(&mut self, remaining: f32, band: TimerBand) {
        log::trace!("timer {:.2} ({:?})", remaining, band);
    }
}

/// Scene host that accepts any scene named in its table
#[derive(Debug, Clone)]
pub struct HeadlessSceneHost {
    known: BTreeSet<String>,
    current: Option<String>,
}

impl HeadlessSceneHost {
    pub fn new(scenes: &SceneTable) -> Self {
        let mut known: BTreeSet<String> = scenes.stages.values().cloned().collect();
        known.extend(scenes.minigames.values().cloned());
        known.insert(scenes.menu.clone());
        known.extend(scenes.finished.clone());
        Self {
            known,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl SceneHost for HeadlessSceneHost {
    fn request_scene(&mut self, name: &str) -> bool {
        if !self.known.contains(name) {
            log::warn!("Unknown scene '{}'", name);
            return false;
        }
        log::info!("Loading scene {}", name);
        self.current = Some(name.to_string());
        true
    }
}

/// Initialise logging for the current target
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialised");
    }
}

/// Initialise logging for the current target
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_host_knows_table_scenes() {
        let mut table = SceneTable::default();
        table.finished = Some("Results".into());
        let mut host = HeadlessSceneHost::new(&table);
        assert!(host.request_scene("StageEasy"));
        assert!(host.request_scene("MinigameHard"));
        assert!(host.request_scene("Results"));
        assert!(!host.request_scene("MinigameVeryHard"));
        assert_eq!(host.current(), Some("Results"));
    }
}
