//! Browser bindings
//!
//! JS owns the frame loop and the UI: it forwards `requestAnimationFrame`
//! deltas to `tick` and player actions to the input methods, then polls
//! state for display. The high score lives in LocalStorage.

use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, LogSoundPlayer};
use crate::flow::{ProgressionMachine, ProgressionState, QuizInput, Services};
use crate::persistence::LocalStorageStore;
use crate::platform::{self, HeadlessSceneHost, LogPresenter};
use crate::questions::{LocalSource, PoolBuilder, Tier};
use crate::scoring::ScoreLedger;
use crate::settings::Settings;

#[wasm_bindgen]
pub struct WebQuiz {
    machine: ProgressionMachine,
}

#[wasm_bindgen]
impl WebQuiz {
    /// Build from a JSON question array and optional JSON settings
    #[wasm_bindgen(constructor)]
    pub fn new(questions_json: &str, settings_json: Option<String>) -> Result<WebQuiz, JsValue> {
        platform::init_logging();
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Settings::default(),
        };
        let seed = settings.seed.unwrap_or_else(rand::random);
        let raw = LocalSource::parse(questions_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let pool = PoolBuilder::from_settings(&settings)
            .build(&raw, &mut Pcg32::seed_from_u64(seed))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let ledger = ScoreLedger::new(
            Box::new(LocalStorageStore),
            settings.high_score_key.clone(),
        );
        let services = Services {
            presenter: Box::new(LogPresenter),
            scenes: Box::new(HeadlessSceneHost::new(&settings.scenes)),
            audio: AudioManager::new(Box::new(LogSoundPlayer)),
        };
        Ok(WebQuiz {
            machine: ProgressionMachine::new(settings, Arc::new(pool), ledger, services),
        })
    }

    pub fn tick(&mut self, dt: f32) {
        self.machine.tick(dt);
    }

    pub fn start(&mut self) {
        self.machine.handle_input(QuizInput::StartQuiz);
    }

    pub fn pick(&mut self, index: usize) {
        self.machine.handle_input(QuizInput::PickAnswer(index));
    }

    pub fn submit(&mut self) {
        self.machine.handle_input(QuizInput::SubmitAnswer);
    }

    pub fn next(&mut self) {
        self.machine.handle_input(QuizInput::RequestNextQuestion);
    }

    /// Minigame scene finished early; `tier` is the tier index it follows
    pub fn minigame_finished(&mut self, tier: usize) {
        if let Some(tier) = Tier::from_index(tier) {
            self.machine.handle_input(QuizInput::MinigameFinished(tier));
        }
    }

    pub fn restart(&mut self) {
        self.machine.handle_input(QuizInput::RestartQuiz);
    }

    pub fn quit(&mut self) {
        self.machine.handle_input(QuizInput::Quit);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.machine.set_muted(muted);
    }

    /// "MainMenu", "Stage:<tier>", "Minigame:<tier>" or "Finished"
    pub fn state(&self) -> String {
        match self.machine.state() {
            ProgressionState::MainMenu => "MainMenu".to_string(),
            ProgressionState::Stage(t) => format!("Stage:{}", t),
            ProgressionState::Minigame(t) => format!("Minigame:{}", t),
            ProgressionState::Finished => "Finished".to_string(),
        }
    }

    /// Current question as JSON, or null
    pub fn question(&self) -> Option<String> {
        self.machine
            .current_question()
            .and_then(|q| serde_json::to_string(q).ok())
    }

    pub fn score(&self) -> u64 {
        self.machine.score()
    }

    pub fn high_score(&self) -> u64 {
        self.machine.high_score()
    }

    pub fn time_remaining(&self) -> f32 {
        match self.machine.state() {
            ProgressionState::Minigame(_) => self.machine.minigame_timer().remaining(),
            _ => self.machine.round_timer().remaining(),
        }
    }
}
