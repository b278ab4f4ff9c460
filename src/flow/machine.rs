//! Progression state machine
//!
//! Owns the active question session, the round and minigame timers, the
//! answer selection and the score ledger. Everything is advanced by
//! `tick(dt)` and `handle_input`; nothing here reads a clock.
//!
//! Structural errors never escape: they are logged and the machine falls
//! back to the main menu.

use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::selection::AnswerSelection;
use super::session::QuestionSetSession;
use super::state::{ProgressionState, QuizInput, RoundPhase, Signal};
use super::timer::{RoundTimer, TimerBand};
use crate::audio::{AudioManager, SoundCue};
use crate::error::{QuizError, Result};
use crate::platform::{Presenter, Resolution, SceneHost};
use crate::questions::{QuestionPool, QuestionRecord, Tier};
use crate::scoring::ScoreLedger;
use crate::settings::Settings;

/// Host collaborators driven by the machine
pub struct Services {
    pub presenter: Box<dyn Presenter>,
    pub scenes: Box<dyn SceneHost>,
    pub audio: AudioManager,
}

pub struct ProgressionMachine {
    settings: Settings,
    pool: Arc<QuestionPool>,
    rng: Pcg32,
    state: ProgressionState,
    phase: RoundPhase,
    session: Option<QuestionSetSession>,
    selection: AnswerSelection,
    round_timer: RoundTimer,
    minigame_timer: RoundTimer,
    /// Auto-advance alarm after a resolved question
    advance_timer: RoundTimer,
    ledger: ScoreLedger,
    services: Services,
    /// Last completion signal acted on, for duplicate detection
    last_signal: Option<Signal>,
    quit_requested: bool,
}

impl ProgressionMachine {
    pub fn new(
        settings: Settings,
        pool: Arc<QuestionPool>,
        ledger: ScoreLedger,
        mut services: Services,
    ) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Progression seeded with {}", seed);
        services.audio.set_muted(settings.muted);
        Self {
            settings,
            pool,
            rng: Pcg32::seed_from_u64(seed),
            state: ProgressionState::MainMenu,
            phase: RoundPhase::Idle,
            session: None,
            selection: AnswerSelection::default(),
            round_timer: RoundTimer::new(),
            minigame_timer: RoundTimer::new(),
            advance_timer: RoundTimer::new(),
            ledger,
            services,
            last_signal: None,
            quit_requested: false,
        }
    }

    // === Accessors ===

    pub fn state(&self) -> ProgressionState {
        self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.ledger.current()
    }

    pub fn high_score(&self) -> u64 {
        self.ledger.high_watermark()
    }

    pub fn session(&self) -> Option<&QuestionSetSession> {
        self.session.as_ref()
    }

    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.session.as_ref().and_then(|s| s.current().ok())
    }

    pub fn selection(&self) -> &AnswerSelection {
        &self.selection
    }

    pub fn round_timer(&self) -> &RoundTimer {
        &self.round_timer
    }

    pub fn minigame_timer(&self) -> &RoundTimer {
        &self.minigame_timer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.services.audio.set_muted(muted);
    }

    /// Install a new question pool (topic change). Only allowed in the
    /// main menu.
    pub fn select_pool(&mut self, pool: Arc<QuestionPool>) -> bool {
        if self.state != ProgressionState::MainMenu {
            log::warn!("Ignoring pool change outside the main menu ({:?})", self.state);
            return false;
        }
        log::info!("Question pool replaced ({} entries)", pool.len());
        self.pool = pool;
        true
    }

    // === Input ===

    /// Dispatch a player action
    pub fn handle_input(&mut self, input: QuizInput) {
        match input {
            QuizInput::StartQuiz => {
                self.start_quiz();
            }
            QuizInput::PickAnswer(index) => self.pick_answer(index),
            QuizInput::SubmitAnswer => self.submit_answer(),
            QuizInput::RequestNextQuestion => self.request_next_question(),
            QuizInput::MinigameFinished(tier) => {
                self.on_minigame_complete(tier);
            }
            QuizInput::RestartQuiz => {
                self.restart();
            }
            QuizInput::Quit => self.quit(),
        }
    }

    /// MainMenu → Stage(Easy)
    pub fn start_quiz(&mut self) -> ProgressionState {
        self.signal(Signal::StartQuiz)
    }

    /// Tier finished: next minigame, or Finished after VeryHard
    pub fn on_difficulty_complete(&mut self, tier: Tier) -> ProgressionState {
        self.signal(Signal::DifficultyComplete(tier))
    }

    /// Minigame finished: next tier's stage
    pub fn on_minigame_complete(&mut self, tier: Tier) -> ProgressionState {
        self.signal(Signal::MinigameComplete(tier))
    }

    /// Back to Stage(Easy) from anywhere with a fresh score
    pub fn restart(&mut self) -> ProgressionState {
        log::info!("Restarting quiz from {:?}", self.state);
        self.last_signal = None;
        self.ledger.reset();
        self.services.presenter.update_score(self.ledger.current());
        match self.enter(ProgressionState::Stage(Tier::Easy)) {
            Ok(()) => {
                self.last_signal = Some(Signal::StartQuiz);
                self.state
            }
            Err(e) => self.recover(e),
        }
    }

    /// Leave to the main menu and flag the host loop to exit
    pub fn quit(&mut self) {
        log::info!("Quit requested");
        self.enter_main_menu();
        self.quit_requested = true;
    }

    pub fn pick_answer(&mut self, index: usize) {
        if !self.accepting_answers() {
            log::debug!("Ignoring pick {} outside of answering", index);
            return;
        }
        let in_range = self
            .current_question()
            .is_some_and(|q| index < q.options.len());
        if !in_range {
            log::warn!("Pick {} is not a valid option", index);
            return;
        }
        self.selection.select(index);
    }

    /// Manual accept of the current picks
    pub fn submit_answer(&mut self) {
        if !self.accepting_answers() {
            log::debug!("Ignoring submit in {:?}/{:?}", self.state, self.phase);
            return;
        }
        if let Err(e) = self.resolve_answer() {
            self.recover(e);
        }
    }

    pub fn request_next_question(&mut self) {
        if !self.state.is_stage() || self.phase != RoundPhase::Resolved {
            log::debug!("Ignoring next-question in {:?}/{:?}", self.state, self.phase);
            return;
        }
        if let Err(e) = self.next_question() {
            self.recover(e);
        }
    }

    // === Frame tick ===

    /// Advance the active timer by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        match self.state {
            ProgressionState::Stage(_) => match self.phase {
                RoundPhase::Answering if self.round_timer.is_running() => {
                    let before = self.round_timer.band();
                    let expired = self.round_timer.tick(dt);
                    let band = self.round_timer.band();
                    self.services
                        .presenter
                        .update_timer(self.round_timer.remaining(), band);
                    if band == TimerBand::Critical && before != TimerBand::Critical {
                        self.services.audio.play(SoundCue::TimerWarning);
                    }
                    if expired {
                        log::debug!("Question timed out");
                        if let Err(e) = self.resolve_answer() {
                            self.recover(e);
                        }
                    }
                }
                RoundPhase::Resolved => {
                    if self.advance_timer.tick(dt) {
                        self.request_next_question();
                    }
                }
                _ => {}
            },
            ProgressionState::Minigame(tier) => {
                let expired = self.minigame_timer.tick(dt);
                self.services.presenter.update_timer(
                    self.minigame_timer.remaining(),
                    self.minigame_timer.band(),
                );
                if expired {
                    log::info!("Minigame after {} timed out", tier);
                    self.on_minigame_complete(tier);
                }
            }
            ProgressionState::MainMenu | ProgressionState::Finished => {}
        }
    }

    // === Transitions ===

    fn accepting_answers(&self) -> bool {
        self.state.is_stage() && self.phase == RoundPhase::Answering
    }

    /// Target state for a signal, if the signal is valid here
    fn target(&self, signal: Signal) -> Option<ProgressionState> {
        use ProgressionState::*;
        match (self.state, signal) {
            (MainMenu, Signal::StartQuiz) => Some(Stage(Tier::Easy)),
            (Stage(current), Signal::DifficultyComplete(tier)) if current == tier => {
                if tier.has_minigame() {
                    Some(Minigame(tier))
                } else {
                    Some(Finished)
                }
            }
            (Minigame(current), Signal::MinigameComplete(tier)) if current == tier => {
                tier.next().map(Stage)
            }
            _ => None,
        }
    }

    fn signal(&mut self, signal: Signal) -> ProgressionState {
        let Some(next) = self.target(signal) else {
            if self.last_signal == Some(signal) {
                log::debug!("Ignoring repeated {:?} in {:?}", signal, self.state);
                return self.state;
            }
            return self.recover(QuizError::InvalidTransition {
                state: self.state,
                signal,
            });
        };

        if signal == Signal::StartQuiz {
            self.ledger.reset();
            self.services.presenter.update_score(self.ledger.current());
        }
        match self.enter(next) {
            Ok(()) => {
                self.last_signal = Some(signal);
                self.state
            }
            Err(e) => self.recover(e),
        }
    }

    /// Perform the entry actions of `next` and make it current
    fn enter(&mut self, next: ProgressionState) -> Result<()> {
        log::info!("{:?} -> {:?}", self.state, next);
        match next {
            ProgressionState::MainMenu => {
                self.enter_main_menu();
                return Ok(());
            }
            ProgressionState::Stage(tier) => self.enter_stage(tier)?,
            ProgressionState::Minigame(tier) => self.enter_minigame(tier)?,
            ProgressionState::Finished => self.enter_finished(),
        }
        self.state = next;
        Ok(())
    }

    fn enter_stage(&mut self, tier: Tier) -> Result<()> {
        let session = QuestionSetSession::start(&self.pool, tier, &mut self.rng)?;
        let scene = self
            .settings
            .scenes
            .stage(tier)
            .map(str::to_string)
            .unwrap_or_default();
        self.load_scene(&scene)?;

        log::info!("Stage {} with {} questions", tier, session.len());
        self.minigame_timer.stop_early();
        self.session = Some(session);
        self.services.audio.play_music(SoundCue::StageMusic);
        self.services.audio.play(SoundCue::DifficultyIntro);
        self.services
            .presenter
            .show_resolution(Resolution::DifficultyIntro(tier));
        self.present_question()
    }

    fn enter_minigame(&mut self, tier: Tier) -> Result<()> {
        let scene = self
            .settings
            .scenes
            .minigame(tier)
            .map(str::to_string)
            .unwrap_or_default();
        self.load_scene(&scene)?;

        self.clear_round();
        let limit = self.settings.minigame_seconds(tier);
        log::info!("Minigame after {} ({}s)", tier, limit);
        self.minigame_timer.start(limit);
        self.services.audio.play_music(SoundCue::MinigameMusic);
        self.services
            .presenter
            .update_timer(self.minigame_timer.remaining(), self.minigame_timer.band());
        Ok(())
    }

    fn enter_finished(&mut self) {
        self.clear_round();
        self.minigame_timer.stop_early();
        let new_high_score = self.ledger.commit_high_score_if_beaten();
        let final_score = self.ledger.current();
        log::info!("Quiz finished with {} points", final_score);

        self.services.audio.stop_music();
        self.services.audio.play(SoundCue::Finished);
        if new_high_score {
            self.services.audio.play(SoundCue::HighScore);
        }
        if let Some(scene) = self.settings.scenes.finished.clone() {
            if !self.services.scenes.request_scene(&scene) {
                log::warn!("Results scene '{}' missing, staying on stage", scene);
            }
        }
        self.services.presenter.show_resolution(Resolution::Finished {
            final_score,
            new_high_score,
        });
    }

    /// Safe default: never fails
    fn enter_main_menu(&mut self) {
        self.clear_round();
        self.minigame_timer.stop_early();
        self.last_signal = None;
        self.state = ProgressionState::MainMenu;
        let menu = self.settings.scenes.menu.clone();
        if !self.services.scenes.request_scene(&menu) {
            log::error!("Main menu scene '{}' could not be loaded", menu);
        }
        self.services.audio.play_music(SoundCue::MenuMusic);
    }

    fn load_scene(&mut self, name: &str) -> Result<()> {
        if name.is_empty() || !self.services.scenes.request_scene(name) {
            return Err(QuizError::SceneUnavailable(name.to_string()));
        }
        Ok(())
    }

    fn recover(&mut self, error: QuizError) -> ProgressionState {
        log::error!("{}; returning to main menu", error);
        self.enter_main_menu();
        self.state
    }

    // === Question loop ===

    fn clear_round(&mut self) {
        self.session = None;
        self.phase = RoundPhase::Idle;
        self.selection.clear();
        self.round_timer.stop_early();
        self.advance_timer.stop_early();
    }

    fn present_question(&mut self) -> Result<()> {
        let question = self
            .session
            .as_ref()
            .ok_or(QuizError::Index { cursor: 0, len: 0 })?
            .current()?
            .clone();

        self.selection.reset_for(&question);
        self.advance_timer.stop_early();
        self.phase = RoundPhase::Answering;
        if question.uses_timer {
            self.round_timer.start(question.time_limit_seconds as f32);
            self.services
                .presenter
                .update_timer(self.round_timer.remaining(), self.round_timer.band());
        } else {
            self.round_timer.stop_early();
        }
        self.services.presenter.show_question(&question);
        Ok(())
    }

    /// Judge the current picks (manual accept or timeout) and apply the
    /// score delta
    fn resolve_answer(&mut self) -> Result<()> {
        let session = self
            .session
            .as_ref()
            .ok_or(QuizError::Index { cursor: 0, len: 0 })?;
        let question = session.current()?;
        let correct = self.selection.is_correct(&question.correct);
        let value = i64::from(question.score_value);

        self.round_timer.stop_early();
        let (delta, resolution, cue) = if correct {
            (value, Resolution::Correct { delta: value }, SoundCue::Correct)
        } else {
            (-value, Resolution::Incorrect { delta: -value }, SoundCue::Incorrect)
        };
        let score = self.ledger.apply_delta(delta);
        self.phase = RoundPhase::Resolved;

        self.services.audio.play(cue);
        self.services.presenter.show_resolution(resolution);
        self.services.presenter.update_score(score);
        if let Some(delay) = self.settings.resolution_delay {
            self.advance_timer.start(delay);
        }
        Ok(())
    }

    fn next_question(&mut self) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or(QuizError::Index { cursor: 0, len: 0 })?;
        if session.advance() {
            return self.present_question();
        }
        let tier = session.tier();
        log::info!("All {} questions of {} answered", session.len(), tier);
        self.on_difficulty_complete(tier);
        Ok(())
    }
}
