//! Recording collaborators and a machine fixture for tests

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde_json::{Value, json};

use super::machine::{ProgressionMachine, Services};
use super::timer::TimerBand;
use crate::audio::{AudioManager, SoundCue, SoundPlayer};
use crate::consts::HIGH_SCORE_KEY;
use crate::persistence::MemoryStore;
use crate::platform::{Presenter, Resolution, SceneHost};
use crate::questions::{PoolBuilder, QuestionRecord};
use crate::scoring::ScoreLedger;
use crate::settings::Settings;

const ALL_TIERS: &[&str] = &["easy", "medium", "hard", "veryhard"];

fn raw_questions(quota: usize, tiers: &[&str]) -> Vec<Value> {
    tiers
        .iter()
        .flat_map(|tier| {
            (0..quota).map(move |n| {
                json!({
                    "text": format!("{} {}", tier, n),
                    "options": ["a", "b", "c", "d"],
                    "correct": n % 4,
                    "difficulty": tier,
                    "scoreValue": 10
                })
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Question(String),
    Resolution(Resolution),
    Score(u64),
    Timer(f32, TimerBand),
    Scene(String),
    Play(&'static str),
    Stop(&'static str),
}

#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Call>>>);

impl Recorder {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

impl Presenter for Recorder {
    fn show_question(&mut self, question: &QuestionRecord) {
        self.push(Call::Question(question.text.clone()));
    }

    fn show_resolution(&mut self, resolution: Resolution) {
        self.push(Call::Resolution(resolution));
    }

    fn update_score(&mut self, current: u64) {
        self.push(Call::Score(current));
    }

    fn update_timer(&mut self, remaining: f32, band: TimerBand) {
        self.push(Call::Timer(remaining, band));
    }
}

impl SceneHost for Recorder {
    fn request_scene(&mut self, name: &str) -> bool {
        self.push(Call::Scene(name.to_string()));
        true
    }
}

impl SoundPlayer for Recorder {
    fn play(&mut self, cue: SoundCue) {
        self.push(Call::Play(cue.id()));
    }

    fn stop(&mut self, cue: SoundCue) {
        self.push(Call::Stop(cue.id()));
    }
}

pub struct Fixture {
    pub machine: ProgressionMachine,
    pub recorder: Recorder,
    pub store: MemoryStore,
}

impl Fixture {
    /// `quota` distinct questions in every tier, 10 points each
    pub fn new(quota: usize) -> Self {
        Self::with_tiers(quota, ALL_TIERS)
    }

    pub fn with_tiers(quota: usize, tiers: &[&str]) -> Self {
        Self::build(quota, &raw_questions(quota, tiers), MemoryStore::new())
    }

    pub fn with_raw(quota: usize, make: impl Fn(usize) -> Value) -> Self {
        let raw: Vec<Value> = (0..quota).map(make).collect();
        Self::build(quota, &raw, MemoryStore::new())
    }

    pub fn with_high_score(quota: usize, high_score: i64) -> Self {
        let store = MemoryStore::with_value(HIGH_SCORE_KEY, high_score);
        Self::build(quota, &raw_questions(quota, ALL_TIERS), store)
    }

    fn build(quota: usize, raw: &[Value], store: MemoryStore) -> Self {
        let recorder = Recorder::default();
        let machine = Self::machine(quota, raw, store.clone(), recorder.clone());
        Self {
            machine,
            recorder,
            store,
        }
    }

    fn machine(
        quota: usize,
        raw: &[Value],
        store: MemoryStore,
        recorder: Recorder,
    ) -> ProgressionMachine {
        let settings = Settings {
            quota,
            seed: Some(1234),
            ..Default::default()
        };
        let pool = PoolBuilder::from_settings(&settings)
            .build(raw, &mut Pcg32::seed_from_u64(1234))
            .unwrap();
        let ledger = ScoreLedger::new(Box::new(store), settings.high_score_key.clone());
        let services = Services {
            presenter: Box::new(recorder.clone()),
            scenes: Box::new(recorder.clone()),
            audio: AudioManager::new(Box::new(recorder)),
        };
        ProgressionMachine::new(settings, Arc::new(pool), ledger, services)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.0.borrow().clone()
    }

    /// First correct index of the question on screen
    pub fn correct_index(&self) -> usize {
        let question = self.machine.current_question().unwrap();
        *question.correct.iter().next().unwrap()
    }

    /// Pick the correct set (or a wrong single option) and submit
    pub fn answer(&mut self, correctly: bool) {
        let question = self.machine.current_question().unwrap().clone();
        if correctly {
            for &i in &question.correct {
                self.machine.pick_answer(i);
            }
        } else {
            let wrong = (0..question.options.len())
                .find(|i| !question.correct.contains(i))
                .unwrap();
            self.machine.pick_answer(wrong);
        }
        self.machine.submit_answer();
    }
}
