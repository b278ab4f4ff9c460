//! Quiz Flow entry point
//!
//! Native build runs a headless session: an automated player answers
//! every question while the flow drives logging collaborators. Browser
//! builds use the `web` bindings from the library instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::sync::Arc;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use quiz_flow::audio::{AudioManager, LogSoundPlayer};
    use quiz_flow::consts::{FRAME_DT, MAX_FRAMES};
    use quiz_flow::flow::{ProgressionMachine, ProgressionState, QuizInput, RoundPhase, Services};
    use quiz_flow::persistence::JsonFileStore;
    use quiz_flow::platform::{self, HeadlessSceneHost, LogPresenter};
    use quiz_flow::questions::{FallbackSource, LocalSource, load_pool};
    use quiz_flow::{ScoreLedger, Settings};

    platform::init_logging();
    log::info!("Quiz Flow (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let question_file = args.next().unwrap_or_else(|| settings.question_file.clone());

    let seed = settings.seed.unwrap_or_else(rand::random);
    let mut rng = Pcg32::seed_from_u64(seed);
    // The configured file backs up an explicitly given one
    let mut source =
        FallbackSource::from_settings(Box::new(LocalSource::new(&question_file)), &settings);
    let pool = match load_pool(&settings, &mut source, &mut rng) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("No questions ({}), nothing to play", e);
            return;
        }
    };

    let ledger = ScoreLedger::new(
        Box::new(JsonFileStore::new(&settings.high_score_path)),
        settings.high_score_key.clone(),
    );
    let services = Services {
        presenter: Box::new(LogPresenter),
        scenes: Box::new(HeadlessSceneHost::new(&settings.scenes)),
        audio: AudioManager::new(Box::new(LogSoundPlayer)),
    };
    let mut machine = ProgressionMachine::new(settings, Arc::new(pool), ledger, services);
    log::info!("High score to beat: {}", machine.high_score());

    machine.handle_input(QuizInput::StartQuiz);

    // Automated player: thinks for a random time, answers right ~70% of the time
    let mut think_time: f32 = rng.random_range(0.5..4.0);
    for _ in 0..MAX_FRAMES {
        match (machine.state(), machine.phase()) {
            (ProgressionState::Finished | ProgressionState::MainMenu, _) => break,
            (ProgressionState::Stage(_), RoundPhase::Answering) => {
                think_time -= FRAME_DT;
                if think_time <= 0.0 {
                    think_time = rng.random_range(0.5..4.0);
                    if let Some(question) = machine.current_question().cloned() {
                        let picks: Vec<usize> = if rng.random_bool(0.7) {
                            question.correct.iter().copied().collect()
                        } else {
                            vec![rng.random_range(0..question.options.len())]
                        };
                        for pick in picks {
                            machine.handle_input(QuizInput::PickAnswer(pick));
                        }
                        machine.handle_input(QuizInput::SubmitAnswer);
                    }
                }
            }
            (ProgressionState::Stage(_), RoundPhase::Resolved)
                if machine.settings().resolution_delay.is_none() =>
            {
                machine.handle_input(QuizInput::RequestNextQuestion);
            }
            _ => {}
        }
        machine.tick(FRAME_DT);
    }

    log::info!(
        "Session over in {:?}: score {}, best {}",
        machine.state(),
        machine.score(),
        machine.high_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is quiz_flow::web::WebQuiz
}
