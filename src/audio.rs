//! Sound cues
//!
//! Playback itself belongs to the host; the flow only says which cue to
//! start or stop.

/// Sound cue identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Menu background loop
    MenuMusic,
    /// Background loop while answering questions
    StageMusic,
    /// Background loop during a minigame
    MinigameMusic,
    /// Answer judged correct
    Correct,
    /// Answer judged wrong (or time ran out)
    Incorrect,
    /// Round timer entered the critical band
    TimerWarning,
    /// Tier intro sting
    DifficultyIntro,
    /// Quiz finished
    Finished,
    /// New high score
    HighScore,
}

impl SoundCue {
    /// Stable id used by string-keyed audio backends
    pub fn id(&self) -> &'static str {
        match self {
            SoundCue::MenuMusic => "menu_music",
            SoundCue::StageMusic => "stage_music",
            SoundCue::MinigameMusic => "minigame_music",
            SoundCue::Correct => "correct",
            SoundCue::Incorrect => "incorrect",
            SoundCue::TimerWarning => "timer_warning",
            SoundCue::DifficultyIntro => "difficulty_intro",
            SoundCue::Finished => "finished",
            SoundCue::HighScore => "high_score",
        }
    }

    /// Looping cues are stopped explicitly on state changes
    pub fn is_music(&self) -> bool {
        matches!(
            self,
            SoundCue::MenuMusic | SoundCue::StageMusic | SoundCue::MinigameMusic
        )
    }
}

/// Host-side sound playback. Fire-and-forget.
pub trait SoundPlayer {
    fn play(&mut self, cue: SoundCue);
    fn stop(&mut self, cue: SoundCue);
}

/// Player that only logs
#[derive(Debug, Default)]
pub struct LogSoundPlayer;

impl SoundPlayer for LogSoundPlayer {
    fn play(&mut self, cue: SoundCue) {
        log::debug!("play {}", cue.id());
    }

    fn stop(&mut self, cue: SoundCue) {
        log::debug!("stop {}", cue.id());
    }
}

/// Audio front for the flow: mute handling and current music tracking
pub struct AudioManager {
    player: Box<dyn SoundPlayer>,
    muted: bool,
    music: Option<SoundCue>,
}

impl AudioManager {
    pub fn new(player: Box<dyn SoundPlayer>) -> Self {
        Self {
            player,
            muted: false,
            music: None,
        }
    }

    /// Mute/unmute; muting also stops the current music
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            if let Some(music) = self.music {
                self.player.stop(music);
            }
        } else if let Some(music) = self.music {
            self.player.play(music);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a one-shot cue
    pub fn play(&mut self, cue: SoundCue) {
        if !self.muted {
            self.player.play(cue);
        }
    }

    /// Switch the background loop, stopping the previous one
    pub fn play_music(&mut self, cue: SoundCue) {
        if self.music == Some(cue) {
            return;
        }
        if let Some(previous) = self.music.take() {
            self.player.stop(previous);
        }
        self.music = Some(cue);
        if !self.muted {
            self.player.play(cue);
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(previous) = self.music.take() {
            self.player.stop(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl SoundPlayer for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(format!("play {}", cue.id()));
        }
        fn stop(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(format!("stop {}", cue.id()));
        }
    }

    #[test]
    fn test_music_switch_stops_previous() {
        let rec = Recorder::default();
        let mut audio = AudioManager::new(Box::new(rec.clone()));
        audio.play_music(SoundCue::MenuMusic);
        audio.play_music(SoundCue::MenuMusic);
        audio.play_music(SoundCue::StageMusic);
        assert_eq!(
            *rec.0.borrow(),
            vec!["play menu_music", "stop menu_music", "play stage_music"]
        );
    }

    #[test]
    fn test_muted_suppresses_one_shots() {
        let rec = Recorder::default();
        let mut audio = AudioManager::new(Box::new(rec.clone()));
        audio.set_muted(true);
        audio.play(SoundCue::Correct);
        assert!(rec.0.borrow().is_empty());
        audio.set_muted(false);
        audio.play(SoundCue::Correct);
        assert_eq!(*rec.0.borrow(), vec!["play correct"]);
    }

    #[test]
    fn test_cue_ids_unique() {
        let cues = [
            SoundCue::MenuMusic,
            SoundCue::StageMusic,
            SoundCue::MinigameMusic,
            SoundCue::Correct,
            SoundCue::Incorrect,
            SoundCue::TimerWarning,
            SoundCue::DifficultyIntro,
            SoundCue::Finished,
            SoundCue::HighScore,
        ];
        let ids: std::collections::HashSet<_> = cues.iter().map(SoundCue::id).collect();
        assert_eq!(ids.len(), cues.len());
        assert_eq!(cues.iter().filter(|c| c.is_music()).count(), 3);
    }
}
