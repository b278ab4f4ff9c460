//! Game settings
//!
//! Quota, per-tier metadata, the scene-name table and file locations.
//! Loaded from JSON; any missing field takes its default.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MINIGAME_SECONDS, DEFAULT_QUOTA, HIGH_SCORE_KEY};
use crate::error::Result;
use crate::questions::Tier;

/// Metadata attached to one difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierSettings {
    /// Minigame countdown after this tier (unused for VeryHard)
    pub minigame_seconds: f32,
    /// Time limit for records that do not specify one
    pub default_time_limit: u32,
    /// Score value for records that do not specify one
    pub default_score: u32,
}

impl Default for TierSettings {
    fn default() -> Self {
        Self {
            minigame_seconds: DEFAULT_MINIGAME_SECONDS,
            default_time_limit: 20,
            default_score: 10,
        }
    }
}

/// Per-tier metadata table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    pub easy: TierSettings,
    pub medium: TierSettings,
    pub hard: TierSettings,
    pub very_hard: TierSettings,
}

impl Default for TierTable {
    fn default() -> Self {
        let tier = |time, score| TierSettings {
            default_time_limit: time,
            default_score: score,
            ..Default::default()
        };
        Self {
            easy: tier(20, 10),
            medium: tier(20, 20),
            hard: tier(15, 30),
            very_hard: tier(15, 40),
        }
    }
}

impl TierTable {
    pub fn get(&self, tier: Tier) -> &TierSettings {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
            Tier::VeryHard => &self.very_hard,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut TierSettings {
        match tier {
            Tier::Easy => &mut self.easy,
            Tier::Medium => &mut self.medium,
            Tier::Hard => &mut self.hard,
            Tier::VeryHard => &mut self.very_hard,
        }
    }
}

/// Maps progression states to scene names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneTable {
    pub menu: String,
    pub stages: BTreeMap<Tier, String>,
    pub minigames: BTreeMap<Tier, String>,
    /// Optional results scene; when absent the last stage scene stays up
    pub finished: Option<String>,
}

impl Default for SceneTable {
    fn default() -> Self {
        let stages = Tier::ALL
            .iter()
            .map(|t| (*t, format!("Stage{}", t.as_str())))
            .collect();
        let minigames = Tier::ALL
            .iter()
            .filter(|t| t.has_minigame())
            .map(|t| (*t, format!("Minigame{}", t.as_str())))
            .collect();
        Self {
            menu: "MainMenu".to_string(),
            stages,
            minigames,
            finished: None,
        }
    }
}

impl SceneTable {
    pub fn stage(&self, tier: Tier) -> Option<&str> {
        self.stages.get(&tier).map(String::as_str)
    }

    pub fn minigame(&self, tier: Tier) -> Option<&str> {
        self.minigames.get(&tier).map(String::as_str)
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Questions per tier per run
    pub quota: usize,
    /// RNG seed for pool shuffling (None = fresh seed per process)
    pub seed: Option<u64>,
    pub tiers: TierTable,
    /// Seconds before auto-advancing after a resolved question.
    /// None waits for an explicit next-question request.
    pub resolution_delay: Option<f32>,
    pub scenes: SceneTable,

    // === Files ===
    /// Local question file (JSON array of records)
    pub question_file: String,
    /// Use the local file when the remote generator fails
    pub fallback_to_local: bool,
    /// Where the native build keeps the high score
    pub high_score_path: String,
    /// Store key for the high score record
    pub high_score_key: String,

    // === Audio ===
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quota: DEFAULT_QUOTA,
            seed: None,
            tiers: TierTable::default(),
            resolution_delay: None,
            scenes: SceneTable::default(),

            question_file: "questions.json".to_string(),
            fallback_to_local: true,
            high_score_path: "highscore.json".to_string(),
            high_score_key: HIGH_SCORE_KEY.to_string(),

            muted: false,
        }
    }
}

impl Settings {
    /// Minigame countdown for the minigame following `tier`
    pub fn minigame_seconds(&self, tier: Tier) -> f32 {
        self.tiers.get(tier).minigame_seconds
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file, using defaults if it is missing or
    /// unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
