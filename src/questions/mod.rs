//! Question data: difficulty tiers, validated records, raw record parsing
//!
//! Raw records arrive as loose JSON (from a local file or a remote
//! generator). Anything that does not satisfy the record invariants is
//! rejected with `QuizError::Validation` and dropped by the pool builder.

pub mod pool;
pub mod source;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::MIN_OPTIONS;
use crate::error::{QuizError, Result};
use crate::settings::TierTable;

pub use pool::{PoolBuilder, QuestionPool};
pub use source::{FallbackSource, LocalSource, QuestionSource, load_pool};

/// Difficulty tier, ordered Easy < Medium < Hard < VeryHard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Tier {
    #[default]
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Easy, Tier::Medium, Tier::Hard, Tier::VeryHard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
            Tier::VeryHard => "VeryHard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Tier::Easy),
            "medium" | "med" => Some(Tier::Medium),
            "hard" => Some(Tier::Hard),
            "veryhard" | "very_hard" | "very-hard" | "very hard" => Some(Tier::VeryHard),
            _ => None,
        }
    }

    /// Position in the tier ordering (0-based)
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The tier played after this one, if any
    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Whether a minigame interlude follows this tier
    pub fn has_minigame(&self) -> bool {
        *self != Tier::VeryHard
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How picks are interpreted for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// One pick; picking again replaces it
    Single,
    /// Each pick toggles membership
    Multi,
}

/// A validated question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub text: String,
    /// Unique option strings, at least `MIN_OPTIONS`
    pub options: Vec<String>,
    /// Non-empty, every index valid for `options`
    pub correct: BTreeSet<usize>,
    pub tier: Tier,
    pub uses_timer: bool,
    pub time_limit_seconds: u32,
    pub score_value: u32,
}

impl QuestionRecord {
    pub fn selection_mode(&self) -> SelectionMode {
        if self.correct.len() > 1 {
            SelectionMode::Multi
        } else {
            SelectionMode::Single
        }
    }

    /// Option strings currently marked correct
    pub fn correct_options(&self) -> BTreeSet<&str> {
        self.correct
            .iter()
            .filter_map(|&i| self.options.get(i).map(String::as_str))
            .collect()
    }

    /// Check the record invariants
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("question text is empty".into());
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(format!(
                "expected at least {} options, got {}",
                MIN_OPTIONS,
                self.options.len()
            ));
        }
        let unique: BTreeSet<&String> = self.options.iter().collect();
        if unique.len() != self.options.len() {
            return Err("options are not unique".into());
        }
        if self.correct.is_empty() {
            return Err("no correct option".into());
        }
        if let Some(bad) = self.correct.iter().find(|&&i| i >= self.options.len()) {
            return Err(format!("correct index {} out of range", bad));
        }
        if self.time_limit_seconds == 0 {
            return Err("time limit must be positive".into());
        }
        Ok(())
    }

    /// Parse and validate one raw record.
    ///
    /// Accepts camelCase or snake_case keys. `timeLimitSeconds` and
    /// `scoreValue` fall back to the tier defaults when absent.
    pub fn from_raw(index: usize, raw: &Value, defaults: &TierTable) -> Result<Self> {
        let invalid = |reason: String| QuizError::Validation { index, reason };

        let obj = raw
            .as_object()
            .ok_or_else(|| invalid("record is not an object".into()))?;
        let field = |keys: &[&str]| keys.iter().find_map(|k| obj.get(*k));

        let text = field(&["text", "question"])
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("missing question text".into()))?
            .to_string();

        let options = field(&["options", "answers"])
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("missing options".into()))?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| invalid("options must be strings".into()))?;

        let correct = match field(&["correctOptionIndices", "correct_option_indices", "correct"]) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_u64().map(|i| i as usize))
                .collect::<Option<BTreeSet<_>>>()
                .ok_or_else(|| invalid("correct indices must be non-negative integers".into()))?,
            Some(v) => {
                let i = v
                    .as_u64()
                    .ok_or_else(|| invalid("correct index must be a non-negative integer".into()))?;
                BTreeSet::from([i as usize])
            }
            None => return Err(invalid("missing correct indices".into())),
        };

        let tier = match field(&["difficultyTier", "difficulty_tier", "difficulty", "tier"]) {
            Some(Value::String(s)) => Tier::from_str(s),
            Some(v) => v.as_u64().and_then(|i| Tier::from_index(i as usize)),
            None => None,
        }
        .ok_or_else(|| invalid("missing or unknown difficulty tier".into()))?;

        let uses_timer = match field(&["usesTimer", "uses_timer"]) {
            Some(v) => v
                .as_bool()
                .ok_or_else(|| invalid("usesTimer must be a boolean".into()))?,
            None => true,
        };

        let tier_defaults = defaults.get(tier);
        let time_limit_seconds = match field(&["timeLimitSeconds", "time_limit_seconds"]) {
            Some(v) => v
                .as_i64()
                .and_then(|t| u32::try_from(t).ok())
                .filter(|&t| t > 0)
                .ok_or_else(|| invalid("time limit must be a positive 32-bit integer".into()))?,
            None => tier_defaults.default_time_limit,
        };
        let score_value = match field(&["scoreValue", "score_value"]) {
            Some(v) => v
                .as_i64()
                .and_then(|s| u32::try_from(s).ok())
                .ok_or_else(|| invalid("score must be a non-negative 32-bit integer".into()))?,
            None => tier_defaults.default_score,
        };

        let record = Self {
            text,
            options,
            correct,
            tier,
            uses_timer,
            time_limit_seconds,
            score_value,
        };
        record.validate().map_err(invalid)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> TierTable {
        TierTable::default()
    }

    #[test]
    fn test_tier_ordering_and_next() {
        assert!(Tier::Easy < Tier::Medium);
        assert!(Tier::Hard < Tier::VeryHard);
        assert_eq!(Tier::Easy.next(), Some(Tier::Medium));
        assert_eq!(Tier::VeryHard.next(), None);
        assert!(!Tier::VeryHard.has_minigame());
        assert_eq!(Tier::from_str("Very-Hard"), Some(Tier::VeryHard));
        assert_eq!(Tier::from_str("impossible"), None);
    }

    #[test]
    fn test_from_raw_full_record() {
        let raw = json!({
            "text": "2 + 2?",
            "options": ["3", "4", "5", "22"],
            "correctOptionIndices": [1],
            "difficultyTier": "medium",
            "usesTimer": false,
            "timeLimitSeconds": 12,
            "scoreValue": 7
        });
        let q = QuestionRecord::from_raw(0, &raw, &defaults()).unwrap();
        assert_eq!(q.tier, Tier::Medium);
        assert_eq!(q.correct, BTreeSet::from([1]));
        assert!(!q.uses_timer);
        assert_eq!(q.time_limit_seconds, 12);
        assert_eq!(q.score_value, 7);
        assert_eq!(q.selection_mode(), SelectionMode::Single);
    }

    #[test]
    fn test_from_raw_uses_tier_defaults() {
        let raw = json!({
            "question": "Pick primes",
            "answers": ["2", "3", "4", "6"],
            "correct": [0, 1],
            "difficulty": 2
        });
        let table = defaults();
        let q = QuestionRecord::from_raw(3, &raw, &table).unwrap();
        assert_eq!(q.tier, Tier::Hard);
        assert!(q.uses_timer);
        assert_eq!(q.time_limit_seconds, table.get(Tier::Hard).default_time_limit);
        assert_eq!(q.score_value, table.get(Tier::Hard).default_score);
        assert_eq!(q.selection_mode(), SelectionMode::Multi);
    }

    #[test]
    fn test_from_raw_rejects_bad_records() {
        let cases = [
            json!("not an object"),
            json!({"text": "q", "options": ["a", "b", "c"], "correct": 0, "tier": "easy"}),
            json!({"text": "q", "options": ["a", "a", "b", "c"], "correct": 0, "tier": "easy"}),
            json!({"text": "q", "options": ["a", "b", "c", "d"], "correct": 4, "tier": "easy"}),
            json!({"text": "q", "options": ["a", "b", "c", "d"], "correct": [], "tier": "easy"}),
            json!({"text": "q", "options": ["a", "b", "c", "d"], "correct": 0, "tier": "legend"}),
            json!({"text": "q", "options": ["a", "b", "c", "d"], "correct": 0, "tier": "easy",
                   "timeLimitSeconds": 0}),
            json!({"text": "q", "options": ["a", "b", "c", "d"], "correct": 0, "tier": "easy",
                   "scoreValue": -5}),
            json!({"text": "q", "options": ["a", "b", "c", "d"], "correct": 0, "tier": "easy",
                   "timeLimitSeconds": 4_294_967_306u64}),
            json!({"text": "q", "options": ["a", "b", "c", "d"], "correct": 0, "tier": "easy",
                   "scoreValue": 4_294_967_301u64}),
            json!({"text": "  ", "options": ["a", "b", "c", "d"], "correct": 0, "tier": "easy"}),
        ];
        for (i, raw) in cases.iter().enumerate() {
            let err = QuestionRecord::from_raw(i, raw, &defaults()).unwrap_err();
            assert!(
                matches!(err, QuizError::Validation { index, .. } if index == i),
                "case {} gave {:?}",
                i,
                err
            );
        }
    }
}
