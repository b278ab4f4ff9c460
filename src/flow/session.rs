//! Question list for the active tier with a cursor

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{QuizError, Result};
use crate::questions::{QuestionPool, QuestionRecord, Tier};

#[derive(Debug, Clone)]
pub struct QuestionSetSession {
    tier: Tier,
    questions: Vec<QuestionRecord>,
    cursor: usize,
}

impl QuestionSetSession {
    /// Copy and shuffle the tier's questions from the pool
    pub fn start<R: Rng + ?Sized>(pool: &QuestionPool, tier: Tier, rng: &mut R) -> Result<Self> {
        let mut questions = pool.tier(tier).to_vec();
        if questions.is_empty() {
            return Err(QuizError::TierUnavailable(tier));
        }
        questions.shuffle(rng);
        Ok(Self {
            tier,
            questions,
            cursor: 0,
        })
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The question under the cursor
    pub fn current(&self) -> Result<&QuestionRecord> {
        self.questions.get(self.cursor).ok_or(QuizError::Index {
            cursor: self.cursor,
            len: self.questions.len(),
        })
    }

    /// Move to the next question. Returns false once the tier is
    /// exhausted; the cursor is then past the end.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            true
        } else {
            self.cursor = self.questions.len();
            false
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
