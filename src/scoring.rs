//! Score ledger
//!
//! Running score with a zero floor plus a persisted best-score watermark.

use crate::persistence::PersistentStore;

pub struct ScoreLedger {
    current: u64,
    high_watermark: u64,
    store: Box<dyn PersistentStore>,
    key: String,
}

impl ScoreLedger {
    /// Create a ledger and load the watermark from the store
    pub fn new(store: Box<dyn PersistentStore>, key: impl Into<String>) -> Self {
        let mut ledger = Self {
            current: 0,
            high_watermark: 0,
            store,
            key: key.into(),
        };
        ledger.reload_watermark();
        ledger
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn high_watermark(&self) -> u64 {
        self.high_watermark
    }

    /// Add a (possibly negative) delta, clamping at zero
    pub fn apply_delta(&mut self, delta: i64) -> u64 {
        self.current = self.current.saturating_add_signed(delta);
        self.current
    }

    /// Raise and persist the watermark if the current score beats it.
    /// Returns true when a new high score was set.
    pub fn commit_high_score_if_beaten(&mut self) -> bool {
        if self.current <= self.high_watermark {
            return false;
        }
        self.high_watermark = self.current;
        let value = i64::try_from(self.high_watermark).unwrap_or(i64::MAX);
        self.store.write_int(&self.key, value);
        log::info!("New high score: {}", self.high_watermark);
        true
    }

    /// Zero the score; the watermark is reloaded, not cleared
    pub fn reset(&mut self) {
        self.current = 0;
        self.reload_watermark();
    }

    fn reload_watermark(&mut self) {
        let stored = self.store.read_int(&self.key, 0);
        self.high_watermark = u64::try_from(stored).unwrap_or(0);
    }
}
