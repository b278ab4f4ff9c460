//! Question pool assembly
//!
//! Validates raw records, shuffles answer order per question, groups by
//! tier and enforces the per-tier quota by duplicating already selected
//! questions when a tier is short.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;

use super::{QuestionRecord, Tier};
use crate::consts::DEFAULT_QUOTA;
use crate::error::{QuizError, Result};
use crate::settings::{Settings, TierTable};

/// Per-tier question lists. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct QuestionPool {
    tiers: BTreeMap<Tier, Vec<QuestionRecord>>,
    quota: usize,
}

impl QuestionPool {
    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Questions for a tier (empty slice when the source had none)
    pub fn tier(&self, tier: Tier) -> &[QuestionRecord] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_tier(&self, tier: Tier) -> bool {
        !self.tier(tier).is_empty()
    }

    /// Total number of entries across tiers (duplicates included)
    pub fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds a `QuestionPool` from raw records
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    quota: usize,
    defaults: TierTable,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA)
    }
}

impl PoolBuilder {
    pub fn new(quota: usize) -> Self {
        Self {
            quota,
            defaults: TierTable::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            quota: settings.quota,
            defaults: settings.tiers.clone(),
        }
    }

    pub fn with_defaults(mut self, defaults: TierTable) -> Self {
        self.defaults = defaults;
        self
    }

    /// Build from a JSON document that must be an array of records
    pub fn build_json<R: Rng + ?Sized>(&self, doc: &Value, rng: &mut R) -> Result<QuestionPool> {
        let records = doc.as_array().ok_or(QuizError::EmptySource)?;
        self.build(records, rng)
    }

    /// Validate, shuffle, partition and pad.
    ///
    /// Invalid records are dropped with a warning. Fails only when the
    /// input is empty.
    pub fn build<R: Rng + ?Sized>(&self, raw: &[Value], rng: &mut R) -> Result<QuestionPool> {
        if raw.is_empty() {
            return Err(QuizError::EmptySource);
        }

        let mut groups: BTreeMap<Tier, Vec<QuestionRecord>> = BTreeMap::new();
        let mut dropped = 0usize;
        for (index, value) in raw.iter().enumerate() {
            match QuestionRecord::from_raw(index, value, &self.defaults) {
                Ok(mut record) => {
                    shuffle_options(&mut record, rng);
                    groups.entry(record.tier).or_default().push(record);
                }
                Err(e) => {
                    dropped += 1;
                    log::warn!("Dropping question: {}", e);
                }
            }
        }
        if dropped > 0 {
            log::warn!("{} of {} raw questions were invalid", dropped, raw.len());
        }

        let mut tiers = BTreeMap::new();
        for tier in Tier::ALL {
            let mut group = groups.remove(&tier).unwrap_or_default();
            let distinct = group.len();
            fill_quota(&mut group, self.quota, rng);
            if group.is_empty() {
                log::warn!("Tier {} has no questions", tier);
            } else {
                log::info!(
                    "Tier {}: {} questions ({} distinct)",
                    tier,
                    group.len(),
                    distinct.min(self.quota)
                );
            }
            tiers.insert(tier, group);
        }

        Ok(QuestionPool {
            tiers,
            quota: self.quota,
        })
    }
}

/// Shuffle a question's options, remapping the correct indices so the
/// same option strings stay correct
pub fn shuffle_options<R: Rng + ?Sized>(record: &mut QuestionRecord, rng: &mut R) {
    let mut order: Vec<usize> = (0..record.options.len()).collect();
    order.shuffle(rng);

    let options = order.iter().map(|&old| record.options[old].clone()).collect();
    let correct = order
        .iter()
        .enumerate()
        .filter(|&(_, &old)| record.correct.contains(&old))
        .map(|(new, _)| new)
        .collect();

    record.options = options;
    record.correct = correct;
}

/// Shuffle a tier group, cut it to `quota`, then pad with random
/// picks (with replacement) from the kept subset. Empty groups stay empty.
fn fill_quota<R: Rng + ?Sized>(group: &mut Vec<QuestionRecord>, quota: usize, rng: &mut R) {
    group.shuffle(rng);
    group.truncate(quota);

    let selected = group.len();
    if selected == 0 {
        return;
    }
    while group.len() < quota {
        let pick = rng.random_range(0..selected);
        let copy = group[pick].clone();
        group.push(copy);
    }
}
