//! Question sources
//!
//! A source yields raw records; the pool builder does the rest. The
//! remote generator is only a contract here: anything implementing
//! `QuestionSource` can stand in for it, and `FallbackSource` covers the
//! "remote failed, use the local file" path.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde_json::Value;

use super::pool::{PoolBuilder, QuestionPool};
use crate::error::{QuizError, Result};
use crate::settings::Settings;

/// Anything that can produce raw question records
pub trait QuestionSource {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Fetch the raw records. An empty list is a valid (if useless) answer.
    fn fetch(&mut self) -> Result<Vec<Value>>;
}

/// Raw records from a local JSON file holding an array of records
#[derive(Debug, Clone)]
pub struct LocalSource {
    path: PathBuf,
    name: String,
}

impl LocalSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("local:{}", path.display());
        Self { path, name }
    }

    /// Parse a JSON document into records; non-arrays count as empty
    pub fn parse(json: &str) -> Result<Vec<Value>> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(records) => Ok(records),
            _ => Err(QuizError::EmptySource),
        }
    }
}

impl QuestionSource for LocalSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self) -> Result<Vec<Value>> {
        let json = fs::read_to_string(&self.path)?;
        Self::parse(&json)
    }
}

/// Tries a primary source (typically remote) and falls back to a local
/// source when allowed
pub struct FallbackSource {
    primary: Box<dyn QuestionSource>,
    local: Option<LocalSource>,
    /// Minimum number of records the primary must deliver
    min_records: usize,
}

impl FallbackSource {
    pub fn new(primary: Box<dyn QuestionSource>) -> Self {
        Self {
            primary,
            local: None,
            min_records: 1,
        }
    }

    pub fn with_local(mut self, local: LocalSource) -> Self {
        self.local = Some(local);
        self
    }

    pub fn with_min_records(mut self, min_records: usize) -> Self {
        self.min_records = min_records.max(1);
        self
    }

    /// Primary source backed by the configured question file, only when
    /// `fallback_to_local` is on
    pub fn from_settings(primary: Box<dyn QuestionSource>, settings: &Settings) -> Self {
        let source = Self::new(primary);
        if settings.fallback_to_local {
            source.with_local(LocalSource::new(&settings.question_file))
        } else {
            source
        }
    }

    fn fetch_primary(&mut self) -> Result<Vec<Value>> {
        let records = self.primary.fetch()?;
        if records.len() < self.min_records {
            return Err(QuizError::RemoteSource(format!(
                "{} returned {} records, need {}",
                self.primary.name(),
                records.len(),
                self.min_records
            )));
        }
        Ok(records)
    }
}

impl QuestionSource for FallbackSource {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn fetch(&mut self) -> Result<Vec<Value>> {
        match self.fetch_primary() {
            Ok(records) => Ok(records),
            Err(e) => {
                let Some(local) = self.local.as_mut() else {
                    log::error!("Question source failed with no fallback: {}", e);
                    return Err(QuizError::EmptySource);
                };
                log::warn!("{} failed ({}), falling back to {}", self.primary.name(), e, local.name());
                local.fetch()
            }
        }
    }
}

/// Fetch from a source and build the pool with the configured quota.
/// Any fetch failure surfaces as `EmptySource`.
pub fn load_pool<R: Rng + ?Sized>(
    settings: &Settings,
    source: &mut dyn QuestionSource,
    rng: &mut R,
) -> Result<QuestionPool> {
    let raw = source.fetch().map_err(|e| {
        log::error!("Could not read questions from {}: {}", source.name(), e);
        QuizError::EmptySource
    })?;
    log::info!("Loaded {} raw questions from {}", raw.len(), source.name());
    PoolBuilder::from_settings(settings).build(&raw, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::Tier;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use serde_json::json;

    /// Canned source standing in for the remote generator
    struct CannedSource {
        result: Option<Vec<Value>>,
    }

    impl QuestionSource for CannedSource {
        fn name(&self) -> &str {
            "canned"
        }

        fn fetch(&mut self) -> Result<Vec<Value>> {
            self.result
                .clone()
                .ok_or_else(|| QuizError::RemoteSource("timed out".into()))
        }
    }

    fn record(text: &str) -> Value {
        json!({"text": text, "options": ["a", "b", "c", "d"], "correct": 0, "difficulty": "easy"})
    }

    fn write_file(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("quiz_flow_{}_{}.json", name, std::process::id()));
        fs::write(&path, body).unwrap();
        path
    }

    fn write_local(name: &str, body: &str) -> LocalSource {
        LocalSource::new(write_file(name, body))
    }

    #[test]
    fn test_local_source_reads_array() {
        let body = serde_json::to_string(&vec![record("one"), record("two")]).unwrap();
        let mut local = write_local("array", &body);
        assert_eq!(local.fetch().unwrap().len(), 2);
    }

    #[test]
    fn test_local_parse_rejects_non_array() {
        assert!(matches!(
            LocalSource::parse("{\"questions\": []}"),
            Err(QuizError::EmptySource)
        ));
        assert!(matches!(LocalSource::parse("not json"), Err(QuizError::Json(_))));
    }

    #[test]
    fn test_fallback_uses_primary_when_it_works() {
        let primary = CannedSource {
            result: Some(vec![record("remote")]),
        };
        let mut source = FallbackSource::new(Box::new(primary));
        let records = source.fetch().unwrap();
        assert_eq!(records[0]["text"], "remote");
    }

    #[test]
    fn test_fallback_to_local_on_failure() {
        let body = serde_json::to_string(&vec![record("local")]).unwrap();
        let local = write_local("fallback", &body);
        let mut source =
            FallbackSource::new(Box::new(CannedSource { result: None })).with_local(local);
        let records = source.fetch().unwrap();
        assert_eq!(records[0]["text"], "local");
    }

    #[test]
    fn test_short_remote_counts_as_failure() {
        let body = serde_json::to_string(&vec![record("local")]).unwrap();
        let local = write_local("short", &body);
        let primary = CannedSource {
            result: Some(vec![record("remote")]),
        };
        let mut source = FallbackSource::new(Box::new(primary))
            .with_local(local)
            .with_min_records(10);
        assert_eq!(source.fetch().unwrap()[0]["text"], "local");
    }

    #[test]
    fn test_no_fallback_surfaces_empty_source() {
        let mut source = FallbackSource::new(Box::new(CannedSource { result: None }));
        assert!(matches!(source.fetch(), Err(QuizError::EmptySource)));
    }

    #[test]
    fn test_settings_fallback_flag_on_reads_question_file() {
        let body = serde_json::to_string(&vec![record("from file")]).unwrap();
        let settings = Settings {
            question_file: write_file("flag_on", &body).display().to_string(),
            fallback_to_local: true,
            ..Default::default()
        };
        let mut source =
            FallbackSource::from_settings(Box::new(CannedSource { result: None }), &settings);
        assert_eq!(source.fetch().unwrap()[0]["text"], "from file");
    }

    #[test]
    fn test_settings_fallback_flag_off_surfaces_empty_source() {
        let body = serde_json::to_string(&vec![record("from file")]).unwrap();
        let settings = Settings {
            question_file: write_file("flag_off", &body).display().to_string(),
            fallback_to_local: false,
            ..Default::default()
        };
        let mut source =
            FallbackSource::from_settings(Box::new(CannedSource { result: None }), &settings);
        assert!(matches!(source.fetch(), Err(QuizError::EmptySource)));
    }

    #[test]
    fn test_load_pool_applies_quota() {
        let settings = Settings {
            quota: 3,
            ..Default::default()
        };
        let mut source = CannedSource {
            result: Some(vec![record("only")]),
        };
        let pool = load_pool(&settings, &mut source, &mut Pcg32::seed_from_u64(5)).unwrap();
        assert_eq!(pool.tier(Tier::Easy).len(), 3);

        let mut broken = CannedSource { result: None };
        assert!(matches!(
            load_pool(&settings, &mut broken, &mut Pcg32::seed_from_u64(5)),
            Err(QuizError::EmptySource)
        ));
    }
}
