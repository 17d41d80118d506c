//! High score leaderboard
//!
//! A flat CSV store of `(name, score)` records. Names are not unique;
//! every finished run appends another row. The ranked top-N view is
//! computed on read.

use std::fs::{File, OpenOptions};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// How many entries the ranked view returns
pub const TOP_N: usize = 10;

/// Persistence failure while reading or writing the leaderboard file
#[derive(Debug, thiserror::Error)]
pub enum HighScoreError {
    #[error("leaderboard I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard format error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single leaderboard record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

/// In-memory leaderboard backed by a CSV file
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every record from a CSV file. A missing file is an empty
    /// leaderboard, not an error.
    pub fn load(path: &Path) -> Result<Self, HighScoreError> {
        if !path.exists() {
            log::info!("no leaderboard at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(File::open(path)?);
        let mut entries = Vec::new();
        for record in reader.deserialize() {
            let entry: ScoreEntry = record?;
            entries.push(entry);
        }
        log::info!("loaded {} leaderboard entries", entries.len());
        Ok(Self { entries })
    }

    /// Record one finished run. Repeat names accumulate as separate rows.
    pub fn add(&mut self, name: impl Into<String>, score: u64) {
        self.entries.push(ScoreEntry {
            name: name.into(),
            score,
        });
    }

    /// Append a single record to the CSV file without rewriting the rest
    pub fn append(path: &Path, name: &str, score: u64) -> Result<(), HighScoreError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(ScoreEntry {
            name: name.to_string(),
            score,
        })?;
        writer.flush().map_err(HighScoreError::from)?;
        Ok(())
    }

    /// Ranked view: top `n` entries, highest score first. Ties keep
    /// insertion order.
    pub fn top(&self, n: usize) -> Vec<ScoreEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(n);
        ranked
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Highest recorded score, if any
    pub fn best(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.score).max()
    }
}
