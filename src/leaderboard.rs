//! High-score table behind an injected persistence port.
//!
//! The simulation only produces a score; ranking and storage live here so the
//! core never touches global state. Stores implement [`ScoreStore`].
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entries kept in the table.
pub const MAX_ENTRIES: usize = 10;
/// Longest stored player name, in characters.
pub const MAX_NAME_CHARS: usize = 20;

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player name, trimmed and truncated.
    pub name: String,
    /// Final mission score.
    pub score: i64,
    /// Display name of the mission played.
    pub mission: String,
    /// Insertion sequence; later submissions have larger values.
    pub sequence: u64,
}

/// Failures raised by a [`ScoreStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("score file `{path}` is unavailable: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid score table.
    #[error("score file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persistence port for the score table.
#[cfg_attr(test, mockall::automock)]
pub trait ScoreStore {
    /// Reads the stored table, best first.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backing storage cannot be read.
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError>;

    /// Replaces the stored table.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), StoreError>;

    /// Removes every stored entry.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backing storage cannot be cleared.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Volatile store, mainly for tests and the headless runner.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    entries: Vec<ScoreEntry>,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        self.entries = entries.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// Store backed by a pretty-printed JSON file. A missing file is an empty
/// table.
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    /// Store reading and writing `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for JsonFileScoreStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text).map_err(|err| self.io_error(err))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(self.io_error(err)),
            _ => Ok(()),
        }
    }
}

/// Top-ten ranking over a [`ScoreStore`].
#[derive(Debug)]
pub struct Leaderboard<S> {
    store: S,
}

impl<S: ScoreStore> Leaderboard<S> {
    /// Ranks scores kept in `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a score and returns its 1-based rank, or `0` when it did not
    /// make the table. Blank names are rejected with rank `0`.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn submit(&mut self, name: &str, score: i64, mission: &str) -> Result<usize, StoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            warn!("rejecting leaderboard entry without a name");
            return Ok(0);
        }

        let mut entries = self.store.load()?;
        let sequence = entries
            .iter()
            .map(|entry| entry.sequence)
            .max()
            .map_or(0, |last| last + 1);
        entries.push(ScoreEntry {
            name: trimmed.chars().take(MAX_NAME_CHARS).collect(),
            score,
            mission: mission.to_owned(),
            sequence,
        });
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        self.store.save(&entries)?;

        let rank = entries
            .iter()
            .position(|entry| entry.sequence == sequence)
            .map_or(0, |index| index + 1);
        debug!("leaderboard submit {score} for {trimmed}: rank {rank}");
        Ok(rank)
    }

    /// Stored entries, best first.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn entries(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        self.store.load()
    }

    /// `true` when `score` would enter the table.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn qualifies(&self, score: i64) -> Result<bool, StoreError> {
        let entries = self.store.load()?;
        if entries.len() < MAX_ENTRIES {
            return Ok(true);
        }
        Ok(entries.last().is_none_or(|lowest| score > lowest.score))
    }

    /// Rank `score` would take: one more than the number of strictly better
    /// entries.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn rank_for(&self, score: i64) -> Result<usize, StoreError> {
        let entries = self.store.load()?;
        Ok(entries.iter().filter(|entry| entry.score > score).count() + 1)
    }

    /// Empties the table.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.clear()
    }

    /// Gives back the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::always;
    use rstest::{fixture, rstest};

    #[fixture]
    fn board() -> Leaderboard<MemoryScoreStore> {
        Leaderboard::new(MemoryScoreStore::default())
    }

    #[rstest]
    fn submissions_are_ranked_best_first(mut board: Leaderboard<MemoryScoreStore>) {
        assert_eq!(board.submit("ana", 500, "Standard Delivery").expect("submit"), 1);
        assert_eq!(board.submit("bo", 900, "Time Trial").expect("submit"), 1);
        assert_eq!(board.submit("cy", 700, "Standard Delivery").expect("submit"), 2);
        let names: Vec<String> = board
            .entries()
            .expect("entries")
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["bo", "cy", "ana"]);
    }

    #[rstest]
    fn ties_rank_behind_earlier_entries(mut board: Leaderboard<MemoryScoreStore>) {
        board.submit("first", 100, "m").expect("submit");
        assert_eq!(board.submit("second", 100, "m").expect("submit"), 2);
    }

    #[rstest]
    fn table_keeps_ten_and_reports_dropouts(mut board: Leaderboard<MemoryScoreStore>) {
        for score in 1..=10 {
            board.submit("p", score * 100, "m").expect("submit");
        }
        assert!(!board.qualifies(100).expect("qualifies"));
        assert!(board.qualifies(101).expect("qualifies"));
        assert_eq!(board.submit("late", 50, "m").expect("submit"), 0);
        assert_eq!(board.entries().expect("entries").len(), MAX_ENTRIES);
        assert_eq!(board.rank_for(550).expect("rank"), 6);
    }

    #[rstest]
    fn names_are_trimmed_and_truncated(mut board: Leaderboard<MemoryScoreStore>) {
        board
            .submit("  abcdefghijklmnopqrstuvwxyz  ", 10, "m")
            .expect("submit");
        let entries = board.entries().expect("entries");
        assert_eq!(
            entries.first().map(|e| e.name.as_str()),
            Some("abcdefghijklmnopqrst")
        );
        assert_eq!(board.submit("   ", 10, "m").expect("submit"), 0);
    }

    #[rstest]
    fn clear_empties_the_table(mut board: Leaderboard<MemoryScoreStore>) {
        board.submit("p", 1, "m").expect("submit");
        board.clear().expect("clear");
        assert!(board.entries().expect("entries").is_empty());
    }

    #[rstest]
    fn store_failures_propagate() {
        let mut store = MockScoreStore::new();
        store.expect_load().returning(|| Ok(Vec::new()));
        store.expect_save().with(always()).times(1).returning(|_| {
            Err(StoreError::Io {
                path: PathBuf::from("scores.json"),
                source: std::io::Error::new(ErrorKind::PermissionDenied, "read-only"),
            })
        });
        let mut board = Leaderboard::new(store);
        assert!(matches!(
            board.submit("p", 10, "m"),
            Err(StoreError::Io { .. })
        ));
    }

    #[rstest]
    fn blank_names_never_reach_the_store() {
        let mut store = MockScoreStore::new();
        store.expect_load().never();
        store.expect_save().never();
        let mut board = Leaderboard::new(store);
        assert_eq!(board.submit("", 10, "m").expect("submit"), 0);
    }
}
