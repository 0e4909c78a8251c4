//! Player score history
//!
//! Tracks the best score, the last few tries and games played. Persisted to
//! a key/value store (LocalStorage on the web) after every round.

use serde::{Deserialize, Serialize};

use crate::consts::PREVIOUS_SCORES_KEPT;
use crate::error::StorageError;
use crate::persistence::{KeyValueStore, load_json, save_json};
use crate::platform;
use crate::sim::ScoreReporter;

/// Storage key for the player record
pub const STORAGE_KEY: &str = "reflex_dash_record";

/// A player's history across rounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub best_score: u32,
    /// Most recent scores, oldest first
    pub previous_scores: Vec<u32>,
    pub total_games: u32,
    /// Unix timestamp (ms) of the last finished round
    pub last_played_ms: Option<f64>,
}

/// Result of recording a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    pub new_best: bool,
    pub previous_best: u32,
}

impl PlayerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished round
    pub fn record(&mut self, score: u32, at_ms: f64) -> RecordOutcome {
        let previous_best = self.best_score;
        let new_best = score > 0 && score > previous_best;

        self.best_score = self.best_score.max(score);
        self.previous_scores.push(score);
        if self.previous_scores.len() > PREVIOUS_SCORES_KEPT {
            let excess = self.previous_scores.len() - PREVIOUS_SCORES_KEPT;
            self.previous_scores.drain(..excess);
        }
        self.total_games += 1;
        self.last_played_ms = Some(at_ms);

        RecordOutcome {
            new_best,
            previous_best,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_games == 0
    }

    /// Load from storage, empty record if nothing is stored
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StorageError> {
        Ok(load_json(store, STORAGE_KEY)?.unwrap_or_default())
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        save_json(store, STORAGE_KEY, self)
    }
}

/// Persists finished rounds into a player record
///
/// Storage failures are logged and never propagate into the round.
pub struct RecordKeeper<S: KeyValueStore> {
    store: S,
    record: PlayerRecord,
    last_outcome: Option<RecordOutcome>,
}

impl<S: KeyValueStore> RecordKeeper<S> {
    /// Load the stored record, starting fresh if it is missing or unreadable
    pub fn new(store: S) -> Self {
        let record = match PlayerRecord::load(&store) {
            Ok(record) => {
                log::info!("Loaded player record ({} games)", record.total_games);
                record
            }
            Err(e) => {
                log::warn!("Could not load player record, starting fresh: {e}");
                PlayerRecord::new()
            }
        };
        Self {
            store,
            record,
            last_outcome: None,
        }
    }

    pub fn record(&self) -> &PlayerRecord {
        &self.record
    }

    /// Outcome of the most recent round, if one finished
    pub fn last_outcome(&self) -> Option<RecordOutcome> {
        self.last_outcome
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a score with an explicit timestamp and persist it
    pub fn record_at(&mut self, score: u32, at_ms: f64) -> RecordOutcome {
        let outcome = self.record.record(score, at_ms);
        self.last_outcome = Some(outcome);

        if outcome.new_best {
            log::info!("New personal best: {score} (was {})", outcome.previous_best);
        }
        match self.record.save(&mut self.store) {
            Ok(()) => log::info!("Player record saved ({} games)", self.record.total_games),
            Err(e) => log::warn!("Failed to save player record: {e}"),
        }
        outcome
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.record = PlayerRecord::new();
        self.last_outcome = None;
        if let Err(e) = self.store.remove(STORAGE_KEY) {
            log::warn!("Failed to clear player record: {e}");
        }
    }
}

impl<S: KeyValueStore> ScoreReporter for RecordKeeper<S> {
    fn round_ended(&mut self, final_score: u32) {
        self.record_at(final_score, platform::now_ms());
    }
}

/// Format a timestamp relative to `now_ms`, e.g. "5 mins ago"
pub fn format_date(timestamp_ms: f64, now_ms: f64) -> String {
    let diff_secs = (now_ms - timestamp_ms).max(0.0) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as u32;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            let weeks = days / 7;
            if weeks == 1 {
                "1 week ago".to_string()
            } else {
                format!("{} weeks ago", weeks)
            }
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as u32;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as u32;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Round, RoundPhase};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store that rejects every write
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_record_tracks_best() {
        let mut record = PlayerRecord::new();
        assert!(record.record(40, 1.0).new_best);
        assert!(!record.record(30, 2.0).new_best);
        let outcome = record.record(50, 3.0);
        assert!(outcome.new_best);
        assert_eq!(outcome.previous_best, 40);
        assert_eq!(record.best_score, 50);
        assert_eq!(record.total_games, 3);
        assert_eq!(record.last_played_ms, Some(3.0));
    }

    #[test]
    fn test_zero_is_never_a_best() {
        let mut record = PlayerRecord::new();
        assert!(!record.record(0, 1.0).new_best);
        assert_eq!(record.total_games, 1);
    }

    #[test]
    fn test_tie_is_not_a_best() {
        let mut record = PlayerRecord::new();
        record.record(40, 1.0);
        assert!(!record.record(40, 2.0).new_best);
    }

    #[test]
    fn test_keeps_last_five_scores() {
        let mut record = PlayerRecord::new();
        for score in [10, 20, 30, 40, 50, 60, 70] {
            record.record(score, 0.0);
        }
        assert_eq!(record.previous_scores, vec![30, 40, 50, 60, 70]);
        assert_eq!(record.total_games, 7);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut record = PlayerRecord::new();
        record.record(120, 1000.0);
        record.save(&mut store).unwrap();

        let loaded = PlayerRecord::load(&store).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{ "best_score": 90 }"#).unwrap();
        let loaded = PlayerRecord::load(&store).unwrap();
        assert_eq!(loaded.best_score, 90);
        assert!(loaded.previous_scores.is_empty());
    }

    #[test]
    fn test_keeper_recovers_from_corrupt_record() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "not json").unwrap();
        let keeper = RecordKeeper::new(store);
        assert!(keeper.record().is_empty());
    }

    #[test]
    fn test_keeper_persists() {
        let mut keeper = RecordKeeper::new(MemoryStore::new());
        keeper.record_at(70, 5.0);

        let stored = PlayerRecord::load(keeper.store()).unwrap();
        assert_eq!(stored.best_score, 70);
        assert_eq!(keeper.last_outcome().map(|o| o.new_best), Some(true));
    }

    #[test]
    fn test_keeper_survives_write_failure() {
        let mut keeper = RecordKeeper::new(ReadOnlyStore);
        let outcome = keeper.record_at(30, 1.0);
        assert!(outcome.new_best);
        assert_eq!(keeper.record().best_score, 30);
        keeper.clear();
        assert!(keeper.record().is_empty());
    }

    #[test]
    fn test_failed_save_does_not_block_round_end() {
        let keeper = Rc::new(RefCell::new(RecordKeeper::new(ReadOnlyStore)));
        let mut round = Round::new(1);
        let sink = keeper.clone();
        round.set_reporter(move |score| sink.borrow_mut().round_ended(score));

        round.start();
        let id = round.targets()[0].id;
        round.hit(id);
        round.advance(30_000);

        assert_eq!(round.phase(), RoundPhase::Ended);
        assert_eq!(round.score(), 10);
        assert_eq!(keeper.borrow().record().total_games, 1);
    }

    #[test]
    fn test_format_date() {
        let now = 10.0 * 24.0 * 3600.0 * 1000.0;
        assert_eq!(format_date(now - 5_000.0, now), "Just now");
        assert_eq!(format_date(now - 60_000.0, now), "1 min ago");
        assert_eq!(format_date(now - 5.0 * 60_000.0, now), "5 mins ago");
        assert_eq!(format_date(now - 3.0 * 3_600_000.0, now), "3 hours ago");
        assert_eq!(format_date(now - 24.0 * 3_600_000.0, now), "Yesterday");
        assert_eq!(format_date(now - 3.0 * 86_400_000.0, now), "3 days ago");
        assert_eq!(format_date(now - 9.0 * 86_400_000.0, now), "1 week ago");
        assert_eq!(format_date(now + 1000.0, now), "Just now");
    }
}
