//! Reflex Dash - A 30-second reaction-speed target game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (difficulty, spawning, scoring, timers)
//! - `tuning`: Data-driven game balance
//! - `records`: Player score history (best score, previous tries)
//! - `persistence`: Storage backends for the player record
//! - `platform`: Browser/native platform abstraction

pub mod error;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod sim;
pub mod tuning;

pub use error::{StorageError, TuningError};
pub use records::{PlayerRecord, RecordKeeper};
pub use sim::{Round, RoundEvent, RoundPhase, RoundSnapshot, ScoreReporter};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Length of one round in seconds
    pub const ROUND_DURATION_SECS: u32 = 30;
    /// Countdown tick interval
    pub const TICK_MS: u32 = 1000;
    /// How long a hit message stays on screen
    pub const FEEDBACK_TTL_MS: u32 = 1000;
    /// Maximum frame delta the host feeds into the round (tab resume, debugger)
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Points per hit
    pub const BASE_POINTS: u32 = 10;
    /// Extra points on every `BONUS_EVERY`th consecutive hit
    pub const BONUS_POINTS: u32 = 10;
    pub const BONUS_EVERY: u32 = 3;
    /// Streak at which feedback switches to "Crazy Fast!"
    pub const HIGH_STREAK_AT: u32 = 10;

    /// Number of previous scores kept in the player record
    pub const PREVIOUS_SCORES_KEPT: usize = 5;
}
