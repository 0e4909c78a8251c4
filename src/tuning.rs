//! Data-driven game balance
//!
//! Every number that shapes a round lives here so variants of the game can
//! be tried without touching the simulation. Tuning is plain serde data and
//! can be loaded from JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Parameters derived from a difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierParams {
    /// Target diameter in pixels
    pub target_size: f32,
    /// Time before an unclicked batch is replaced
    pub spawn_interval_ms: u32,
    /// Targets per batch
    pub concurrent_targets: u32,
}

/// Difficulty table keyed by time remaining
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    pub easy: TierParams,
    pub medium: TierParams,
    pub hard: TierParams,
    /// Medium starts once time remaining drops to this many seconds
    pub medium_at_or_below: u32,
    /// Hard starts once time remaining drops to this many seconds
    pub hard_at_or_below: u32,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            easy: TierParams {
                target_size: 80.0,
                spawn_interval_ms: 1000,
                concurrent_targets: 1,
            },
            medium: TierParams {
                target_size: 60.0,
                spawn_interval_ms: 800,
                concurrent_targets: 2,
            },
            hard: TierParams {
                target_size: 40.0,
                spawn_interval_ms: 600,
                concurrent_targets: 3,
            },
            medium_at_or_below: 20,
            hard_at_or_below: 10,
        }
    }
}

/// Points and streak thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub base_points: u32,
    pub bonus_points: u32,
    /// Bonus lands on every Nth consecutive hit
    pub bonus_every: u32,
    /// Streak at which feedback becomes "Crazy Fast!"
    pub high_streak_at: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: BASE_POINTS,
            bonus_points: BONUS_POINTS,
            bonus_every: BONUS_EVERY,
            high_streak_at: HIGH_STREAK_AT,
        }
    }
}

/// Complete tuning for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub round_duration_secs: u32,
    pub tick_ms: u32,
    pub feedback_ttl_ms: u32,
    pub tiers: TierTable,
    pub scoring: ScoringRules,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            round_duration_secs: ROUND_DURATION_SECS,
            tick_ms: TICK_MS,
            feedback_ttl_ms: FEEDBACK_TTL_MS,
            tiers: TierTable::default(),
            scoring: ScoringRules::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the numbers describe a playable round
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.round_duration_secs == 0 {
            return Err(invalid("round_duration_secs must be positive"));
        }
        if self.tick_ms == 0 {
            return Err(invalid("tick_ms must be positive"));
        }

        let t = &self.tiers;
        if !(t.hard_at_or_below < t.medium_at_or_below
            && t.medium_at_or_below < self.round_duration_secs)
        {
            return Err(invalid(format!(
                "tier thresholds must satisfy hard ({}) < medium ({}) < duration ({})",
                t.hard_at_or_below, t.medium_at_or_below, self.round_duration_secs
            )));
        }

        for (name, params) in [("easy", &t.easy), ("medium", &t.medium), ("hard", &t.hard)] {
            if params.target_size <= 0.0 || !params.target_size.is_finite() {
                return Err(invalid(format!("{name}: target_size must be positive")));
            }
            if params.spawn_interval_ms == 0 {
                return Err(invalid(format!("{name}: spawn_interval_ms must be positive")));
            }
            if params.concurrent_targets == 0 {
                return Err(invalid(format!("{name}: concurrent_targets must be positive")));
            }
        }

        // Targets may only shrink as the round gets harder
        if t.medium.target_size > t.easy.target_size || t.hard.target_size > t.medium.target_size {
            return Err(invalid("target sizes must not grow with difficulty"));
        }

        let s = &self.scoring;
        if s.bonus_every == 0 {
            return Err(invalid("bonus_every must be positive"));
        }
        if s.high_streak_at <= s.bonus_every {
            return Err(invalid(format!(
                "high_streak_at ({}) must be above bonus_every ({})",
                s.high_streak_at, s.bonus_every
            )));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> TuningError {
    TuningError::Invalid(msg.into())
}
