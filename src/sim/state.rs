//! Round state types
//!
//! Phases, events and the read-only snapshot the host renders from.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::Tier;
use super::spawn::Target;

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for `start()`
    Idle,
    /// Clock is running, targets are live
    Running,
    /// Clock hit zero; frozen until reset or restart
    Ended,
}

/// Why a batch of targets appeared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnReason {
    /// First batch of the round
    Initial,
    /// Spawn timer replaced the unclicked batch
    Timer,
    /// Last target of the batch was hit
    Refill,
}

/// Transient hit feedback, expires on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Id of the target that was hit
    pub id: u32,
    pub points: u32,
    pub message: String,
    /// Round clock (ms of advanced game time) when the hit landed
    pub at_ms: u64,
    /// Where the target was, for floating text
    pub pos: Vec2,
}

/// Everything that happened during a command or `advance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    Started {
        duration_secs: u32,
    },
    Spawned {
        ids: Vec<u32>,
        tier: Tier,
        reason: SpawnReason,
    },
    Hit {
        target_id: u32,
        points: u32,
        score: u32,
        streak: u32,
    },
    Tick {
        time_remaining: u32,
    },
    TierChanged {
        from: Tier,
        to: Tier,
    },
    Ended {
        final_score: u32,
    },
    Reset,
}

/// Read-only view of a round for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub score: u32,
    pub time_remaining: u32,
    pub streak: u32,
    pub tier: Tier,
    pub targets: Vec<Target>,
    pub feedback: Vec<ScoreEvent>,
}
