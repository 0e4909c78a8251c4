//! Deterministic round simulation
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - Game time is pushed in by the host, never read from a clock
//! - Seeded RNG only
//! - No DOM, storage or platform dependencies

pub mod difficulty;
pub mod round;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod timer;

pub use difficulty::{Tier, tier_for};
pub use round::{Round, ScoreReporter};
pub use scoring::{Award, Feedback, award, points_for};
pub use spawn::{PlayArea, Target, spawn_batch};
pub use state::{RoundEvent, RoundPhase, RoundSnapshot, ScoreEvent, SpawnReason};
pub use timer::Timer;
