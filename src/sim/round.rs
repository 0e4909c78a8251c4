//! Round state machine
//!
//! ```text
//! Idle -> Running -> Ended -> (reset) -> Idle
//!            ^                  |
//!            +----- start ------+
//! ```
//!
//! The round owns every timer it uses. The host pushes game time in with
//! `advance()`; timers fire in chronological order within that delta and
//! nothing fires once the round has left `Running`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::Tier;
use super::scoring;
use super::spawn::{PlayArea, Target, spawn_batch};
use super::state::{RoundEvent, RoundPhase, RoundSnapshot, ScoreEvent, SpawnReason};
use super::timer::Timer;
use crate::tuning::Tuning;

/// Receives the final score once per round
///
/// Called synchronously at the Running -> Ended transition. Implementors
/// handle (and log) their own failures; the round does not wait on them.
pub trait ScoreReporter {
    fn round_ended(&mut self, final_score: u32);
}

impl<F: FnMut(u32)> ScoreReporter for F {
    fn round_ended(&mut self, final_score: u32) {
        self(final_score)
    }
}

/// The single live game session
pub struct Round {
    tuning: Tuning,
    area: PlayArea,
    seed: u64,
    rng: Pcg32,
    phase: RoundPhase,
    score: u32,
    streak: u32,
    time_remaining: u32,
    targets: Vec<Target>,
    feedback: Vec<ScoreEvent>,
    /// 1 Hz countdown
    countdown: Timer,
    /// Replaces the unclicked batch
    spawner: Timer,
    /// Game time fed through `advance`, used to age feedback
    clock_ms: u64,
    /// Never reset, so a stale click from an earlier batch or round can't match
    next_id: u32,
    reporter: Option<Box<dyn ScoreReporter>>,
}

impl Round {
    /// Create an idle round with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create an idle round with custom tuning
    ///
    /// Tuning that fails validation is replaced by the defaults.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Rejected tuning ({e}), using defaults");
                Tuning::default()
            }
        };
        Self {
            area: PlayArea::default(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RoundPhase::Idle,
            score: 0,
            streak: 0,
            time_remaining: tuning.round_duration_secs,
            targets: Vec::new(),
            feedback: Vec::new(),
            countdown: Timer::default(),
            spawner: Timer::default(),
            clock_ms: 0,
            next_id: 1,
            reporter: None,
            tuning,
        }
    }

    /// Install the collaborator that receives final scores
    pub fn set_reporter(&mut self, reporter: impl ScoreReporter + 'static) {
        self.reporter = Some(Box::new(reporter));
    }

    /// Resize the play area. Applies to the next batch; live targets stay put.
    pub fn set_area(&mut self, area: PlayArea) {
        self.area = area;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn tier(&self) -> Tier {
        self.tuning.tiers.tier_for(self.time_remaining)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn feedback(&self) -> &[ScoreEvent] {
        &self.feedback
    }

    pub fn area(&self) -> PlayArea {
        self.area
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            score: self.score,
            time_remaining: self.time_remaining,
            streak: self.streak,
            tier: self.tier(),
            targets: self.targets.clone(),
            feedback: self.feedback.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a round from Idle or Ended. No-op while already running.
    pub fn start(&mut self) -> Vec<RoundEvent> {
        if self.phase == RoundPhase::Running {
            log::debug!("start() ignored: round already running");
            return Vec::new();
        }

        self.score = 0;
        self.streak = 0;
        self.time_remaining = self.tuning.round_duration_secs;
        self.targets.clear();
        self.feedback.clear();
        self.phase = RoundPhase::Running;
        self.countdown.arm(self.tuning.tick_ms);

        log::info!(
            "Round started ({}s, seed {})",
            self.tuning.round_duration_secs,
            self.seed
        );

        vec![
            RoundEvent::Started {
                duration_secs: self.tuning.round_duration_secs,
            },
            self.spawn(SpawnReason::Initial),
        ]
    }

    /// Register a hit on a target. No-op unless running and the id is live.
    pub fn hit(&mut self, target_id: u32) -> Vec<RoundEvent> {
        if self.phase != RoundPhase::Running {
            log::debug!("hit({target_id}) ignored: round is {:?}", self.phase);
            return Vec::new();
        }
        let Some(index) = self.targets.iter().position(|t| t.id == target_id) else {
            log::debug!("hit({target_id}) ignored: target no longer live");
            return Vec::new();
        };

        let target = self.targets.remove(index);
        let award = scoring::award(self.streak, &self.tuning.scoring, &mut self.rng);
        self.streak += 1;
        self.score += award.points;

        self.feedback.push(ScoreEvent {
            id: target.id,
            points: award.points,
            message: award.message(),
            at_ms: self.clock_ms,
            pos: target.pos,
        });

        log::debug!(
            "Hit target {} for {} (score {}, streak {})",
            target.id,
            award.points,
            self.score,
            self.streak
        );

        let mut events = vec![RoundEvent::Hit {
            target_id: target.id,
            points: award.points,
            score: self.score,
            streak: self.streak,
        }];

        // Never leave the player without a target until the spawn timer fires
        if self.targets.is_empty() {
            events.push(self.spawn(SpawnReason::Refill));
        }

        events
    }

    /// Hit the topmost target under `point`, if any
    pub fn hit_at(&mut self, point: Vec2) -> Vec<RoundEvent> {
        // Later targets render on top
        let id = self
            .targets
            .iter()
            .rev()
            .find(|t| t.contains_point(point))
            .map(|t| t.id);
        match id {
            Some(id) => self.hit(id),
            None => Vec::new(),
        }
    }

    /// Return to Idle from any phase, cancelling all timers
    pub fn reset(&mut self) -> Vec<RoundEvent> {
        self.countdown.cancel();
        self.spawner.cancel();
        self.phase = RoundPhase::Idle;
        self.score = 0;
        self.streak = 0;
        self.time_remaining = self.tuning.round_duration_secs;
        self.targets.clear();
        self.feedback.clear();
        log::debug!("Round reset");
        vec![RoundEvent::Reset]
    }

    /// Advance game time by `dt_ms`, firing due timers in order
    pub fn advance(&mut self, dt_ms: u32) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        let mut remaining = dt_ms;

        while self.phase == RoundPhase::Running && remaining > 0 {
            let next_fire = [self.countdown.until_fire(), self.spawner.until_fire()]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(remaining);
            let step = next_fire.min(remaining);

            remaining -= step;
            self.clock_ms += u64::from(step);

            let tick_due = self.countdown.advance(step);
            let spawn_due = self.spawner.advance(step);

            // Countdown first: if it ends the round, the spawn is stale
            if tick_due {
                self.countdown_tick(&mut events);
            }
            if spawn_due && self.phase == RoundPhase::Running {
                events.push(self.spawn(SpawnReason::Timer));
            }
        }

        // Feedback keeps fading after the round stops
        self.clock_ms += u64::from(remaining);
        self.expire_feedback();

        events
    }

    // ── Internals ────────────────────────────────────────────────────

    fn countdown_tick(&mut self, events: &mut Vec<RoundEvent>) {
        let before = self.tier();
        self.time_remaining = self.time_remaining.saturating_sub(1);
        events.push(RoundEvent::Tick {
            time_remaining: self.time_remaining,
        });

        let after = self.tier();
        if after != before {
            log::debug!("Difficulty {} -> {}", before.as_str(), after.as_str());
            events.push(RoundEvent::TierChanged {
                from: before,
                to: after,
            });
        }

        if self.time_remaining == 0 {
            self.end(events);
        }
    }

    fn end(&mut self, events: &mut Vec<RoundEvent>) {
        self.countdown.cancel();
        self.spawner.cancel();
        self.targets.clear();
        self.phase = RoundPhase::Ended;

        log::info!("Round ended with score {}", self.score);
        events.push(RoundEvent::Ended {
            final_score: self.score,
        });

        if let Some(reporter) = self.reporter.as_mut() {
            reporter.round_ended(self.score);
        }
    }

    /// Replace the target set with a fresh batch and restart the spawn timer
    fn spawn(&mut self, reason: SpawnReason) -> RoundEvent {
        let tier = self.tier();
        let params = self.tuning.tiers.params(tier);

        let next_id = &mut self.next_id;
        self.targets = spawn_batch(self.area, &params, &mut self.rng, || {
            let id = *next_id;
            *next_id += 1;
            id
        });
        self.spawner.arm(params.spawn_interval_ms);

        let ids: Vec<u32> = self.targets.iter().map(|t| t.id).collect();
        log::debug!("Spawned {:?} ({:?}, {})", ids, reason, tier.as_str());
        RoundEvent::Spawned { ids, tier, reason }
    }

    fn expire_feedback(&mut self) {
        let ttl = u64::from(self.tuning.feedback_ttl_ms);
        let now = self.clock_ms;
        self.feedback.retain(|f| now.saturating_sub(f.at_ms) < ttl);
    }
}
