//! Hit scoring and feedback text
//!
//! Every hit is worth the base points. The Nth, 2Nth, 3Nth... consecutive
//! hit adds a bonus on top. Feedback text never affects the score.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::ScoringRules;

/// Feedback shown for a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    NiceHit,
    Great,
    Awesome,
    Perfect,
    /// Bonus hit
    ReflexStreak,
    /// Streak at or above the high-streak threshold
    CrazyFast,
}

/// Messages picked at random for ordinary hits
const GENERIC_FEEDBACK: [Feedback; 4] = [
    Feedback::NiceHit,
    Feedback::Great,
    Feedback::Awesome,
    Feedback::Perfect,
];

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::NiceHit => "Nice Hit!",
            Feedback::Great => "Great!",
            Feedback::Awesome => "Awesome!",
            Feedback::Perfect => "Perfect!",
            Feedback::ReflexStreak => "Reflex Streak!",
            Feedback::CrazyFast => "Crazy Fast!",
        }
    }
}

/// Points and feedback for a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub points: u32,
    pub feedback: Feedback,
}

impl Award {
    /// Display text, e.g. "Reflex Streak! +20!"
    pub fn message(&self) -> String {
        format!("{} +{}!", self.feedback.as_str(), self.points)
    }
}

/// Whether the hit that takes the streak to `new_streak` earns the bonus
pub fn is_bonus_hit(new_streak: u32, rules: &ScoringRules) -> bool {
    new_streak > 0 && new_streak.is_multiple_of(rules.bonus_every)
}

/// Points for a hit, given the streak before the hit
pub fn points_for(streak_before: u32, rules: &ScoringRules) -> u32 {
    let new_streak = streak_before.saturating_add(1);
    if is_bonus_hit(new_streak, rules) {
        rules.base_points + rules.bonus_points
    } else {
        rules.base_points
    }
}

/// Feedback for a hit, given the streak before the hit
pub fn feedback_for<R: Rng + ?Sized>(streak_before: u32, rules: &ScoringRules, rng: &mut R) -> Feedback {
    let new_streak = streak_before.saturating_add(1);
    if new_streak >= rules.high_streak_at {
        Feedback::CrazyFast
    } else if is_bonus_hit(new_streak, rules) {
        Feedback::ReflexStreak
    } else {
        GENERIC_FEEDBACK[rng.random_range(0..GENERIC_FEEDBACK.len())]
    }
}

/// Score a hit
pub fn award<R: Rng + ?Sized>(streak_before: u32, rules: &ScoringRules, rng: &mut R) -> Award {
    Award {
        points: points_for(streak_before, rules),
        feedback: feedback_for(streak_before, rules, rng),
    }
}
