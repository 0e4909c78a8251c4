//! Difficulty tiers
//!
//! Difficulty is a pure function of the seconds left on the clock. It is
//! recomputed every tick with no smoothing, so the same `time_remaining`
//! always yields the same tier.

use serde::{Deserialize, Serialize};

use crate::tuning::{TierParams, TierTable};

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
        }
    }
}

impl TierTable {
    /// Tier for the given seconds remaining
    pub fn tier_for(&self, time_remaining: u32) -> Tier {
        if time_remaining > self.medium_at_or_below {
            Tier::Easy
        } else if time_remaining > self.hard_at_or_below {
            Tier::Medium
        } else {
            Tier::Hard
        }
    }

    /// Parameters for a tier
    pub fn params(&self, tier: Tier) -> TierParams {
        match tier {
            Tier::Easy => self.easy,
            Tier::Medium => self.medium,
            Tier::Hard => self.hard,
        }
    }

    /// Shorthand for `params(tier_for(t))`
    pub fn params_for(&self, time_remaining: u32) -> TierParams {
        self.params(self.tier_for(time_remaining))
    }
}

/// Tier for the given seconds remaining, using the default table
pub fn tier_for(time_remaining: u32) -> Tier {
    TierTable::default().tier_for(time_remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for(30), Tier::Easy);
        assert_eq!(tier_for(21), Tier::Easy);
        assert_eq!(tier_for(20), Tier::Medium);
        assert_eq!(tier_for(11), Tier::Medium);
        assert_eq!(tier_for(10), Tier::Hard);
        assert_eq!(tier_for(1), Tier::Hard);
        assert_eq!(tier_for(0), Tier::Hard);
    }

    #[test]
    fn test_params_follow_tier() {
        let table = TierTable::default();
        assert_eq!(table.params_for(30).target_size, 80.0);
        assert_eq!(table.params_for(15).target_size, 60.0);
        assert_eq!(table.params_for(5).target_size, 40.0);
        assert_eq!(table.params_for(30).concurrent_targets, 1);
        assert_eq!(table.params_for(5).concurrent_targets, 3);
    }

    #[test]
    fn test_monotonic_over_whole_round() {
        let table = TierTable::default();
        for t in 1..30 {
            assert!(table.tier_for(t) >= table.tier_for(t + 1), "tier eased at t={t}");
        }
    }

    proptest! {
        #[test]
        fn prop_tier_never_eases_as_time_runs_out(a in 0u32..=30, b in 0u32..=30) {
            let table = TierTable::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.tier_for(lo) >= table.tier_for(hi));
        }

        #[test]
        fn prop_harder_tiers_have_smaller_targets(t in 0u32..30) {
            let table = TierTable::default();
            prop_assert!(table.params_for(t).target_size <= table.params_for(t + 1).target_size);
        }
    }
}
