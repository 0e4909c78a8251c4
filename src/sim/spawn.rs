//! Target placement
//!
//! Targets in a batch are placed independently and uniformly inside the
//! play area. Overlap between targets of the same batch is allowed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::TierParams;

/// Size of the clickable play area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    /// Build an area; negative or non-finite extents collapse to zero
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a target of `size` centered at `pos` lies fully inside
    pub fn contains_target(&self, pos: Vec2, size: f32) -> bool {
        let half = size / 2.0;
        pos.x - half >= 0.0
            && pos.x + half <= self.width
            && pos.y - half >= 0.0
            && pos.y + half <= self.height
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

fn sanitize_extent(extent: f32) -> f32 {
    if extent.is_finite() { extent.max(0.0) } else { 0.0 }
}

/// A clickable hit zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    /// Center of the target
    pub pos: Vec2,
    /// Diameter in pixels
    pub size: f32,
}

impl Target {
    /// Whether a point (e.g. a click) lands on this target
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.size / 2.0
    }
}

/// Pick a center coordinate along one axis
///
/// `None` when the axis has no valid position: narrower than the target,
/// or a non-finite extent or size.
fn axis_position<R: Rng + ?Sized>(rng: &mut R, extent: f32, size: f32) -> Option<f32> {
    let half = size / 2.0;
    let lo = half;
    let hi = extent - half;
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        None
    } else {
        Some(rng.random_range(lo..=hi))
    }
}

/// Spawn one batch of targets for the given tier parameters
///
/// `next_id` supplies ids; it is called once per target, in order.
pub fn spawn_batch<R, F>(area: PlayArea, params: &TierParams, rng: &mut R, mut next_id: F) -> Vec<Target>
where
    R: Rng + ?Sized,
    F: FnMut() -> u32,
{
    // Axes without a valid range fall back to the middle of the area
    let center = area.center();
    (0..params.concurrent_targets)
        .map(|_| {
            let x = axis_position(rng, area.width, params.target_size).unwrap_or(center.x);
            let y = axis_position(rng, area.height, params.target_size).unwrap_or(center.y);
            Target {
                id: next_id(),
                pos: Vec2::new(x, y),
                size: params.target_size,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::TierTable;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn counter() -> impl FnMut() -> u32 {
        let mut id = 0;
        move || {
            id += 1;
            id
        }
    }

    #[test]
    fn test_batch_size_follows_tier() {
        let table = TierTable::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let area = PlayArea::default();
        assert_eq!(spawn_batch(area, &table.easy, &mut rng, counter()).len(), 1);
        assert_eq!(spawn_batch(area, &table.medium, &mut rng, counter()).len(), 2);
        assert_eq!(spawn_batch(area, &table.hard, &mut rng, counter()).len(), 3);
    }

    #[test]
    fn test_ids_come_from_allocator() {
        let table = TierTable::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let targets = spawn_batch(PlayArea::default(), &table.hard, &mut rng, counter());
        let ids: Vec<u32> = targets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_in_bounds_many_trials() {
        let table = TierTable::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let area = PlayArea::new(320.0, 480.0);
        for _ in 0..10_000 {
            for target in spawn_batch(area, &table.hard, &mut rng, counter()) {
                assert!(area.contains_target(target.pos, target.size), "{target:?}");
            }
        }
    }

    #[test]
    fn test_exact_fit_area() {
        let table = TierTable::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let area = PlayArea::new(80.0, 80.0);
        let targets = spawn_batch(area, &table.easy, &mut rng, counter());
        assert_eq!(targets[0].pos, Vec2::new(40.0, 40.0));
        assert!(area.contains_target(targets[0].pos, targets[0].size));
    }

    #[test]
    fn test_too_small_area_centers_target() {
        let table = TierTable::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let area = PlayArea::new(30.0, 500.0);
        let targets = spawn_batch(area, &table.easy, &mut rng, counter());
        assert_eq!(targets[0].pos.x, 15.0);
    }

    #[test]
    fn test_non_finite_extents_collapse() {
        assert_eq!(PlayArea::new(f32::INFINITY, 600.0).width, 0.0);
        assert_eq!(PlayArea::new(800.0, f32::NAN).height, 0.0);
        assert_eq!(PlayArea::new(-5.0, f32::NEG_INFINITY), PlayArea::new(0.0, 0.0));
        assert_eq!(PlayArea::new(800.0, 600.0).center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_non_finite_inputs_do_not_panic() {
        let table = TierTable::default();
        let mut rng = Pcg32::seed_from_u64(3);

        // Constructed directly, bypassing `PlayArea::new`
        let area = PlayArea {
            width: f32::INFINITY,
            height: 600.0,
        };
        let targets = spawn_batch(area, &table.medium, &mut rng, counter());
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|t| (60.0..=540.0).contains(&t.pos.y)));

        let bad_size = TierParams {
            target_size: f32::NAN,
            ..table.easy
        };
        let targets = spawn_batch(PlayArea::default(), &bad_size, &mut rng, counter());
        assert_eq!(targets[0].pos, PlayArea::default().center());
    }

    #[test]
    fn test_target_contains_point() {
        let target = Target {
            id: 1,
            pos: Vec2::new(100.0, 100.0),
            size: 40.0,
        };
        assert!(target.contains_point(Vec2::new(110.0, 110.0)));
        assert!(!target.contains_point(Vec2::new(130.0, 100.0)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10_000))]

        #[test]
        fn prop_targets_stay_inside(
            seed in any::<u64>(),
            width in 80.0f32..4000.0,
            height in 80.0f32..4000.0,
            tier in 0usize..3,
        ) {
            let table = TierTable::default();
            let params = [table.easy, table.medium, table.hard][tier];
            let area = PlayArea::new(width, height);
            let mut rng = Pcg32::seed_from_u64(seed);
            for target in spawn_batch(area, &params, &mut rng, counter()) {
                prop_assert!(area.contains_target(target.pos, target.size));
                prop_assert_eq!(target.size, params.target_size);
            }
        }
    }
}
