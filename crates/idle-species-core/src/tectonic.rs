use crate::cell::Cell;
use crate::constants::{
    TECTONIC_ALPHA, TECTONIC_EXTENT_SPAN, TECTONIC_MATURITY_ONSET, TECTONIC_MAX_CHANCE,
    TECTONIC_MIN_EXTENT, TECTONIC_NOISE, TECTONIC_NOISE_BONUS, TECTONIC_STEP,
};
use crate::events::Direction;
use crate::grid::{GridKey, GridTopology};
use rand::Rng;

/// Probability that a tectonic shift fires this step.
///
/// A positive `glitch_override` replaces the maturity ramp; the noise bonus
/// applies in both cases.
pub fn trigger_chance(glitch_override: f64, maturity: f64, noise: f64) -> f64 {
    let mut chance = if glitch_override > 0.0 {
        glitch_override
    } else if maturity > TECTONIC_MATURITY_ONSET {
        (maturity - TECTONIC_MATURITY_ONSET) / (1.0 - TECTONIC_MATURITY_ONSET) * TECTONIC_MAX_CHANCE
    } else {
        0.0
    };
    if noise > TECTONIC_NOISE {
        chance += TECTONIC_NOISE_BONUS;
    }
    chance
}

/// A rectangular patch and the direction it is displaced in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftPlan {
    pub origin: GridKey,
    pub width: i32,
    pub height: i32,
    pub direction: Direction,
}

impl ShiftPlan {
    pub fn random<R: Rng>(rng: &mut R, topology: &GridTopology) -> Self {
        let width = TECTONIC_MIN_EXTENT + rng.random_range(0..TECTONIC_EXTENT_SPAN);
        let height = TECTONIC_MIN_EXTENT + rng.random_range(0..TECTONIC_EXTENT_SPAN);
        let origin = GridKey::new(
            rng.random_range(0..topology.cols().max(1)),
            rng.random_range(0..topology.rows().max(1)),
        );
        let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        Self {
            origin,
            width,
            height,
            direction,
        }
    }

    /// Grid displacement applied to every member cell.
    pub fn displacement(&self) -> (i32, i32) {
        let (ux, uy) = self.direction.unit();
        (ux * TECTONIC_STEP, uy * TECTONIC_STEP)
    }

    pub fn contains(&self, topology: &GridTopology, key: GridKey) -> bool {
        let (lx, ly) = topology.shortest_offset(self.origin, key);
        (0..self.width).contains(&lx) && (0..self.height).contains(&ly)
    }

    /// Translate every member cell in place and mark it half-visible. Returns the moved count.
    pub fn apply(&self, cells: &mut [Cell], topology: &GridTopology) -> usize {
        let (dx, dy) = self.displacement();
        let mut moved = 0;
        for cell in cells.iter_mut() {
            let key = cell.key(topology);
            if !self.contains(topology, key) {
                continue;
            }
            cell.set_key(topology.canonicalize(key.offset(dx, dy)));
            cell.alpha = TECTONIC_ALPHA;
            moved += 1;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn chance_ramps_from_onset_to_max() {
        assert_eq!(trigger_chance(0.0, 0.7, 0.0), 0.0);
        assert!((trigger_chance(0.0, 0.85, 0.0) - 0.25).abs() < 1e-12);
        assert!((trigger_chance(0.0, 1.0, 0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn override_and_noise_bonus_combine() {
        assert!((trigger_chance(0.3, 0.0, 0.0) - 0.3).abs() < 1e-12);
        assert!((trigger_chance(0.3, 1.0, 0.5) - 0.4).abs() < 1e-12);
        assert!((trigger_chance(0.0, 0.0, 0.41) - 0.1).abs() < 1e-12);
        assert_eq!(trigger_chance(0.0, 0.0, 0.4), 0.0);
    }

    #[test]
    fn random_plan_respects_extent_and_origin_bounds() {
        let topology = GridTopology::new(30, 12, 7.0);
        let mut rng = create_rng(3);
        for _ in 0..500 {
            let plan = ShiftPlan::random(&mut rng, &topology);
            assert!((5..20).contains(&plan.width));
            assert!((5..20).contains(&plan.height));
            assert!((0..30).contains(&plan.origin.gx));
            assert!((0..12).contains(&plan.origin.gy));
            let (dx, dy) = plan.displacement();
            assert_eq!(dx.abs() + dy.abs(), 2);
        }
    }

    #[test]
    fn random_plan_tolerates_unsized_grid() {
        let topology = GridTopology::new(0, 0, 7.0);
        let plan = ShiftPlan::random(&mut create_rng(1), &topology);
        assert_eq!(plan.origin, GridKey::new(0, 0));
    }

    #[test]
    fn apply_moves_only_members_and_wraps() {
        let topology = GridTopology::new(20, 20, 7.0);
        let plan = ShiftPlan {
            origin: GridKey::new(18, 0),
            width: 5,
            height: 5,
            direction: Direction::East,
        };
        let mut cells = vec![
            Cell::settled(GridKey::new(19, 1), &topology),
            Cell::settled(GridKey::new(1, 4), &topology),
            Cell::settled(GridKey::new(10, 10), &topology),
        ];
        cells[0].age = 17;
        let moved = plan.apply(&mut cells, &topology);
        assert_eq!(moved, 2);
        assert_eq!((cells[0].gx, cells[0].gy), (1, 1));
        assert_eq!((cells[1].gx, cells[1].gy), (3, 4));
        assert_eq!((cells[2].gx, cells[2].gy), (10, 10));
        assert_eq!(cells[0].alpha, 0.5);
        assert_eq!(cells[2].alpha, 1.0);
        assert_eq!(cells[0].age, 17);
        assert!(cells[0].alive);
        assert_eq!(cells[0].fade_target, 1.0);
    }
}
