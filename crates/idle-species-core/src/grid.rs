use serde::{Deserialize, Serialize};

/// Offsets of the 8 Moore neighbors, row-major around the center.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Structural occupancy key. Canonical keys lie in `[0, cols) x [0, rows)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridKey {
    pub gx: i32,
    pub gy: i32,
}

impl GridKey {
    pub const fn new(gx: i32, gy: i32) -> Self {
        Self { gx, gy }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            gx: self.gx.wrapping_add(dx),
            gy: self.gy.wrapping_add(dy),
        }
    }
}

/// Toroidal grid laid over a continuous viewport.
///
/// A dimension of zero (viewport not sized yet) disables wrapping on that axis
/// instead of taking a modulo by zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTopology {
    cols: i32,
    rows: i32,
    step: f64,
}

impl GridTopology {
    pub fn new(cols: i32, rows: i32, step: f64) -> Self {
        Self {
            cols: cols.max(0),
            rows: rows.max(0),
            step,
        }
    }

    /// Derive the grid from a viewport size and the distance between grid points.
    pub fn from_viewport(width: f64, height: f64, step: f64) -> Self {
        Self::new(cells_along(width, step), cells_along(height, step), step)
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Round a continuous position to the nearest grid point and wrap it onto the torus.
    pub fn to_grid_coord(&self, x: f64, y: f64) -> GridKey {
        self.canonical_key(round_half_up(x / self.step), round_half_up(y / self.step))
    }

    pub fn to_world_coord(&self, key: GridKey) -> [f64; 2] {
        [key.gx as f64 * self.step, key.gy as f64 * self.step]
    }

    pub fn canonical_key(&self, gx: i32, gy: i32) -> GridKey {
        GridKey {
            gx: wrap(gx, self.cols),
            gy: wrap(gy, self.rows),
        }
    }

    pub fn canonicalize(&self, key: GridKey) -> GridKey {
        self.canonical_key(key.gx, key.gy)
    }

    pub fn neighbors(&self, key: GridKey) -> [GridKey; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| self.canonicalize(key.offset(dx, dy)))
    }

    /// Per-axis offset from `origin` to `key`, folded to the shorter way around the torus.
    pub fn shortest_offset(&self, origin: GridKey, key: GridKey) -> (i32, i32) {
        let key = self.canonicalize(key);
        let origin = self.canonicalize(origin);
        (
            fold_offset(key.gx.wrapping_sub(origin.gx), self.cols),
            fold_offset(key.gy.wrapping_sub(origin.gy), self.rows),
        )
    }
}

/// `((v % n) + n) % n` for `n > 0`; identity when the dimension is unset.
pub fn wrap(v: i32, n: i32) -> i32 {
    if n > 0 {
        v.rem_euclid(n)
    } else {
        v
    }
}

fn fold_offset(delta: i32, n: i32) -> i32 {
    let half = n as f64 / 2.0;
    let mut d = delta;
    if (d as f64) < -half {
        d += n;
    }
    if (d as f64) > half {
        d -= n;
    }
    d
}

fn cells_along(extent: f64, step: f64) -> i32 {
    if !(extent.is_finite() && extent > 0.0 && step.is_finite() && step > 0.0) {
        return 0;
    }
    (extent / step).ceil() as i32
}

// Halves round toward positive infinity, so -0.5 maps to 0 rather than -1.
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_stays_in_bounds_for_any_input() {
        let dims = [(1, 1), (3, 7), (10, 10), (113, 61)];
        let samples = [
            i32::MIN,
            i32::MIN + 1,
            -1_000_003,
            -101,
            -11,
            -10,
            -1,
            0,
            1,
            9,
            10,
            11,
            999_983,
            i32::MAX,
        ];
        for (cols, rows) in dims {
            let topo = GridTopology::new(cols, rows, 7.0);
            for &gx in &samples {
                for &gy in &samples {
                    let k = topo.canonical_key(gx, gy);
                    assert!((0..cols).contains(&k.gx), "gx {gx} -> {}", k.gx);
                    assert!((0..rows).contains(&k.gy), "gy {gy} -> {}", k.gy);
                }
            }
        }
    }

    #[test]
    fn negative_coordinates_wrap_to_positive_range() {
        let topo = GridTopology::new(10, 8, 7.0);
        assert_eq!(topo.canonical_key(-1, -1), GridKey::new(9, 7));
        assert_eq!(topo.canonical_key(-21, 17), GridKey::new(9, 1));
    }

    #[test]
    fn zero_dimension_disables_wrapping() {
        let topo = GridTopology::new(0, 0, 7.0);
        assert_eq!(topo.canonical_key(-4, 1234), GridKey::new(-4, 1234));
        let neighbors = topo.neighbors(GridKey::new(0, 0));
        assert!(neighbors.contains(&GridKey::new(-1, -1)));
    }

    #[test]
    fn from_viewport_rounds_dimensions_up() {
        let topo = GridTopology::from_viewport(700.0, 701.0, 7.0);
        assert_eq!(topo.cols(), 100);
        assert_eq!(topo.rows(), 101);
        let unsized_topo = GridTopology::from_viewport(0.0, f64::NAN, 7.0);
        assert_eq!((unsized_topo.cols(), unsized_topo.rows()), (0, 0));
    }

    #[test]
    fn to_grid_coord_rounds_to_nearest_and_wraps() {
        let topo = GridTopology::new(10, 10, 7.0);
        assert_eq!(topo.to_grid_coord(10.4, 3.6), GridKey::new(1, 1));
        assert_eq!(topo.to_grid_coord(-3.5, 0.0), GridKey::new(0, 0));
        assert_eq!(topo.to_grid_coord(-7.0, 70.0), GridKey::new(9, 0));
    }

    #[test]
    fn world_coord_round_trips_canonical_keys() {
        let topo = GridTopology::new(12, 9, 7.0);
        for gx in 0..12 {
            for gy in 0..9 {
                let key = GridKey::new(gx, gy);
                let [x, y] = topo.to_world_coord(key);
                assert_eq!(topo.to_grid_coord(x, y), key);
            }
        }
    }

    #[test]
    fn neighbors_wrap_at_corner() {
        let topo = GridTopology::new(5, 4, 1.0);
        let n = topo.neighbors(GridKey::new(0, 0));
        assert!(n.contains(&GridKey::new(4, 3)));
        assert!(n.contains(&GridKey::new(1, 1)));
        assert!(n.contains(&GridKey::new(0, 3)));
        assert!(!n.contains(&GridKey::new(0, 0)));
    }

    #[test]
    fn shortest_offset_folds_across_edges() {
        let topo = GridTopology::new(20, 20, 1.0);
        assert_eq!(
            topo.shortest_offset(GridKey::new(18, 18), GridKey::new(1, 2)),
            (3, 4)
        );
        assert_eq!(
            topo.shortest_offset(GridKey::new(1, 1), GridKey::new(19, 1)),
            (-2, 0)
        );
        assert_eq!(
            topo.shortest_offset(GridKey::new(0, 0), GridKey::new(10, 0)),
            (10, 0)
        );
    }
}
