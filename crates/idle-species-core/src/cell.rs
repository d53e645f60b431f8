use crate::constants::{DISPLAY_EASING, DISPLAY_SNAP_DISTANCE, VISIBILITY_THRESHOLD};
use crate::grid::{GridKey, GridTopology};
use serde::{Deserialize, Serialize};

/// One automaton unit.
///
/// `alive` is the logical state; `alpha`/`fade_target` are the visual state and
/// move independently, so a cell can be logically newborn while still invisible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub gx: i32,
    pub gy: i32,
    /// Display position, eased toward the grid position every frame.
    pub position: [f64; 2],
    pub age: u32,
    pub alive: bool,
    pub alpha: f64,
    pub fade_target: f64,
}

impl Cell {
    /// A freshly born cell: fully transparent, fading in.
    pub fn newborn(key: GridKey, topology: &GridTopology) -> Self {
        Self::with_alpha(key, topology, 0.0)
    }

    /// A fully visible cell that counts as a neighbor immediately.
    pub fn settled(key: GridKey, topology: &GridTopology) -> Self {
        Self::with_alpha(key, topology, 1.0)
    }

    fn with_alpha(key: GridKey, topology: &GridTopology, alpha: f64) -> Self {
        let key = topology.canonicalize(key);
        Self {
            gx: key.gx,
            gy: key.gy,
            position: topology.to_world_coord(key),
            age: 0,
            alive: true,
            alpha,
            fade_target: 1.0,
        }
    }

    /// Stored coordinates, re-wrapped against the current topology.
    pub fn key(&self, topology: &GridTopology) -> GridKey {
        topology.canonical_key(self.gx, self.gy)
    }

    pub fn set_key(&mut self, key: GridKey) {
        self.gx = key.gx;
        self.gy = key.gy;
    }

    /// Counts as an occupied neighbor.
    pub fn is_active(&self) -> bool {
        self.alive && self.alpha > VISIBILITY_THRESHOLD
    }

    /// Grid-derived world position (where the display position converges to).
    pub fn grid_position(&self, topology: &GridTopology) -> [f64; 2] {
        topology.to_world_coord(self.key(topology))
    }

    /// Per-frame presentation update: ease the display position and fade alpha.
    pub fn ease(&mut self, topology: &GridTopology, fade_speed: f64) {
        let target = self.grid_position(topology);
        for (pos, goal) in self.position.iter_mut().zip(target) {
            let delta = goal - *pos;
            if delta.abs() > DISPLAY_SNAP_DISTANCE {
                *pos = goal;
            } else {
                *pos += delta * DISPLAY_EASING;
            }
        }

        if self.alpha < self.fade_target {
            self.alpha = (self.alpha + fade_speed).min(self.fade_target);
        } else if self.alpha > self.fade_target {
            self.alpha = (self.alpha - fade_speed).max(self.fade_target);
        }
        self.alpha = self.alpha.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topo() -> GridTopology {
        GridTopology::new(20, 20, 7.0)
    }

    #[test]
    fn newborn_is_alive_but_not_active() {
        let cell = Cell::newborn(GridKey::new(3, 4), &topo());
        assert!(cell.alive);
        assert_eq!(cell.alpha, 0.0);
        assert!(!cell.is_active());
        assert_eq!(cell.position, [21.0, 28.0]);
    }

    #[test]
    fn constructors_wrap_coordinates() {
        let cell = Cell::settled(GridKey::new(-1, 21), &topo());
        assert_eq!((cell.gx, cell.gy), (19, 1));
    }

    #[test]
    fn fade_in_crosses_visibility_threshold_after_six_frames() {
        let t = topo();
        let mut cell = Cell::newborn(GridKey::new(1, 1), &t);
        for _ in 0..5 {
            cell.ease(&t, 0.02);
        }
        assert!(!cell.is_active());
        cell.ease(&t, 0.02);
        assert!(cell.is_active());
    }

    #[test]
    fn fade_never_overshoots_target() {
        let t = topo();
        let mut cell = Cell::settled(GridKey::new(1, 1), &t);
        cell.alpha = 0.99;
        cell.ease(&t, 0.02);
        assert_eq!(cell.alpha, 1.0);
        cell.fade_target = 0.0;
        for _ in 0..100 {
            cell.ease(&t, 0.02);
        }
        assert_eq!(cell.alpha, 0.0);
        assert!(cell.alive, "fading out never touches the logical state");
    }

    #[test]
    fn display_position_eases_then_snaps_on_long_jumps() {
        let t = topo();
        let mut cell = Cell::settled(GridKey::new(2, 0), &t);
        cell.position = [4.0, 0.0];
        cell.ease(&t, 0.02);
        assert!((cell.position[0] - 5.0).abs() < 1e-9);

        // Wrapping across the torus is a long jump.
        cell.set_key(GridKey::new(19, 0));
        cell.ease(&t, 0.02);
        assert_eq!(cell.position[0], 133.0);
    }

    #[test]
    fn key_rewraps_after_resize() {
        let cell = Cell::settled(GridKey::new(15, 15), &topo());
        let smaller = GridTopology::new(10, 10, 7.0);
        assert_eq!(cell.key(&smaller), GridKey::new(5, 5));
        assert_eq!((cell.gx, cell.gy), (15, 15));
    }
}
