use super::super::World;
use crate::cell::Cell;
use crate::events::SimEvent;
use crate::grid::GridKey;
use rand::Rng;
use std::collections::HashSet;
use tracing::info;

impl World {
    /// Scatter a small newborn cluster around a random centre. Keys that are
    /// already occupied are skipped. Returns the number of cells placed.
    pub fn reseed(&mut self) -> usize {
        let topology = self.topology;
        let centre = GridKey::new(
            self.rng.random_range(0..topology.cols().max(1)),
            self.rng.random_range(0..topology.rows().max(1)),
        );
        let spread = self.config.seed_cluster_spread;
        let half = spread / 2;

        let mut occupied: HashSet<GridKey> =
            self.cells.iter().map(|c| c.key(&topology)).collect();
        let mut placed = 0;
        for _ in 0..self.config.seed_cluster_size {
            let dx = self.rng.random_range(0..spread) - half;
            let dy = self.rng.random_range(0..spread) - half;
            let key = topology.canonicalize(centre.offset(dx, dy));
            if !occupied.insert(key) {
                continue;
            }
            let cell = Cell::newborn(key, &topology);
            self.events.push(SimEvent::CellBorn {
                gx: cell.gx,
                gy: cell.gy,
                position: cell.position,
            });
            self.cells.push(cell);
            placed += 1;
        }

        self.total_births += placed;
        info!(?centre, count = placed, "reseeded population");
        self.events.push(SimEvent::Reseeded { count: placed });
        placed
    }
}
