use crate::cell::Cell;
use crate::grid::GridTopology;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Lightweight position-only entry so the index does not clone full cells.
#[derive(Clone, Debug)]
pub struct CellLocation {
    /// Index into the cell store at the time the index was built.
    pub index: usize,
    pub position: [f64; 2],
}

impl RTreeObject for CellLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for CellLocation {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Build an R*-tree over the grid-derived world positions of `cells` via bulk_load.
pub fn build_index(cells: &[Cell], topology: &GridTopology) -> RTree<CellLocation> {
    let locations: Vec<CellLocation> = cells
        .iter()
        .enumerate()
        .map(|(index, cell)| CellLocation {
            index,
            position: cell.grid_position(topology),
        })
        .collect();
    RTree::bulk_load(locations)
}

/// Cells within `radius` of `center` as `(index, distance)`, sorted by store index.
///
/// Distances are taken from each cell's grid-derived position, not its eased
/// display `position`, so a cell still gliding after a shift is hit where it
/// logically sits. Plain Euclidean distance: a blast does not wrap around the
/// viewport edges.
pub fn cells_within(tree: &RTree<CellLocation>, center: [f64; 2], radius: f64) -> Vec<(usize, f64)> {
    if radius.is_nan() || radius <= 0.0 {
        return Vec::new();
    }
    let mut hits: Vec<(usize, f64)> = tree
        .locate_within_distance(center, radius * radius)
        .map(|loc| (loc.index, loc.distance_2(&center).sqrt()))
        .collect();
    hits.sort_unstable_by_key(|(index, _)| *index);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridKey;

    fn make_cells(topology: &GridTopology, keys: &[(i32, i32)]) -> Vec<Cell> {
        keys.iter()
            .map(|&(gx, gy)| Cell::settled(GridKey::new(gx, gy), topology))
            .collect()
    }

    #[test]
    fn finds_cells_within_radius_in_store_order() {
        let topology = GridTopology::new(100, 100, 1.0);
        let cells = make_cells(&topology, &[(50, 50), (10, 10), (52, 50), (50, 47)]);
        let tree = build_index(&cells, &topology);
        let hits = cells_within(&tree, [50.0, 50.0], 3.5);
        let indices: Vec<usize> = hits.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(hits[0].1, 0.0);
        assert!((hits[1].1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn blast_query_does_not_wrap_across_edges() {
        let topology = GridTopology::new(100, 100, 1.0);
        let cells = make_cells(&topology, &[(0, 50), (99, 50)]);
        let tree = build_index(&cells, &topology);
        let hits = cells_within(&tree, [0.0, 50.0], 2.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);
    }

    #[test]
    fn uses_grid_position_not_display_position() {
        let topology = GridTopology::new(100, 100, 7.0);
        let mut cells = make_cells(&topology, &[(2, 2)]);
        cells[0].position = [500.0, 500.0];
        let tree = build_index(&cells, &topology);
        assert_eq!(cells_within(&tree, [14.0, 14.0], 1.0).len(), 1);
    }

    #[test]
    fn zero_radius_finds_nothing() {
        let topology = GridTopology::new(10, 10, 1.0);
        let cells = make_cells(&topology, &[(1, 1)]);
        let tree = build_index(&cells, &topology);
        assert!(cells_within(&tree, [1.0, 1.0], 0.0).is_empty());
    }
}
