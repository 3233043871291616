use grid_util::Point;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;
use std::iter::once;

use crate::solver::{Exploration, FxIndexSet};
use crate::tile::Tile;
use crate::tile_grid::TileGrid;

/// One level of the depth-first descent: a node and the candidates it has not tried yet.
struct Frame {
    node: Point,
    candidates: SmallVec<[Point; 4]>,
    next: usize,
}

impl Frame {
    fn new(node: Point, candidates: SmallVec<[Point; 4]>) -> Frame {
        Frame {
            node,
            candidates,
            next: 0,
        }
    }
    fn next_candidate(&mut self) -> Option<Point> {
        let candidate = self.candidates.get(self.next).copied();
        self.next += 1;
        candidate
    }
}

/// Randomized depth-first backtracking towards any [Tile::Goal].
///
/// The neighbours of every expanded node are shuffled before being tried, so repeated runs on the
/// same grid generally produce different paths; pass a seeded random source for reproducible
/// results. Paths are not shortest paths. Each tile is expanded at most once, and the descent is
/// kept on an explicit stack so large grids do not exhaust the native call stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct BacktrackSolver;

impl BacktrackSolver {
    /// The shuffled 4-neighbourhood of `node` minus walls, the start marker and anything already
    /// visited. Returned candidates are marked visited before any of them is descended into.
    pub fn successors<R>(
        &self,
        grid: &TileGrid,
        node: &Point,
        visited: &mut FxIndexSet<Point>,
        rng: &mut R,
    ) -> SmallVec<[Point; 4]>
    where
        R: Rng + ?Sized,
    {
        let mut neighbours = TileGrid::neumann_neighbours(*node);
        // Always shuffle all four so the random stream does not depend on the walls.
        neighbours.shuffle(rng);
        let candidates = neighbours
            .into_iter()
            .filter(|p| grid.get_tile(*p).passable() && !visited.contains(p))
            .collect::<SmallVec<[Point; 4]>>();
        visited.extend(candidates.iter().copied());
        candidates
    }

    /// Searches from `start` and returns the path together with the expansion order.
    ///
    /// A start tile that already holds [Tile::Goal] is solved with a zero-length path before any
    /// neighbour is looked at.
    pub fn explore<R>(&self, grid: &TileGrid, start: Point, rng: &mut R) -> Exploration
    where
        R: Rng + ?Sized,
    {
        let mut expanded = Vec::new();
        if grid.get_tile(start) == Tile::Goal {
            return Exploration {
                path: Some(Vec::new()),
                expanded,
            };
        }
        let mut visited = FxIndexSet::default();
        visited.insert(start);
        let root = Frame::new(start, self.successors(grid, &start, &mut visited, rng));
        let mut stack = vec![root];
        while let Some(frame) = stack.last_mut() {
            let Some(node) = frame.next_candidate() else {
                // Dead end, return to the previous choice point
                stack.pop();
                continue;
            };
            if grid.get_tile(node) == Tile::Goal {
                let path = stack
                    .iter()
                    .skip(1)
                    .map(|f| f.node)
                    .chain(once(node))
                    .collect::<Vec<Point>>();
                debug!(
                    "Reached goal {} from {} after expanding {} tiles",
                    node,
                    start,
                    expanded.len()
                );
                return Exploration {
                    path: Some(path),
                    expanded,
                };
            }
            expanded.push(node);
            let candidates = self.successors(grid, &node, &mut visited, rng);
            stack.push(Frame::new(node, candidates));
        }
        debug!(
            "No goal reachable from {}; expanded {} tiles",
            start,
            expanded.len()
        );
        Exploration {
            path: None,
            expanded,
        }
    }

    /// Computes a path from `start` to any goal tile, see [explore](Self::explore).
    pub fn find_path<R>(&self, grid: &TileGrid, start: Point, rng: &mut R) -> Option<Vec<Point>>
    where
        R: Rng + ?Sized,
    {
        self.explore(grid, start, rng).path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::is_valid_path;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid: TileGrid = "G.\n..".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let exploration = BacktrackSolver.explore(&grid, Point::new(0, 0), &mut rng);
        assert_eq!(exploration.path, Some(vec![]));
        assert!(exploration.expanded.is_empty());
    }

    #[test]
    fn open_grid_reaches_corner() {
        //  _____
        // |S    |
        // |     |
        // |     |
        // |     |
        // |    G|
        //  _____
        let grid: TileGrid = "S....\n.....\n.....\n.....\n....G".parse().unwrap();
        let start = Point::new(0, 0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let path = BacktrackSolver.find_path(&grid, start, &mut rng).unwrap();
            assert!(path.len() >= 8);
            assert_eq!(path.last(), Some(&Point::new(4, 4)));
            assert!(is_valid_path(&grid, start, &path));
        }
    }

    #[test]
    fn enclosed_goal() {
        //  ___
        // |S# |
        // |#G#|
        // | # |
        //  ___
        let grid: TileGrid = "S#.\n#G#\n.#.".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let exploration = BacktrackSolver.explore(&grid, Point::new(0, 0), &mut rng);
        assert_eq!(exploration.path, None);
        assert!(exploration.expanded.is_empty());
    }

    #[test]
    fn walled_off_region_is_exhausted() {
        //  ____
        // |S.#G|
        // |..# |
        //  ____
        let grid: TileGrid = "S.#G\n..#.".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let exploration = BacktrackSolver.explore(&grid, Point::new(0, 0), &mut rng);
        assert!(!exploration.solved());
        // Every open tile on the start side is expanded exactly once
        assert_eq!(exploration.expanded.len(), 3);
        assert!(exploration.expanded.iter().all_unique());
    }

    #[test]
    fn same_seed_same_path() {
        let grid: TileGrid = "S.....\n.##.#.\n......\n.#.##.\n.....G".parse().unwrap();
        let start = Point::new(0, 0);
        let a = BacktrackSolver.explore(&grid, start, &mut StdRng::seed_from_u64(42));
        let b = BacktrackSolver.explore(&grid, start, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.solved());
    }

    #[test]
    fn does_not_step_onto_player() {
        // The only way to the goal leads back over the player marker.
        //  ___
        // |.SG|
        // |###|
        //  ___
        let grid: TileGrid = ".SG\n###".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let path = BacktrackSolver.find_path(&grid, Point::new(0, 0), &mut rng);
        assert_eq!(path, None);
    }
}
