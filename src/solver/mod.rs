use crate::tile_grid::TileGrid;
use fxhash::FxBuildHasher;
use grid_util::Point;
use indexmap::IndexSet;
use itertools::Itertools;
use std::iter::once;

pub mod backtrack;

pub type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// The result of a single search run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exploration {
    /// Positions from (excluding) the start to (including) the goal. [None] if no goal could be
    /// reached, `Some(vec![])` if the start already was a goal.
    pub path: Option<Vec<Point>>,
    /// Every position the search descended into, in order, excluding the start and the goal.
    pub expanded: Vec<Point>,
}

impl Exploration {
    pub fn solved(&self) -> bool {
        self.path.is_some()
    }
}

/// Manhattan distance between two points.
pub fn manhattan(p1: &Point, p2: &Point) -> i32 {
    (p1.x - p2.x).abs() + (p1.y - p2.y).abs()
}

/// Checks that `path` can be walked from `start` on `grid`: every step moves to a 4-neighbour,
/// no step lands on a wall and no position is repeated (the start included).
pub fn is_valid_path(grid: &TileGrid, start: Point, path: &[Point]) -> bool {
    let steps_adjacent = once(&start)
        .chain(path.iter())
        .tuple_windows()
        .all(|(a, b)| manhattan(a, b) == 1);
    let unique = once(&start).chain(path.iter()).all_unique();
    let no_walls = path.iter().all(|p| !grid.get_tile(*p).is_wall());
    steps_adjacent && unique && no_walls
}
