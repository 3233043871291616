use crate::tile_grid::{row_major_ix, TileGrid};
use grid_util::Point;
use log::info;
use petgraph::unionfind::UnionFind;

/// Connected components of the non-wall tiles of a [TileGrid], linked up over the
/// 4-neighbourhood using a [UnionFind] structure.
///
/// Markers and run tiles count as open space here: the components answer whether a goal is
/// reachable in principle, independent of which tile the search starts from.
#[derive(Clone, Debug)]
pub struct Components {
    width: usize,
    height: usize,
    components: UnionFind<usize>,
}

impl Components {
    /// Generates a new [UnionFind] structure and links up grid neighbours to the same components.
    pub fn generate(grid: &TileGrid) -> Components {
        let w = grid.width();
        let h = grid.height();
        let mut components = UnionFind::new(w * h);
        for point in grid.positions() {
            if grid.get_tile(point).is_wall() {
                continue;
            }
            let parent_ix = grid.get_ix_point(&point);
            // Linking right and down is enough to cover every 4-connected edge once.
            [Point::new(point.x + 1, point.y), Point::new(point.x, point.y + 1)]
                .into_iter()
                .filter(|p| grid.in_bounds(*p) && !grid.get_tile(*p).is_wall())
                .for_each(|p| {
                    components.union(parent_ix, grid.get_ix_point(&p));
                });
        }
        Components {
            width: w,
            height: h,
            components,
        }
    }

    fn get_ix(&self, p: &Point) -> Option<usize> {
        row_major_ix(self.width, self.height, *p)
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.get_ix(point).map(|ix| self.components.find(ix))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.get_ix(start), self.get_ix(goal)) {
            (Some(start_ix), Some(goal_ix)) if self.components.equiv(start_ix, goal_ix) => false,
            (Some(_), Some(_)) => {
                info!("{} and {} are not equivalent components", start, goal);
                true
            }
            _ => true,
        }
    }
}
