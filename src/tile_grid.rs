use crate::tile::Tile;
use core::fmt;
use grid_util::Point;
use log::warn;
use smallvec::SmallVec;
use std::error::Error;
use std::str::FromStr;

/// Largest width or height a grid may have, so that every cell has a [Point] coordinate.
pub const MAX_DIMENSION: usize = i32::MAX as usize;

/// Row-major index of `pos` in a `width` by `height` grid, or [None] outside it.
pub(crate) fn row_major_ix(width: usize, height: usize, pos: Point) -> Option<usize> {
    let (x, y) = (usize::try_from(pos.x).ok()?, usize::try_from(pos.y).ok()?);
    (x < width && y < height).then(|| y * width + x)
}

/// [TileGrid] is the single source of truth for tile occupancy. Tiles are stored row-major and
/// any read outside the grid yields [Tile::Wall], so the grid behaves as if it were surrounded by
/// an infinite wall.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// An all-[Tile::Empty] grid.
    ///
    /// # Panics
    ///
    /// If the dimensions do not [fit](Self::fits).
    pub fn new(width: usize, height: usize) -> TileGrid {
        assert!(
            TileGrid::fits(width, height),
            "a {width}x{height} grid exceeds the addressable size"
        );
        TileGrid {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }
    /// Whether a grid of these dimensions can be addressed: both sides at most
    /// [MAX_DIMENSION] and the cell count representable.
    pub fn fits(width: usize, height: usize) -> bool {
        width <= MAX_DIMENSION && height <= MAX_DIMENSION && width.checked_mul(height).is_some()
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn in_bounds(&self, pos: Point) -> bool {
        self.get_ix(pos).is_some()
    }
    fn get_ix(&self, pos: Point) -> Option<usize> {
        row_major_ix(self.width, self.height, pos)
    }
    /// Index of an in-bounds position in row-major order.
    pub fn get_ix_point(&self, pos: &Point) -> usize {
        debug_assert!(self.in_bounds(*pos));
        pos.y as usize * self.width + pos.x as usize
    }

    /// Returns the tile at `pos`, or [Tile::Wall] if `pos` lies outside the grid.
    pub fn get_tile(&self, pos: Point) -> Tile {
        self.get_ix(pos).map_or(Tile::Wall, |ix| self.tiles[ix])
    }

    /// Writes `tile` at `pos`. Writing outside the grid is a caller bug: it trips a debug
    /// assertion and is otherwise refused, returning `false`.
    pub fn set_tile(&mut self, pos: Point, tile: Tile) -> bool {
        debug_assert!(
            self.in_bounds(pos),
            "{pos} is outside a {}x{} grid",
            self.width,
            self.height
        );
        let Some(ix) = self.get_ix(pos) else {
            warn!(
                "Refusing to write {:?} at {} outside a {}x{} grid",
                tile, pos, self.width, self.height
            );
            return false;
        };
        self.tiles[ix] = tile;
        true
    }

    /// Replaces the matrix with a fresh [Tile::Empty] one of the new dimensions.
    ///
    /// # Panics
    ///
    /// If the dimensions do not [fit](Self::fits).
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = TileGrid::new(width, height);
    }

    /// The 4-connected neighbourhood (up, down, left, right). Positions may lie out of bounds.
    pub fn neumann_neighbours(pos: Point) -> SmallVec<[Point; 4]> {
        SmallVec::from_buf([
            Point::new(pos.x, pos.y - 1),
            Point::new(pos.x, pos.y + 1),
            Point::new(pos.x - 1, pos.y),
            Point::new(pos.x + 1, pos.y),
        ])
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Point> {
        let width = self.width;
        (0..self.width * self.height)
            .map(move |ix| Point::new((ix % width) as i32, (ix / width) as i32))
    }

    pub fn find(&self, tile: Tile) -> Option<Point> {
        self.positions().find(|p| self.get_tile(*p) == tile)
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Replaces every tile matching `pred` with `to`, returning the positions that changed.
    pub fn replace_where<F>(&mut self, pred: F, to: Tile) -> Vec<Point>
    where
        F: Fn(Tile) -> bool,
    {
        let changed = self
            .positions()
            .filter(|p| pred(self.get_tile(*p)) && self.get_tile(*p) != to)
            .collect::<Vec<Point>>();
        for p in &changed {
            self.set_tile(*p, to);
        }
        changed
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height as i32 {
            let row = (0..self.width as i32)
                .map(|x| self.get_tile(Point::new(x, y)).to_char())
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Failure to read a [TileGrid] from its text form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseGridError {
    UnknownTile { ch: char, x: usize, y: usize },
    RaggedRow { y: usize, expected: usize, found: usize },
}

impl fmt::Display for ParseGridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseGridError::UnknownTile { ch, x, y } => {
                write!(f, "unknown tile {:?} at ({}, {})", ch, x, y)
            }
            ParseGridError::RaggedRow { y, expected, found } => {
                write!(f, "row {} has {} tiles, expected {}", y, found, expected)
            }
        }
    }
}

impl Error for ParseGridError {}

impl FromStr for TileGrid {
    type Err = ParseGridError;

    /// Reads the format produced by [Display](fmt::Display): one line per row, surrounding
    /// whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = TileGrid::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(ParseGridError::RaggedRow {
                    y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or(ParseGridError::UnknownTile { ch, x, y })?;
                grid.set_tile(Point::new(x as i32, y as i32), tile);
            }
        }
        Ok(grid)
    }
}
