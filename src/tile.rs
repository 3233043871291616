use core::fmt;

/// The state of a single cell of a [TileGrid](crate::tile_grid::TileGrid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    /// Start marker.
    Player,
    /// End marker.
    Goal,
    /// Explored by a run but not part of the resolved path.
    Visited,
    Path,
    /// The goal once a run has reached it.
    ReachedGoal,
}

impl Tile {
    /// Whether the solver may step onto this tile. The start marker blocks re-entry.
    pub fn passable(self) -> bool {
        !matches!(self, Tile::Wall | Tile::Player)
    }

    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }

    /// Tiles written by a run rather than by the user.
    pub fn is_run_state(self) -> bool {
        matches!(self, Tile::Visited | Tile::Path | Tile::ReachedGoal)
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::Player => 'S',
            Tile::Goal => 'G',
            Tile::Visited => 'o',
            Tile::Path => '*',
            Tile::ReachedGoal => 'X',
        }
    }

    pub fn from_char(c: char) -> Option<Tile> {
        match c {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            'S' => Some(Tile::Player),
            'G' => Some(Tile::Goal),
            'o' => Some(Tile::Visited),
            '*' => Some(Tile::Path),
            'X' => Some(Tile::ReachedGoal),
            _ => None,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The two markers a user can place on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    Player,
    Goal,
}

impl Marker {
    pub fn tile(self) -> Tile {
        match self {
            Marker::Player => Tile::Player,
            Marker::Goal => Tile::Goal,
        }
    }
}
