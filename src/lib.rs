//! # maze_pathfinding
//!
//! The engine behind an interactive maze visualizer. A [TileGrid] holds walls and the
//! player/goal markers, a [BacktrackSolver] finds a route with
//! [randomized depth-first backtracking](https://en.wikipedia.org/wiki/Depth-first_search), and a
//! [MazeSession] reveals the result tile by tile at a configurable rate. Note that the search does
//! not look for shortest paths: neighbours are tried in a random order, so every run tends to
//! discover a different route. Connected [components](Components) are available to tell whether a
//! goal is reachable at all.
//!
//! ```
//! use grid_util::Point;
//! use maze_pathfinding::{Marker, MazeSession, RunRequest, Advance, RunOutcome};
//!
//! let mut session = MazeSession::new(5, 5);
//! session.place_marker(Marker::Player, Point::new(0, 0));
//! session.place_marker(Marker::Goal, Point::new(4, 4));
//! let RunRequest::Started(token) = session.begin_run(Point::new(0, 0)) else {
//!     unreachable!()
//! };
//! let outcome = loop {
//!     match session.advance(token) {
//!         Advance::Revealed(_) => continue,
//!         Advance::Finished(outcome) => break outcome,
//!         Advance::Stale => break RunOutcome::Cancelled,
//!     }
//! };
//! assert!(matches!(outcome, RunOutcome::Reached { .. }));
//! ```
pub mod components;
pub mod config;
pub mod playback;
pub mod session;
pub mod solver;
pub mod tile;
pub mod tile_grid;

pub use components::Components;
pub use config::SessionConfig;
pub use grid_util::Point;
pub use playback::{Reveal, RunOutcome, RunState, RunToken};
pub use session::{Advance, MazeSession, RunRequest};
pub use solver::backtrack::BacktrackSolver;
pub use solver::Exploration;
pub use tile::{Marker, Tile};
pub use tile_grid::{ParseGridError, TileGrid, MAX_DIMENSION};

/// Reveal rate used when none is configured.
pub const DEFAULT_STEPS_PER_SECOND: f64 = 30.0;
