use crate::components::Components;
use crate::config::{step_interval, SessionConfig};
use crate::playback::{Playback, Reveal, RunOutcome, RunState, RunToken};
use crate::solver::backtrack::BacktrackSolver;
use crate::solver::is_valid_path;
use crate::tile::{Marker, Tile};
use crate::tile_grid::TileGrid;
use grid_util::Point;
use log::{info, log_enabled, warn, Level};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;

/// Answer to a run request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunRequest {
    Started(RunToken),
    /// A marker is missing, the start is outside the grid or a run is already in flight.
    Ignored,
}

/// Result of asking a run for its next reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Advance {
    Revealed(Reveal),
    Finished(RunOutcome),
    /// The token no longer identifies the current run; nothing was changed.
    Stale,
}

type Observer = Box<dyn FnMut(Point, Tile)>;

/// Owns the grid, the markers and the current run, and is the entry point for a UI.
///
/// Everything happens on one logical thread: a UI shares the session as a
/// `&RefCell<MazeSession>` with the [run](MazeSession::run) driver, or calls
/// [begin_run](MazeSession::begin_run) and [advance](MazeSession::advance) from its own frame
/// loop. At most one run is in flight at a time.
pub struct MazeSession {
    grid: TileGrid,
    player: Option<Point>,
    goal: Option<Point>,
    config: SessionConfig,
    solver: BacktrackSolver,
    rng: StdRng,
    generation: u64,
    playback: Option<Playback>,
    observer: Option<Observer>,
}

impl MazeSession {
    pub fn new(width: usize, height: usize) -> MazeSession {
        MazeSession::with_config(width, height, SessionConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: SessionConfig) -> MazeSession {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        MazeSession {
            grid: TileGrid::new(width, height),
            player: None,
            goal: None,
            config,
            solver: BacktrackSolver,
            rng,
            generation: 0,
            playback: None,
            observer: None,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn marker(&self, kind: Marker) -> Option<Point> {
        match kind {
            Marker::Player => self.player,
            Marker::Goal => self.goal,
        }
    }

    pub fn state(&self) -> RunState {
        self.playback
            .as_ref()
            .map_or(RunState::Idle, Playback::state)
    }

    /// Registers a callback invoked for every single-tile change the session makes. Whole-grid
    /// rebuilds ([reset](Self::reset), [configure_grid](Self::configure_grid)) are not reported
    /// tile by tile; re-read [grid](Self::grid) after calling them.
    ///
    /// The callback runs while the session is mutably borrowed, so it must not reach back into a
    /// `RefCell` holding the session; everything it needs is in its arguments. A callback that
    /// wants to read the whole session after each reveal belongs in
    /// [run_with](Self::run_with) instead.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(Point, Tile) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    fn write(&mut self, pos: Point, tile: Tile) {
        if self.grid.get_tile(pos) != tile && self.grid.set_tile(pos, tile) {
            if let Some(observer) = self.observer.as_mut() {
                observer(pos, tile);
            }
        }
    }

    /// The tile a cell shows from its markers alone; the goal wins when both share a cell.
    fn marker_tile(&self, pos: Point) -> Option<Tile> {
        if self.goal == Some(pos) {
            Some(Tile::Goal)
        } else if self.player == Some(pos) {
            Some(Tile::Player)
        } else {
            None
        }
    }

    /// Writes the marker tiles, notifying the observer only if `notify` is set.
    fn stamp_markers(&mut self, notify: bool) {
        for pos in [self.player, self.goal].into_iter().flatten() {
            let Some(tile) = self.marker_tile(pos) else {
                continue;
            };
            if notify {
                self.write(pos, tile);
            } else {
                self.grid.set_tile(pos, tile);
            }
        }
    }

    /// Drops the current run so that any token handed out for it becomes stale.
    fn cancel(&mut self) {
        self.generation += 1;
        if let Some(playback) = self.playback.take() {
            if playback.state().in_flight() {
                info!("Cancelled run {:?}", playback.token());
            }
        }
    }

    /// Rebuilds the grid with new dimensions, cancelling any run. Markers that still fit are
    /// re-stamped, the others are cleared. Dimensions that do not [fit](TileGrid::fits) are
    /// refused and leave everything untouched.
    pub fn configure_grid(&mut self, width: usize, height: usize) -> bool {
        if !TileGrid::fits(width, height) {
            warn!("Refusing to configure a {}x{} grid", width, height);
            return false;
        }
        self.cancel();
        self.grid.resize(width, height);
        for kind in [Marker::Player, Marker::Goal] {
            if let Some(pos) = self.marker(kind) {
                if !self.grid.in_bounds(pos) {
                    info!("{:?} marker at {} no longer fits, clearing it", kind, pos);
                    self.set_marker(kind, None);
                }
            }
        }
        self.stamp_markers(false);
        true
    }

    /// Applies a user edit, either [Tile::Wall] or [Tile::Empty]. Edits out of bounds, onto a
    /// marker, or while a run is in flight are ignored.
    pub fn paint_tile(&mut self, pos: Point, tile: Tile) -> bool {
        if !matches!(tile, Tile::Wall | Tile::Empty)
            || !self.grid.in_bounds(pos)
            || self.marker_tile(pos).is_some()
            || self.state().in_flight()
        {
            return false;
        }
        self.write(pos, tile);
        true
    }

    fn set_marker(&mut self, kind: Marker, pos: Option<Point>) {
        match kind {
            Marker::Player => self.player = pos,
            Marker::Goal => self.goal = pos,
        }
    }

    /// Sets or moves a marker, overwriting whatever the target cell held. The previous cell is
    /// handed back to the other marker if it shares it, otherwise emptied.
    pub fn place_marker(&mut self, kind: Marker, pos: Point) -> bool {
        if !self.grid.in_bounds(pos) || self.state().in_flight() {
            return false;
        }
        let previous = self.marker(kind);
        self.set_marker(kind, Some(pos));
        if let Some(old) = previous.filter(|old| *old != pos) {
            let tile = self.marker_tile(old).unwrap_or(Tile::Empty);
            self.write(old, tile);
        }
        if let Some(tile) = self.marker_tile(pos) {
            self.write(pos, tile);
        }
        true
    }

    /// Removes a marker and restores its cell.
    pub fn clear_marker(&mut self, kind: Marker) -> bool {
        if self.state().in_flight() {
            return false;
        }
        let Some(old) = self.marker(kind) else {
            return false;
        };
        self.set_marker(kind, None);
        let tile = self.marker_tile(old).unwrap_or(Tile::Empty);
        self.write(old, tile);
        true
    }

    /// Returns to [RunState::Idle] with a blank grid that only holds the markers.
    pub fn reset(&mut self) {
        self.cancel();
        self.grid = TileGrid::new(self.grid.width(), self.grid.height());
        self.stamp_markers(false);
        info!(
            "Reset {}x{} grid",
            self.grid.width(),
            self.grid.height()
        );
    }

    /// Removes the tiles written by the last run while keeping walls and markers. Ignored while a
    /// run is in flight.
    pub fn clear_run(&mut self) -> bool {
        if self.state().in_flight() {
            return false;
        }
        self.cancel();
        self.clear_run_tiles();
        true
    }

    fn clear_run_tiles(&mut self) {
        let changed = self.grid.replace_where(Tile::is_run_state, Tile::Empty);
        if let Some(observer) = self.observer.as_mut() {
            for pos in &changed {
                observer(*pos, Tile::Empty);
            }
        }
        self.stamp_markers(true);
    }

    /// Whether the goal marker lies in the same connected component as the player marker.
    /// [None] if either marker is unset.
    pub fn reachable(&self) -> Option<bool> {
        let (player, goal) = (self.player?, self.goal?);
        Some(Components::generate(&self.grid).reachable(&player, &goal))
    }

    /// Searches from `start` and prepares the playback of the result. Tiles of a previous run are
    /// cleared first. The search itself completes immediately; its result is revealed by
    /// [advance](Self::advance).
    pub fn begin_run(&mut self, start: Point) -> RunRequest {
        if self.state().in_flight() {
            info!("A run is already in flight, ignoring run request");
            return RunRequest::Ignored;
        }
        let Some(goal) = self.goal else {
            info!("No goal placed, ignoring run request");
            return RunRequest::Ignored;
        };
        if self.player.is_none() || !self.grid.in_bounds(start) {
            info!("No valid start, ignoring run request");
            return RunRequest::Ignored;
        }
        self.cancel();
        self.clear_run_tiles();
        let token = RunToken(self.generation);

        // Only for the log, the search finds out by itself
        if log_enabled!(Level::Info) {
            Components::generate(&self.grid).unreachable(&start, &goal);
        }
        let exploration = self.solver.explore(&self.grid, start, &mut self.rng);
        if let Some(path) = &exploration.path {
            debug_assert!(is_valid_path(&self.grid, start, path));
        }
        let playback = Playback::new(token, &exploration, self.config.animate_search);
        info!(
            "Starting run {:?} from {}: {:?} in {} reveals",
            token,
            start,
            playback.outcome(),
            playback.remaining()
        );
        self.playback = Some(playback);
        RunRequest::Started(token)
    }

    fn current(&mut self, token: RunToken) -> Option<&mut Playback> {
        self.playback.as_mut().filter(|p| p.token() == token)
    }

    /// Reveals the next tile of the run identified by `token`. The token is checked right before
    /// the grid is touched, so a run that was reset or superseded never writes again.
    pub fn advance(&mut self, token: RunToken) -> Advance {
        let Some(playback) = self.current(token) else {
            return Advance::Stale;
        };
        let Some(reveal) = playback.next_reveal() else {
            return Advance::Finished(playback.outcome());
        };
        self.write(reveal.pos, reveal.tile);
        if self.state() == RunState::Done {
            info!("Run {:?} done", token);
        }
        Advance::Revealed(reveal)
    }

    /// The outcome of the run identified by `token` if it has nothing left to reveal, or
    /// [RunOutcome::Cancelled] if the token is stale.
    pub fn finished(&self, token: RunToken) -> Option<RunOutcome> {
        match self.playback.as_ref().filter(|p| p.token() == token) {
            None => Some(RunOutcome::Cancelled),
            Some(playback) if playback.state() == RunState::Done => Some(playback.outcome()),
            Some(_) => None,
        }
    }

    /// Starts a run from `start` and reveals it at `steps_per_second`, suspending between
    /// reveals. Resolves once the run is done, ignored or cancelled by a
    /// [reset](Self::reset) issued while it was suspended.
    pub async fn run(
        session: &RefCell<MazeSession>,
        start: Point,
        steps_per_second: f64,
    ) -> RunOutcome {
        MazeSession::run_with(session, start, steps_per_second, |_| {}).await
    }

    /// [run](Self::run), calling `on_reveal` after every reveal once the session is released
    /// again, so the callback is free to borrow it and re-render.
    pub async fn run_with<F>(
        session: &RefCell<MazeSession>,
        start: Point,
        steps_per_second: f64,
        mut on_reveal: F,
    ) -> RunOutcome
    where
        F: FnMut(Reveal),
    {
        let token = match session.borrow_mut().begin_run(start) {
            RunRequest::Started(token) => token,
            RunRequest::Ignored => return RunOutcome::Ignored,
        };
        let interval = step_interval(steps_per_second);
        loop {
            if let Some(outcome) = session.borrow().finished(token) {
                return outcome;
            }
            tokio::time::sleep(interval).await;
            let advance = session.borrow_mut().advance(token);
            match advance {
                Advance::Revealed(reveal) => on_reveal(reveal),
                Advance::Finished(outcome) => return outcome,
                Advance::Stale => return RunOutcome::Cancelled,
            }
        }
    }

    /// [run](Self::run) from the player marker at the configured rate.
    pub async fn run_from_player(session: &RefCell<MazeSession>) -> RunOutcome {
        let (start, steps_per_second) = {
            let session = session.borrow();
            (session.player, session.config.steps_per_second)
        };
        match start {
            Some(start) => MazeSession::run(session, start, steps_per_second).await,
            None => RunOutcome::Ignored,
        }
    }
}
