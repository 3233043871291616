use crate::solver::Exploration;
use crate::tile::Tile;
use grid_util::Point;
use std::collections::VecDeque;

/// Where a [MazeSession](crate::session::MazeSession) is in its run lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    #[default]
    Idle,
    /// Revealing the tiles the search explored.
    Searching,
    /// Revealing the discovered path.
    Playing,
    Done,
}

impl RunState {
    /// A run is in flight and new run requests are ignored.
    pub fn in_flight(self) -> bool {
        matches!(self, RunState::Searching | RunState::Playing)
    }
}

/// Identifies one run. A token stops being current once the session is reset, resized or starts
/// another run; reveals for a stale token are never applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunToken(pub(crate) u64);

/// A single tile transition of a playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reveal {
    pub pos: Point,
    pub tile: Tile,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The request was not accepted: a marker is missing or another run is in flight.
    Ignored,
    /// The goal was reached after `steps` moves; zero when the start already is the goal.
    Reached { steps: usize },
    NoPath,
    /// The run was reset or superseded before it finished.
    Cancelled,
}

/// The queue of reveals computed for one run, consumed one step at a time.
#[derive(Clone, Debug)]
pub struct Playback {
    token: RunToken,
    steps: VecDeque<Reveal>,
    search_steps: usize,
    outcome: RunOutcome,
}

impl Playback {
    /// Lays out the reveals of an [Exploration]: optionally every expanded tile as
    /// [Tile::Visited], then the path as [Tile::Path] with the goal itself as
    /// [Tile::ReachedGoal].
    pub fn new(token: RunToken, exploration: &Exploration, animate_search: bool) -> Playback {
        let mut steps = VecDeque::new();
        if animate_search {
            steps.extend(exploration.expanded.iter().map(|&pos| Reveal {
                pos,
                tile: Tile::Visited,
            }));
        }
        let search_steps = steps.len();
        let outcome = match &exploration.path {
            Some(path) => {
                if let Some((goal, route)) = path.split_last() {
                    steps.extend(route.iter().map(|&pos| Reveal {
                        pos,
                        tile: Tile::Path,
                    }));
                    steps.push_back(Reveal {
                        pos: *goal,
                        tile: Tile::ReachedGoal,
                    });
                }
                RunOutcome::Reached { steps: path.len() }
            }
            None => RunOutcome::NoPath,
        };
        Playback {
            token,
            steps,
            search_steps,
            outcome,
        }
    }

    pub fn token(&self) -> RunToken {
        self.token
    }

    pub fn state(&self) -> RunState {
        if self.steps.is_empty() {
            RunState::Done
        } else if self.search_steps > 0 {
            RunState::Searching
        } else {
            RunState::Playing
        }
    }

    /// The outcome the run reports once every step has been revealed.
    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn next_reveal(&mut self) -> Option<Reveal> {
        let reveal = self.steps.pop_front()?;
        self.search_steps = self.search_steps.saturating_sub(1);
        Some(reveal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exploration() -> Exploration {
        Exploration {
            path: Some(vec![Point::new(1, 0), Point::new(2, 0)]),
            expanded: vec![Point::new(0, 1), Point::new(1, 0)],
        }
    }

    #[test]
    fn path_only() {
        let mut playback = Playback::new(RunToken(1), &exploration(), false);
        assert_eq!(playback.state(), RunState::Playing);
        assert_eq!(
            playback.next_reveal(),
            Some(Reveal {
                pos: Point::new(1, 0),
                tile: Tile::Path
            })
        );
        assert_eq!(
            playback.next_reveal(),
            Some(Reveal {
                pos: Point::new(2, 0),
                tile: Tile::ReachedGoal
            })
        );
        assert_eq!(playback.state(), RunState::Done);
        assert_eq!(playback.next_reveal(), None);
        assert_eq!(playback.outcome(), RunOutcome::Reached { steps: 2 });
    }

    #[test]
    fn search_then_path() {
        let mut playback = Playback::new(RunToken(1), &exploration(), true);
        assert_eq!(playback.remaining(), 4);
        let mut states = vec![];
        while let Some(reveal) = playback.next_reveal() {
            states.push((playback.state(), reveal.tile));
        }
        assert_eq!(
            states,
            vec![
                (RunState::Searching, Tile::Visited),
                (RunState::Playing, Tile::Visited),
                (RunState::Playing, Tile::Path),
                (RunState::Done, Tile::ReachedGoal),
            ]
        );
    }

    #[test]
    fn empty_playback_is_done() {
        let none = Playback::new(RunToken(2), &Exploration::default(), false);
        assert_eq!(none.state(), RunState::Done);
        assert_eq!(none.outcome(), RunOutcome::NoPath);

        let trivial = Exploration {
            path: Some(vec![]),
            expanded: vec![],
        };
        let trivial = Playback::new(RunToken(3), &trivial, true);
        assert_eq!(trivial.state(), RunState::Done);
        assert_eq!(trivial.outcome(), RunOutcome::Reached { steps: 0 });
    }
}
