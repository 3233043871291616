use crate::DEFAULT_STEPS_PER_SECOND;
use log::warn;
use std::time::Duration;

/// Settings of a [MazeSession](crate::session::MazeSession).
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Reveal rate used by runs that do not specify their own.
    pub steps_per_second: f64,
    /// Also reveal the explored tiles as [Tile::Visited](crate::tile::Tile::Visited) before the
    /// path is played back.
    pub animate_search: bool,
    /// Seeds the neighbour shuffling. [None] draws a fresh seed from the operating system.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
            animate_search: false,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn step_interval(&self) -> Duration {
        step_interval(self.steps_per_second)
    }
}

/// Converts a reveal rate to the delay between two reveals. Rates that are not positive or do not
/// give a representable delay fall back to [DEFAULT_STEPS_PER_SECOND].
pub fn step_interval(steps_per_second: f64) -> Duration {
    if steps_per_second.is_finite() && steps_per_second > 0.0 {
        if let Ok(interval) = Duration::try_from_secs_f64(steps_per_second.recip()) {
            return interval;
        }
    }
    warn!(
        "Invalid rate of {} steps per second, using {}",
        steps_per_second, DEFAULT_STEPS_PER_SECOND
    );
    Duration::from_secs_f64(DEFAULT_STEPS_PER_SECOND.recip())
}
