use anyhow::Context;
use maze_pathfinding::{Marker, MazeSession, RunOutcome, SessionConfig, Tile, TileGrid};
use std::cell::RefCell;

// Solves the maze below and prints every frame of the playback, where
// - # marks a wall
// - S marks the start
// - G marks the goal
// - o marks an explored tile
// - * marks the discovered path
// - X marks the goal once reached
//
// Set RUST_LOG=debug to see the search statistics.
const MAZE: &str = "
S....#....
.###.#.##.
.#...#..#.
.#.####.#.
.#......#.
.######.#.
........#G
";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let layout: TileGrid = MAZE.parse().context("invalid maze layout")?;

    let mut session = MazeSession::with_config(
        layout.width(),
        layout.height(),
        SessionConfig {
            animate_search: true,
            ..SessionConfig::default()
        },
    );
    for p in layout.positions() {
        match layout.get_tile(p) {
            Tile::Wall => {
                session.paint_tile(p, Tile::Wall);
            }
            Tile::Player => {
                session.place_marker(Marker::Player, p);
            }
            Tile::Goal => {
                session.place_marker(Marker::Goal, p);
            }
            _ => {}
        }
    }
    let start = session
        .marker(Marker::Player)
        .context("maze has no start")?;
    let session = RefCell::new(session);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let outcome = runtime.block_on(MazeSession::run_with(&session, start, 8.0, |_| {
        println!("{}", session.borrow().grid());
    }));
    println!("{}", session.borrow().grid());
    match outcome {
        RunOutcome::Reached { steps } => println!("Reached the goal in {} steps", steps),
        RunOutcome::NoPath => println!("The goal cannot be reached"),
        other => println!("Run ended: {:?}", other),
    }
    Ok(())
}
