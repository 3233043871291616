/// Fuzzes the backtracking search by checking for many random grids that a path is found exactly
/// when the goal is reachable by being part of the same connected component, and that every
/// path found can actually be walked.
use grid_util::Point;
use maze_pathfinding::{
    solver::{backtrack::BacktrackSolver, is_valid_path},
    Components, Tile, TileGrid,
};
use rand::prelude::*;

fn random_grid(w: usize, h: usize, rng: &mut StdRng) -> TileGrid {
    let mut grid = TileGrid::new(w, h);
    for p in grid.positions().collect::<Vec<Point>>() {
        if rng.gen_bool(0.4) {
            grid.set_tile(p, Tile::Wall);
        }
    }
    grid
}

fn visualize_grid(grid: &TileGrid, path: &Option<Vec<Point>>) {
    let mut grid = grid.clone();
    for p in path.iter().flatten() {
        grid.set_tile(*p, Tile::Path);
    }
    println!("{}", grid);
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 5000;
    let mut rng = StdRng::seed_from_u64(0);
    let solver = BacktrackSolver;
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, N, &mut rng);
        grid.set_tile(start, Tile::Player);
        grid.set_tile(end, Tile::Goal);
        let reachable = Components::generate(&grid).reachable(&start, &end);
        let path = solver.find_path(&grid, start, &mut rng);
        // Show the grid if the search disagrees with the components
        if path.is_some() != reachable {
            visualize_grid(&grid, &path);
        }
        assert_eq!(path.is_some(), reachable);
        if let Some(path) = path {
            assert!(is_valid_path(&grid, start, &path));
            assert_eq!(path.last(), Some(&end));
        }
    }
}

#[test]
fn open_grids_always_connect() {
    let mut rng = StdRng::seed_from_u64(1);
    let solver = BacktrackSolver;
    for _ in 0..500 {
        let w = rng.gen_range(1..12);
        let h = rng.gen_range(1..12);
        let mut grid = TileGrid::new(w, h);
        let start = Point::new(rng.gen_range(0..w) as i32, rng.gen_range(0..h) as i32);
        let goal = Point::new(rng.gen_range(0..w) as i32, rng.gen_range(0..h) as i32);
        grid.set_tile(start, Tile::Player);
        grid.set_tile(goal, Tile::Goal);
        let path = solver.find_path(&grid, start, &mut rng).unwrap();
        assert!(is_valid_path(&grid, start, &path));
        if start == goal {
            assert!(path.is_empty());
        } else {
            assert_eq!(path.last(), Some(&goal));
            let distance = (start.x - goal.x).abs() + (start.y - goal.y).abs();
            assert!(path.len() >= distance as usize);
        }
    }
}

#[test]
fn enclosed_goals_are_never_reached() {
    let mut rng = StdRng::seed_from_u64(2);
    let solver = BacktrackSolver;
    for _ in 0..500 {
        let mut grid = random_grid(9, 9, &mut rng);
        let goal = Point::new(rng.gen_range(1..8), rng.gen_range(1..8));
        for n in TileGrid::neumann_neighbours(goal) {
            grid.set_tile(n, Tile::Wall);
        }
        grid.set_tile(goal, Tile::Goal);
        let start = Point::new(0, 0);
        grid.set_tile(start, Tile::Player);
        assert_eq!(solver.find_path(&grid, start, &mut rng), None);
    }
}

#[test]
fn large_grid_does_not_overflow_stack() {
    // A serpentine corridor forces a descent as deep as the grid has open tiles.
    const N: i32 = 301;
    let mut grid = TileGrid::new(N as usize, N as usize);
    for y in (1..N).step_by(2) {
        for x in 0..N {
            let gap = if (y / 2) % 2 == 0 { N - 1 } else { 0 };
            if x != gap {
                grid.set_tile(Point::new(x, y), Tile::Wall);
            }
        }
    }
    let start = Point::new(0, 0);
    let goal = Point::new(N - 1, N - 1);
    grid.set_tile(start, Tile::Player);
    grid.set_tile(goal, Tile::Goal);
    let mut rng = StdRng::seed_from_u64(3);
    let path = BacktrackSolver.find_path(&grid, start, &mut rng).unwrap();
    assert!(is_valid_path(&grid, start, &path));
    assert!(path.len() > (N * N / 2) as usize);
}
