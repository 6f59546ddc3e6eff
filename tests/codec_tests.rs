//! Round-trip tests for the run-length grid codec

use puzzle_adventure::core::{decode, encode, Grid, SimpleRng};
use puzzle_adventure::types::Cell;

fn random_grid(size: usize, rng: &mut SimpleRng) -> Grid {
    let mut grid = Grid::empty(size);
    for y in 0..size as i32 {
        for x in 0..size as i32 {
            if rng.chance(0.4) {
                grid.set(x, y, Cell::Wall);
            }
        }
    }
    grid
}

#[test]
fn roundtrip_random_grids_all_sizes() {
    let mut rng = SimpleRng::new(2024);
    for size in 3..=8 {
        for _ in 0..50 {
            let grid = random_grid(size, &mut rng);
            let runs = encode(&grid);
            let back = decode(&runs, size).unwrap();
            assert_eq!(back, grid, "round-trip failed for size {size}");
        }
    }
}

#[test]
fn roundtrip_all_walls() {
    let mut grid = Grid::empty(6);
    for y in 0..6 {
        for x in 0..6 {
            grid.set(x, y, Cell::Wall);
        }
    }
    let runs = encode(&grid);
    // Every row is a zero empty run followed by a full wall run
    assert_eq!(runs, vec![0, 6].repeat(6));
    assert_eq!(decode(&runs, 6).unwrap(), grid);
}

#[test]
fn roundtrip_checkerboard() {
    let mut grid = Grid::empty(5);
    for y in 0..5 {
        for x in 0..5 {
            if (x + y) % 2 == 1 {
                grid.set(x, y, Cell::Wall);
            }
        }
    }
    let runs = encode(&grid);
    assert_eq!(decode(&runs, 5).unwrap(), grid);
}

#[test]
fn encoding_is_compact_for_uniform_rows() {
    let grid = Grid::empty(8);
    assert_eq!(encode(&grid).len(), 8);
}
