//! Deterministic local level generator
//!
//! The terminal link of the fallback chain: it is synchronous, seeded from
//! the request, and structurally total. Every level it emits passes
//! validation, which is what lets the pipeline promise "never fails".

use futures_util::future::BoxFuture;

use crate::core::grid::Grid;
use crate::core::level::{derive_level_id, Layout, LevelSpec, ObstacleSpec, Position};
use crate::core::rng::{seed_from, SimpleRng};
use crate::types::{Cell, ObstacleKind, LOCAL_WALL_DENSITY, MAX_GRID_SIZE, MIN_GRID_SIZE};

use super::{GenerateError, GenerateRequest, Generator};

/// Deterministic generator of last resort
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalGenerator;

impl LocalGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Grid side length for a skill level: clamp(skill + 2, 3, 8)
    pub fn grid_size(skill: u8) -> usize {
        (skill as usize + 2).clamp(MIN_GRID_SIZE, MAX_GRID_SIZE)
    }

    /// Synchronous generation; infallible by construction
    pub fn generate(&self, request: &GenerateRequest, timestamp_ms: u64) -> LevelSpec {
        let size = Self::grid_size(request.player_skill);
        let mut rng = SimpleRng::new(seed_from(&request.theme, u32::from(request.player_skill)));

        let start = Position::new(0, 0);
        let goal = Position::new(size as i32 - 1, size as i32 - 1);

        let mut grid = Grid::empty(size);
        for y in 0..size as i32 {
            for x in 0..size as i32 {
                if rng.chance(LOCAL_WALL_DENSITY) {
                    grid.set(x, y, Cell::Wall);
                }
            }
        }

        // Start and goal corners stay open no matter what the scatter did
        grid.set(start.x, start.y, Cell::Empty);
        grid.set(goal.x, goal.y, Cell::Empty);

        if !grid.reachable((start.x, start.y), (goal.x, goal.y)) {
            carve_corridor(&mut grid, start, goal);
        }

        // round(skill * 1.5) obstacles on random non-edge cells
        let obstacle_count = ((request.player_skill as f32) * 1.5).round() as usize;
        let mut obstacles = Vec::with_capacity(obstacle_count);
        // MIN_GRID_SIZE is 3, so the interior band 1..=size-2 is never empty
        let interior = (size - 2) as u32;
        for i in 0..obstacle_count {
            let x = 1 + rng.next_range(interior) as i32;
            let y = 1 + rng.next_range(interior) as i32;
            obstacles.push(ObstacleSpec {
                x,
                y,
                kind: ObstacleKind::cycle(i),
            });
        }

        LevelSpec {
            level_id: derive_level_id(&request.theme, timestamp_ms),
            layout: Layout::raw(&grid),
            obstacles,
            items: Vec::new(),
            start_position: start,
            end_position: goal,
            difficulty_rating: request.player_skill,
            theme: request.theme.clone(),
        }
    }
}

/// Clear an L-shaped corridor: along the top row to the goal column, then
/// down the goal column. Guarantees start-goal connectivity.
fn carve_corridor(grid: &mut Grid, start: Position, goal: Position) {
    for x in start.x.min(goal.x)..=start.x.max(goal.x) {
        grid.set(x, start.y, Cell::Empty);
    }
    for y in start.y.min(goal.y)..=start.y.max(goal.y) {
        grid.set(goal.x, y, Cell::Empty);
    }
}

impl Generator for LocalGenerator {
    fn name(&self) -> &'static str {
        "local"
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn generate_level<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<LevelSpec, GenerateError>> {
        let spec = self.generate(request, super::pipeline::now_ms());
        Box::pin(async move { Ok(spec) })
    }
}
