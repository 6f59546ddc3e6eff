//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Grid sizing: locally generated levels use `clamp(skill + 2, 3, 8)`
pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 8;

/// Simulation timing constants (in milliseconds)
pub const TICK_MS: u32 = 16;
pub const MOVE_INTERVAL_MS: u32 = 96;
pub const HIT_COOLDOWN_MS: u32 = 800;
pub const HIT_FLASH_MS: u32 = 200;

/// Scoring constants
pub const COLLECTIBLE_SCORE: i64 = 100;
pub const OBSTACLE_PENALTY: i64 = 50;
pub const GOAL_SCORE: i64 = 500;

/// Number of collectibles placed when a level spec carries none of its own
pub const DEFAULT_COLLECTIBLE_COUNT: usize = 5;

/// Wall density used by the deterministic local generator (walls per cell)
pub const LOCAL_WALL_DENSITY: f32 = 0.3;

/// Default per-provider generation timeout (milliseconds)
pub const DEFAULT_GENERATOR_TIMEOUT_MS: u64 = 4000;

/// Maximum accepted theme identifier length after sanitizing
pub const MAX_THEME_LEN: usize = 24;

/// A single cell of the wall grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Wall,
}

impl Cell {
    /// Wire representation: 0 = empty, 1 = wall
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Wall),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Wall => 1,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall)
    }
}

/// Directional movement intents (the only input surface the core understands)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step on the grid, (dx, dy) with y growing downward
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Playing,
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Playing => "playing",
            Phase::Complete => "complete",
        }
    }
}

/// Obstacle kinds; providers may emit theme-specific kinds we keep verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Spike,
    Laser,
    Trap,
    Custom(String),
}

impl ObstacleKind {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "spike" => ObstacleKind::Spike,
            "laser" => ObstacleKind::Laser,
            "trap" => ObstacleKind::Trap,
            other => ObstacleKind::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ObstacleKind::Spike => "spike",
            ObstacleKind::Laser => "laser",
            ObstacleKind::Trap => "trap",
            ObstacleKind::Custom(s) => s.as_str(),
        }
    }

    /// Kind assigned to the i-th obstacle by the local generator
    pub fn cycle(i: usize) -> Self {
        match i % 3 {
            0 => ObstacleKind::Spike,
            1 => ObstacleKind::Laser,
            _ => ObstacleKind::Trap,
        }
    }
}

/// Collectible kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectibleKind {
    Gem,
    Fuel,
    Custom(String),
}

impl CollectibleKind {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "gem" => CollectibleKind::Gem,
            "fuel" => CollectibleKind::Fuel,
            other => CollectibleKind::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CollectibleKind::Gem => "gem",
            CollectibleKind::Fuel => "fuel",
            CollectibleKind::Custom(s) => s.as_str(),
        }
    }
}
