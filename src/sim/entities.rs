//! Entity model and directional input state

use crate::core::level::Position;
use crate::types::{CollectibleKind, Direction, ObstacleKind};

pub type EntityId = u32;

/// What an entity is on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Collectible(CollectibleKind),
    Goal,
}

/// Lightweight placed entity. Obstacles and the goal are never removed;
/// collectibles flip `alive` off on pickup and stay dead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub kind: EntityKind,
    pub alive: bool,
}

impl Entity {
    pub fn new(id: EntityId, position: Position, kind: EntityKind) -> Self {
        Self {
            id,
            position,
            kind,
            alive: true,
        }
    }

    pub fn is_collectible(&self) -> bool {
        matches!(self.kind, EntityKind::Collectible(_))
    }
}

/// Held directional intents for one frame.
///
/// Opposing directions cancel; when both axes are active the engine resolves
/// the horizontal step first, then the vertical, each blocked independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn press(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    pub fn release(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.up = false,
            Direction::Down => self.down = false,
            Direction::Left => self.left = false,
            Direction::Right => self.right = false,
        }
    }

    /// Per-axis velocity intent in {-1, 0, 1}
    pub fn velocity_intent(&self) -> (i32, i32) {
        let dx = (self.right as i32) - (self.left as i32);
        let dy = (self.down as i32) - (self.up as i32);
        (dx, dy)
    }

    pub fn is_idle(&self) -> bool {
        self.velocity_intent() == (0, 0)
    }
}
