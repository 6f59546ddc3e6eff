//! Simulation engine - per-session state machine and tick loop
//!
//! One engine owns one session's state. The lifecycle is
//! Loading -> Playing -> Complete; loading a new level resets everything,
//! Complete freezes the player until that happens. Presentation layers never
//! reach into the engine: they drain queued events instead.

use std::collections::HashMap;

use arrayvec::ArrayVec;
use serde::Serialize;
use thiserror::Error;

use crate::core::grid::Grid;
use crate::core::level::{LevelSpec, Position, ValidationError};
use crate::core::rng::{seed_from, SimpleRng};
use crate::types::{
    CollectibleKind, Phase, COLLECTIBLE_SCORE, DEFAULT_COLLECTIBLE_COUNT, GOAL_SCORE,
    HIT_COOLDOWN_MS, HIT_FLASH_MS, MOVE_INTERVAL_MS, OBSTACLE_PENALTY,
};

use super::entities::{Entity, EntityId, EntityKind, InputState};

/// Events consumed by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    /// Fired on every score-affecting collision
    ScoreUpdate(i64),
    /// Fired exactly once per session, at the Playing -> Complete transition
    GameComplete,
    /// Fired when a level fails its load-time invariants
    Error(String),
}

/// Finished-session handoff for the external score API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub user_id: String,
    pub level_id: String,
    pub score: i64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("level rejected at load time: {0}")]
    Invalid(#[from] ValidationError),
}

pub struct SimulationEngine {
    phase: Phase,
    spec: Option<LevelSpec>,
    grid: Grid,
    player: Position,
    score: i64,
    entities: Vec<Entity>,
    next_entity_id: EntityId,
    /// Per-obstacle penalty cooldown, id -> remaining ms
    hit_cooldowns: HashMap<EntityId, u32>,
    /// Non-blocking "hit" feedback window
    hit_flash_ms: u32,
    /// Time until the next movement step is allowed
    move_cooldown_ms: u32,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            spec: None,
            grid: Grid::empty(1),
            player: Position::new(0, 0),
            score: 0,
            entities: Vec::new(),
            next_entity_id: 0,
            hit_cooldowns: HashMap::new(),
            hit_flash_ms: 0,
            move_cooldown_ms: 0,
            events: Vec::new(),
        }
    }

    /// Load a level and enter Playing.
    ///
    /// A spec that fails its invariants is a construction error: the session
    /// stays in Loading, an `Error` event is queued, and the caller may retry
    /// with a fresh generation. Loading a valid level always resets score and
    /// entities, which is also how a Complete session is reset.
    pub fn load(&mut self, spec: LevelSpec) -> Result<(), LoadError> {
        let grid = match spec.validate() {
            Ok(grid) => grid,
            Err(e) => {
                self.phase = Phase::Loading;
                self.events.push(SimEvent::Error(e.to_string()));
                return Err(LoadError::Invalid(e));
            }
        };

        self.grid = grid;
        self.player = spec.start_position;
        self.score = 0;
        self.entities.clear();
        self.next_entity_id = 0;
        self.hit_cooldowns.clear();
        self.hit_flash_ms = 0;
        self.move_cooldown_ms = 0;
        self.events.clear();

        for ob in &spec.obstacles {
            let id = self.alloc_id();
            self.entities.push(Entity::new(
                id,
                Position::new(ob.x, ob.y),
                EntityKind::Obstacle(ob.kind.clone()),
            ));
        }

        if spec.items.is_empty() {
            self.place_default_collectibles(&spec);
        } else {
            for item in &spec.items {
                let id = self.alloc_id();
                self.entities.push(Entity::new(
                    id,
                    Position::new(item.x, item.y),
                    EntityKind::Collectible(item.kind.clone()),
                ));
            }
        }

        let goal_id = self.alloc_id();
        self.entities
            .push(Entity::new(goal_id, spec.end_position, EntityKind::Goal));

        self.spec = Some(spec);
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Place collectibles on shuffled open cells, skipping start, goal and
    /// cells already holding a collectible. Capped by the number of open
    /// cells so small dense grids still load.
    fn place_default_collectibles(&mut self, spec: &LevelSpec) {
        let mut candidates: Vec<Position> = Vec::new();
        for y in 0..self.grid.size() as i32 {
            for x in 0..self.grid.size() as i32 {
                let p = Position::new(x, y);
                if self.grid.is_open(x, y) && p != spec.start_position && p != spec.end_position {
                    candidates.push(p);
                }
            }
        }

        let mut rng = SimpleRng::new(seed_from(&spec.level_id, spec.difficulty_rating as u32));
        rng.shuffle(&mut candidates);

        let picks: ArrayVec<Position, DEFAULT_COLLECTIBLE_COUNT> = candidates
            .into_iter()
            .take(DEFAULT_COLLECTIBLE_COUNT)
            .collect();
        for p in picks {
            let id = self.alloc_id();
            self.entities.push(Entity::new(
                id,
                p,
                EntityKind::Collectible(CollectibleKind::Gem),
            ));
        }
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Advance the simulation by `dt_ms` under the given held input.
    ///
    /// Movement is rate-limited to one step per axis per `MOVE_INTERVAL_MS`;
    /// the horizontal step resolves before the vertical one and walls block
    /// each axis independently. Outside Playing this is a no-op, which is
    /// what freezes the player after completion.
    pub fn tick(&mut self, dt_ms: u32, input: &InputState) {
        if self.phase != Phase::Playing {
            return;
        }

        self.hit_flash_ms = self.hit_flash_ms.saturating_sub(dt_ms);
        self.hit_cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(dt_ms);
            *remaining > 0
        });
        self.move_cooldown_ms = self.move_cooldown_ms.saturating_sub(dt_ms);

        let (dx, dy) = input.velocity_intent();
        if (dx, dy) == (0, 0) || self.move_cooldown_ms > 0 {
            return;
        }
        self.move_cooldown_ms = MOVE_INTERVAL_MS;

        if dx != 0 && self.try_step(dx, 0) {
            return; // reached the goal mid-step
        }
        if dy != 0 {
            self.try_step(0, dy);
        }
    }

    /// Attempt a one-cell step; returns true when the session completed
    fn try_step(&mut self, dx: i32, dy: i32) -> bool {
        let (nx, ny) = (self.player.x + dx, self.player.y + dy);
        if !self.grid.is_open(nx, ny) {
            return false;
        }
        self.player = Position::new(nx, ny);
        self.resolve_collisions()
    }

    /// Apply collision effects at the player's cell; returns true on goal
    fn resolve_collisions(&mut self) -> bool {
        let at = self.player;
        let mut reached_goal = false;

        for i in 0..self.entities.len() {
            if self.entities[i].position != at || !self.entities[i].alive {
                continue;
            }
            match self.entities[i].kind.clone() {
                EntityKind::Collectible(_) => {
                    // Idempotent: the entity dies on first pickup
                    self.entities[i].alive = false;
                    self.score += COLLECTIBLE_SCORE;
                    self.events.push(SimEvent::ScoreUpdate(self.score));
                }
                EntityKind::Obstacle(_) => {
                    let id = self.entities[i].id;
                    if !self.hit_cooldowns.contains_key(&id) {
                        self.score = (self.score - OBSTACLE_PENALTY).max(0);
                        self.hit_cooldowns.insert(id, HIT_COOLDOWN_MS);
                        self.hit_flash_ms = HIT_FLASH_MS;
                        self.events.push(SimEvent::ScoreUpdate(self.score));
                    }
                }
                EntityKind::Goal => {
                    reached_goal = true;
                }
            }
        }

        if reached_goal {
            self.score += GOAL_SCORE;
            self.events.push(SimEvent::ScoreUpdate(self.score));
            self.phase = Phase::Complete;
            self.events.push(SimEvent::GameComplete);
        }
        reached_goal
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn player_position(&self) -> Position {
        self.player
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Ids of collectibles still waiting to be picked up
    pub fn remaining_collectibles(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.is_collectible() && e.alive)
            .map(|e| e.id)
            .collect()
    }

    /// Whether the non-blocking hit feedback window is active
    pub fn hit_flash_active(&self) -> bool {
        self.hit_flash_ms > 0
    }

    pub fn level_id(&self) -> Option<&str> {
        self.spec.as_ref().map(|s| s.level_id.as_str())
    }

    /// Finished-session record for the external score API
    pub fn session_result(&self, user_id: &str) -> Option<SessionResult> {
        self.spec.as_ref().map(|spec| SessionResult {
            user_id: user_id.to_string(),
            level_id: spec.level_id.clone(),
            score: self.score,
        })
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
