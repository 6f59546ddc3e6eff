//! Simulation module - entity placement, collision scoring and the
//! play/complete state machine

pub mod engine;
pub mod entities;

pub use engine::{LoadError, SessionResult, SimEvent, SimulationEngine};
pub use entities::{Entity, EntityId, EntityKind, InputState};
