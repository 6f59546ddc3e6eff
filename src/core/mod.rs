//! Core module - pure level and grid logic with no I/O dependencies

pub mod codec;
pub mod grid;
pub mod level;
pub mod rng;

pub use codec::{decode, encode, CodecError};
pub use grid::Grid;
pub use level::{
    derive_level_id, sanitize_theme, ItemSpec, Layout, LevelSpec, ObstacleSpec, Position,
    ValidationError,
};
pub use rng::{fnv1a, seed_from, SimpleRng};
