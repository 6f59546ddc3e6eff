//! Puzzle adventure core.
//!
//! A procedurally generated 2D puzzle game: levels come from an ordered
//! pipeline of AI providers with a deterministic local fallback, travel as a
//! compact wire payload (optionally run-length encoded), and are played out
//! by a real-time grid simulation with collision-driven scoring.

pub mod core;
pub mod gen;
pub mod sim;
pub mod types;
