//! River Run: steer a boat down a river, catch shrimp, dodge fishing nets.
//!
//! - `entities`: pure data (game state, entities, per-frame input)
//! - `compute`: pure frame logic (spawning, movement, speed ramp, collisions)
//! - `mask`: pixel-occupancy bitsets and the hitbox erosion
//! - `sprites`: procedural sprite art
//! - `config`: tuning constants, overridable from TOML

pub mod compute;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod mask;
pub mod sprites;
