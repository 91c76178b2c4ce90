//! Ecosystem Simulation Engine
//!
//! Discrete-time predator-prey simulation using ECS architecture: mobile
//! agents steer, flock, hunt, eat, reproduce, and starve inside a bounded
//! arena with static obstacles and renewable food. Rendering, input
//! handling, and stats plotting are external; this crate owns the per-tick
//! behavior and population dynamics.

pub mod command;
pub mod components;
pub mod config;
pub mod math;
pub mod runner;
pub mod stats;
pub mod systems;
pub mod world;

pub use command::Command;
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use math::Vec2;
pub use runner::SimulationRunner;
pub use stats::{Counters, TickStats};
pub use world::SimulationWorld;
