//! Commands issued by an input controller.
//!
//! All external mutations to the simulation go through `Command`. A frontend
//! maps its keys or UI actions onto these variants; the engine itself never
//! reads input devices. `Pause` and `Resume` are handled by the runner, the
//! rest by `SimulationWorld::apply_command`.

use crate::math::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Stop ticking; state is preserved.
    Pause,
    /// Resume ticking after a pause.
    Resume,
    /// Reinitialize all four collections from the configured initial counts
    /// and zero all counters.
    Reset,
    /// Insert one prey at a random position.
    SpawnPrey,
    /// Insert one predator at a random position.
    SpawnPredator,
    /// Insert the given number of food items at random positions, ignoring
    /// the food cap.
    SpawnFood(u32),
    /// Insert an obstacle at an explicit point (e.g. the mouse cursor).
    SpawnObstacle { position: Vec2, radius: f32 },
    /// Remove every obstacle.
    ClearObstacles,
}
