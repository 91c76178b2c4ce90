//! ECS components for ecosystem entities.

use crate::math::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ============================================================================
// Identity
// ============================================================================

/// Stable per-world spawn counter, stamped on every entity.
///
/// All phase traversals and nearest/first-match scans sort by `SpawnId`, so
/// "first encountered" always means insertion order regardless of how the
/// ECS lays entities out internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpawnId(pub u64);

// ============================================================================
// Kinematics
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position(pub Vec2);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Per-tick displacement magnitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Speed(pub f32);

/// Recent positions for display, oldest first. Bounded FIFO.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec2>,
}

impl Trail {
    pub const CAPACITY: usize = 10;

    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        if self.points.len() > Self::CAPACITY {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

// ============================================================================
// Metabolism & lifecycle
// ============================================================================

/// Agent energy. Gains clamp to the species max; losses never clamp, so the
/// value can reach zero or below, which signals death.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Energy(pub f32);

impl Energy {
    pub fn gain(&mut self, amount: f32, max: f32) {
        self.0 = (self.0 + amount).min(max);
    }

    pub fn drain(&mut self, amount: f32) {
        self.0 -= amount;
    }

    pub fn is_depleted(self) -> bool {
        self.0 <= 0.0
    }
}

/// Ticks remaining until the agent may reproduce again.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReproductionCooldown(pub u32);

impl ReproductionCooldown {
    pub fn tick_down(&mut self) {
        if self.0 > 0 {
            self.0 -= 1;
        }
    }

    pub fn is_ready(self) -> bool {
        self.0 == 0
    }
}

// ============================================================================
// Species
// ============================================================================

/// Marker: entity is a prey agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prey;

/// Marker: entity is a predator agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Predator;

/// Detection radius for threats (prey) or targets (predators).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vision(pub f32);

/// Food detection radius; prey only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FoodVision(pub f32);

// ============================================================================
// Static entities
// ============================================================================

/// A renewable food item. Radius is display-only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Food {
    pub radius: f32,
}

/// A static circular obstacle. Never removed except by explicit clear.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub radius: f32,
}
